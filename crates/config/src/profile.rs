//! Image profiles
//!
//! A profile is the expectation set a host is verified against: required
//! packages, users and their groups, the standard configuration files,
//! the init script mode, and the locales that must be generated. Profiles
//! are TOML documents; [`ImageProfile::baseline`] is the built-in profile
//! used when none is supplied.
//!
//! Path sections default to the standard locations, so a custom profile
//! only needs to state what differs. List sections (packages, users,
//! locales) default to empty: a profile describes its own image variant.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use imgcheck_errors::{ConfigError, Error};
use imgcheck_types::FileMode;

/// Packages the image must contain.
///
/// Names match exactly, case-sensitive, with no version constraints.
/// Duplicate entries are permitted and harmless.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PackageSpec {
    #[serde(default)]
    pub required: Vec<String>,
}

/// A user the image must define, with required group memberships.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSpec {
    pub name: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// SSH service expectations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshSpec {
    #[serde(default = "default_sshd_config")]
    pub config_path: PathBuf,
}

/// Timezone expectations. The localtime path may be a symlink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimezoneSpec {
    #[serde(default = "default_localtime")]
    pub localtime_path: PathBuf,
}

/// Resource limits expectations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsSpec {
    #[serde(default = "default_limits_file")]
    pub path: PathBuf,
}

/// Init script expectations: the script must exist with exactly this mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitScriptSpec {
    #[serde(default = "default_init_script")]
    pub path: PathBuf,
    #[serde(default = "default_init_script_mode")]
    pub mode: FileMode,
}

/// Locales that must be generated on the image.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocaleSpec {
    #[serde(default)]
    pub required: Vec<String>,
}

/// The full expectation set for one image variant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImageProfile {
    #[serde(default)]
    pub packages: PackageSpec,

    #[serde(default)]
    pub users: Vec<UserSpec>,

    #[serde(default)]
    pub ssh: SshSpec,

    #[serde(default)]
    pub timezone: TimezoneSpec,

    #[serde(default)]
    pub limits: LimitsSpec,

    #[serde(default)]
    pub init_script: InitScriptSpec,

    #[serde(default)]
    pub locale: LocaleSpec,
}

impl Default for SshSpec {
    fn default() -> Self {
        Self {
            config_path: default_sshd_config(),
        }
    }
}

impl Default for TimezoneSpec {
    fn default() -> Self {
        Self {
            localtime_path: default_localtime(),
        }
    }
}

impl Default for LimitsSpec {
    fn default() -> Self {
        Self {
            path: default_limits_file(),
        }
    }
}

impl Default for InitScriptSpec {
    fn default() -> Self {
        Self {
            path: default_init_script(),
            mode: default_init_script_mode(),
        }
    }
}

// Default value functions for serde
fn default_sshd_config() -> PathBuf {
    PathBuf::from("/etc/ssh/sshd_config")
}

fn default_localtime() -> PathBuf {
    PathBuf::from("/etc/localtime")
}

fn default_limits_file() -> PathBuf {
    PathBuf::from("/etc/security/limits.d/90-cbdb-limits")
}

fn default_init_script() -> PathBuf {
    PathBuf::from("/tmp/init_system.sh")
}

fn default_init_script_mode() -> FileMode {
    FileMode::from_raw(0o755)
}

/// Packages the baseline build image must carry. The duplicate `flex`
/// entry is inherited from the image build recipe; the check is
/// idempotent per name so it stays.
const BASELINE_PACKAGES: &[&str] = &[
    "apt-utils",
    "bison",
    "build-essential",
    "ca-certificates",
    "ca-certificates-java",
    "cgroup-tools",
    "cmake",
    "curl",
    "debhelper",
    "debootstrap",
    "devscripts",
    "equivs",
    "flex",
    "flex",
    "g++-11",
    "g++-11-multilib",
    "gcc-11",
    "git",
    "gnupg",
    "htop",
    "iproute2",
    "iputils-ping",
    "krb5-multidev",
    "less",
    "libapr1-dev",
    "libaprutil1-dev",
    "libbz2-dev",
    "libcgroup1",
    "libcurl4-gnutls-dev",
    "libevent-dev",
    "libfakeroot",
    "libgpgme11",
    "libgpgme-dev",
    "libkrb5-dev",
    "libldap-2.5-0",
    "libldap2-dev",
    "liblz4-dev",
    "libpam0g",
    "libpam0g-dev",
    "libperl-dev",
    "libprotobuf-dev",
    "libpstreams-dev",
    "libreadline-dev",
    "libssl3",
    "libssl-dev",
    "libsystemd-dev",
    "libuv1-dev",
    "libxerces-c-dev",
    "libxml2-dev",
    "libyaml-0-2",
    "libyaml-dev",
    "libzstd-dev",
    "lsof",
    "make",
    "net-tools",
    "ninja-build",
    "openssh-client",
    "openssh-server",
    "openssl",
    "pkg-config",
    "protobuf-compiler",
    "python3.10",
    "python3.10-dev",
    "python3-distutils",
    "python3-pip",
    "python3-setuptools",
    "python-six",
    "quilt",
    "rsync",
    "silversearcher-ag",
    "sudo",
    "tzdata",
    "unzip",
    "vim",
    "wget",
    "zlib1g-dev",
];

impl ImageProfile {
    /// The built-in profile for the standard build image.
    #[must_use]
    pub fn baseline() -> Self {
        Self {
            packages: PackageSpec {
                required: BASELINE_PACKAGES.iter().map(ToString::to_string).collect(),
            },
            users: vec![UserSpec {
                name: "gpadmin".to_string(),
                groups: vec!["gpadmin".to_string()],
            }],
            locale: LocaleSpec {
                required: vec!["en_US.utf8".to_string()],
            },
            ..Self::default()
        }
    }

    /// Load a profile from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid
    /// TOML.
    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|_| ConfigError::ProfileNotFound {
            path: path.display().to_string(),
        })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Serialize the profile as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, Error> {
        toml::to_string_pretty(self)
            .map_err(|e| {
                ConfigError::SerializeError {
                    error: e.to_string(),
                }
                .into()
            })
    }

    /// Warnings about a profile that is probably a mistake. Not fatal:
    /// an intentionally-narrowed battery stays expressible.
    #[must_use]
    pub fn lint(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.packages.required.is_empty() {
            warnings.push("profile requires no packages".to_string());
        }
        if self.users.is_empty() {
            warnings.push("profile requires no users".to_string());
        }
        if self.locale.required.is_empty() {
            warnings.push("profile requires no locales".to_string());
        }
        for user in &self.users {
            if user.groups.is_empty() {
                warnings.push(format!(
                    "user {} has no required group memberships",
                    user.name
                ));
            }
        }
        warnings
    }
}
