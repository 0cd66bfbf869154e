//! Local system host
//!
//! Queries go straight to the running system: `dpkg-query` or `rpm` for
//! package state, `getent`/`id` for users, filesystem metadata for
//! files, `sh -c` for commands. Nothing is cached, so toggling system
//! state between runs toggles query results.

use std::collections::BTreeSet;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Command;

use imgcheck_errors::{Error, HostError};
use imgcheck_types::FileMode;

use crate::command::CommandOutput;
use crate::Host;

/// Which package database the host carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageBackend {
    Dpkg,
    Rpm,
}

impl PackageBackend {
    /// Probe the system for a usable package database.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `dpkg-query` nor `rpm` is available.
    pub fn detect() -> Result<Self, Error> {
        if probe("dpkg-query") {
            return Ok(Self::Dpkg);
        }
        if probe("rpm") {
            return Ok(Self::Rpm);
        }
        Err(HostError::NoPackageManager {
            tried: "dpkg-query, rpm".to_string(),
        }
        .into())
    }
}

impl std::str::FromStr for PackageBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dpkg" => Ok(Self::Dpkg),
            "rpm" => Ok(Self::Rpm),
            other => Err(Error::internal(format!(
                "unknown package backend: {other}"
            ))),
        }
    }
}

fn probe(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Host implementation backed by the local system.
pub struct LocalHost {
    backend: PackageBackend,
}

impl LocalHost {
    /// Create a host with an explicit package backend.
    #[must_use]
    pub fn with_backend(backend: PackageBackend) -> Self {
        Self { backend }
    }

    /// Create a host, auto-detecting the package backend.
    ///
    /// # Errors
    ///
    /// Returns an error if no supported package database is found.
    pub fn detect() -> Result<Self, Error> {
        Ok(Self {
            backend: PackageBackend::detect()?,
        })
    }

    /// The package backend this host queries.
    #[must_use]
    pub fn backend(&self) -> PackageBackend {
        self.backend
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, Error> {
        let output = Command::new(program).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HostError::CommandNotFound {
                    command: program.to_string(),
                }
            } else {
                HostError::CommandFailed {
                    command: program.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        Ok(CommandOutput {
            exit_status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Split `id -Gn` output into group names.
fn split_groups(stdout: &str) -> BTreeSet<String> {
    stdout.split_whitespace().map(ToString::to_string).collect()
}

impl Host for LocalHost {
    fn package_is_installed(&self, name: &str) -> Result<bool, Error> {
        match self.backend {
            PackageBackend::Dpkg => {
                let output =
                    self.run("dpkg-query", &["-W", "-f=${db:Status-Status}", name])?;
                match output.exit_status {
                    // Known to the database: installed only if fully configured
                    Some(0) => Ok(output.stdout.trim() == "installed"),
                    // Unknown package
                    Some(_) => Ok(false),
                    None => Err(HostError::PackageQuery {
                        name: name.to_string(),
                        reason: "dpkg-query terminated by signal".to_string(),
                    }
                    .into()),
                }
            }
            PackageBackend::Rpm => {
                let output = self.run("rpm", &["-q", name])?;
                match output.exit_status {
                    Some(0) => Ok(true),
                    Some(_) => Ok(false),
                    None => Err(HostError::PackageQuery {
                        name: name.to_string(),
                        reason: "rpm terminated by signal".to_string(),
                    }
                    .into()),
                }
            }
        }
    }

    fn file_exists(&self, path: &Path) -> Result<bool, Error> {
        match fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(HostError::Metadata {
                path: path.display().to_string(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    fn file_is_symlink(&self, path: &Path) -> Result<bool, Error> {
        match fs::symlink_metadata(path) {
            Ok(meta) => Ok(meta.file_type().is_symlink()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(HostError::Metadata {
                path: path.display().to_string(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    fn file_mode(&self, path: &Path) -> Result<FileMode, Error> {
        let meta = fs::metadata(path).map_err(|e| HostError::Metadata {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(FileMode::from_raw(meta.permissions().mode()))
    }

    fn user_exists(&self, name: &str) -> Result<bool, Error> {
        let output = self.run("getent", &["passwd", name])?;
        match output.exit_status {
            Some(0) => Ok(true),
            // getent exits 2 when the key is not found in the database
            Some(2) => Ok(false),
            status => Err(HostError::UserQuery {
                name: name.to_string(),
                reason: format!("getent passwd exited with {status:?}"),
            }
            .into()),
        }
    }

    fn user_groups(&self, name: &str) -> Result<BTreeSet<String>, Error> {
        let output = self.run("id", &["-Gn", name])?;
        if output.success() {
            Ok(split_groups(&output.stdout))
        } else {
            Err(HostError::UserQuery {
                name: name.to_string(),
                reason: output.stderr.trim().to_string(),
            }
            .into())
        }
    }

    fn run_command(&self, command: &str) -> Result<CommandOutput, Error> {
        self.run("sh", &["-c", command])
    }
}
