//! Check identifiers
//!
//! Names are the CLI-facing identity of a check. The battery order is
//! fixed for display purposes only; checks are independent and any
//! subset or permutation yields the same per-check outcomes.

use std::fmt;
use std::str::FromStr;

use imgcheck_errors::CheckError;
use serde::Serialize;

/// One named check in the battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckName {
    Packages,
    User,
    SshConfig,
    Timezone,
    Limits,
    InitScript,
    Locale,
}

impl CheckName {
    /// The full battery in display order.
    pub const ALL: [CheckName; 7] = [
        CheckName::Packages,
        CheckName::User,
        CheckName::SshConfig,
        CheckName::Timezone,
        CheckName::Limits,
        CheckName::InitScript,
        CheckName::Locale,
    ];

    /// Stable string form used by the CLI and in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CheckName::Packages => "packages",
            CheckName::User => "user",
            CheckName::SshConfig => "ssh-config",
            CheckName::Timezone => "timezone",
            CheckName::Limits => "limits",
            CheckName::InitScript => "init-script",
            CheckName::Locale => "locale",
        }
    }

    /// Human-readable description for `imgcheck checks`.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            CheckName::Packages => "every required package is installed",
            CheckName::User => "required users exist with their group memberships",
            CheckName::SshConfig => "the sshd configuration file is present",
            CheckName::Timezone => "the localtime file is present or a symlink",
            CheckName::Limits => "the resource limits file is present",
            CheckName::InitScript => "the init script is present with its exact mode",
            CheckName::Locale => "required locales are generated",
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckName {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CheckError::UnknownCheck {
                name: s.to_string(),
            })
    }
}
