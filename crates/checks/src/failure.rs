//! Failure records
//!
//! Every way a check can fail is a structured record carrying the
//! expected and actual values, so a report entry is attributable
//! without re-running the query.

use std::fmt;

use imgcheck_events::CheckFailureInfo;
use imgcheck_types::FileMode;
use serde::Serialize;

use crate::name::CheckName;

/// One failure discovered while evaluating a check.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Failure {
    /// A required package is not installed.
    PackageMissing { package: String },

    /// A required user does not exist.
    UserMissing { user: String },

    /// A user exists but lacks a required group membership.
    GroupMembership { user: String, group: String },

    /// A required path does not exist.
    FileMissing { path: String },

    /// A file exists with the wrong permission mode.
    ModeMismatch {
        path: String,
        expected: FileMode,
        actual: FileMode,
    },

    /// A command the check relies on exited unsuccessfully.
    CommandFailed {
        command: String,
        exit_status: Option<i32>,
    },

    /// A locale is not among the generated locales.
    LocaleMissing { locale: String },

    /// A host query could not be evaluated at all. Fails closed.
    Query { detail: String },
}

impl Failure {
    /// Stable machine-readable discriminator.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Failure::PackageMissing { .. } => "package_missing",
            Failure::UserMissing { .. } => "user_missing",
            Failure::GroupMembership { .. } => "group_membership",
            Failure::FileMissing { .. } => "file_missing",
            Failure::ModeMismatch { .. } => "mode_mismatch",
            Failure::CommandFailed { .. } => "command_failed",
            Failure::LocaleMissing { .. } => "locale_missing",
            Failure::Query { .. } => "query_error",
        }
    }

    /// The expected and actual sides of the failed comparison, where
    /// the failure has one.
    #[must_use]
    pub fn expected_actual(&self) -> (Option<String>, Option<String>) {
        match self {
            Failure::PackageMissing { package } => (
                Some(format!("{package} installed")),
                Some("not installed".to_string()),
            ),
            Failure::UserMissing { user } => (
                Some(format!("user {user} exists")),
                Some("no such user".to_string()),
            ),
            Failure::GroupMembership { user, group } => (
                Some(format!("{user} in group {group}")),
                Some(format!("{user} not in group {group}")),
            ),
            Failure::FileMissing { path } => {
                (Some(format!("{path} exists")), Some("missing".to_string()))
            }
            Failure::ModeMismatch {
                expected, actual, ..
            } => (Some(expected.to_string()), Some(actual.to_string())),
            Failure::CommandFailed { exit_status, .. } => (
                Some("exit status 0".to_string()),
                Some(match exit_status {
                    Some(code) => format!("exit status {code}"),
                    None => "terminated by signal".to_string(),
                }),
            ),
            Failure::LocaleMissing { locale } => (
                Some(format!("{locale} generated")),
                Some("absent from locale -a".to_string()),
            ),
            Failure::Query { .. } => (None, None),
        }
    }

    /// Convert to the event payload surfaced to consumers.
    #[must_use]
    pub fn to_event(&self, check: CheckName) -> CheckFailureInfo {
        let (expected, actual) = self.expected_actual();
        CheckFailureInfo {
            check: check.as_str().to_string(),
            kind: self.kind().to_string(),
            expected,
            actual,
            message: self.to_string(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::PackageMissing { package } => {
                write!(f, "package {package} is not installed")
            }
            Failure::UserMissing { user } => write!(f, "user {user} does not exist"),
            Failure::GroupMembership { user, group } => {
                write!(f, "user {user} is not a member of group {group}")
            }
            Failure::FileMissing { path } => write!(f, "{path} is missing"),
            Failure::ModeMismatch {
                path,
                expected,
                actual,
            } => write!(f, "{path} has mode {actual}, expected {expected}"),
            Failure::CommandFailed {
                command,
                exit_status,
            } => match exit_status {
                Some(code) => write!(f, "`{command}` exited with status {code}"),
                None => write!(f, "`{command}` was terminated by a signal"),
            },
            Failure::LocaleMissing { locale } => {
                write!(f, "locale {locale} is not generated")
            }
            Failure::Query { detail } => {
                write!(f, "query could not be evaluated: {detail}")
            }
        }
    }
}
