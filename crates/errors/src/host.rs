//! Host query error types
//!
//! A host error means a query capability could not be evaluated at all,
//! as opposed to an assertion that evaluated false. The verifier treats
//! both as check failures, but they are reported distinctly.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum HostError {
    /// The query tool itself is not present on the host.
    #[error("command not found: {command}")]
    CommandNotFound { command: String },

    /// The query tool was found but could not be executed.
    #[error("failed to run {command}: {message}")]
    CommandFailed { command: String, message: String },

    /// A package state query could not be evaluated.
    #[error("package query failed for {name}: {reason}")]
    PackageQuery { name: String, reason: String },

    /// A user or group lookup could not be evaluated.
    #[error("user query failed for {name}: {reason}")]
    UserQuery { name: String, reason: String },

    /// Filesystem metadata for a path could not be read.
    #[error("metadata query failed for {path}: {message}")]
    Metadata { path: String, message: String },

    /// No supported package database was found on the host.
    #[error("no supported package manager found (tried {tried})")]
    NoPackageManager { tried: String },
}

impl UserFacingError for HostError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CommandNotFound { .. } => {
                Some("The image must ship the inspection tool the query relies on.")
            }
            Self::NoPackageManager { .. } => {
                Some("Select a backend explicitly with --package-backend.")
            }
            _ => None,
        }
    }
}
