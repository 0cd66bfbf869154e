//! Check battery error types

use thiserror::Error;

/// Errors emitted by the check battery itself.
///
/// Assertion failures are not errors: they are reported as failure
/// records in the verification report. These variants cover misuse of
/// the battery.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum CheckError {
    /// A check name was requested that the battery does not define.
    #[error("unknown check: {name}")]
    UnknownCheck { name: String },

    /// The requested selection resolved to zero checks.
    #[error("no checks selected")]
    EmptySelection,
}
