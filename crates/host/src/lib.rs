#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Host inspection abstraction for imgcheck
//!
//! A [`Host`] is an opaque handle to the system under test. It exposes
//! read-only queries over package state, files, users, and command
//! execution; the verifier never mutates it. [`LocalHost`] is the
//! production implementation backed by the local system, which is the
//! image itself when the tool runs inside the built container.

pub mod command;
pub mod local;

pub use command::CommandOutput;
pub use local::{LocalHost, PackageBackend};

use std::collections::BTreeSet;
use std::path::Path;

use imgcheck_errors::Error;
use imgcheck_types::FileMode;

/// Read-only inspection queries over a system under test.
///
/// Every method returns `Err` when the capability could not be evaluated
/// at all (missing tool, unreadable metadata). Callers decide what a
/// query error means; the verifier treats it as a failure of the check
/// that issued the query.
pub trait Host {
    /// Whether a package with exactly this name is installed.
    ///
    /// # Errors
    ///
    /// Returns an error if the package database cannot be queried.
    fn package_is_installed(&self, name: &str) -> Result<bool, Error>;

    /// Whether the path exists. Symlinks are followed, so a dangling
    /// symlink does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if metadata cannot be read for a reason other
    /// than absence.
    fn file_exists(&self, path: &Path) -> Result<bool, Error>;

    /// Whether the path itself is a symbolic link.
    ///
    /// # Errors
    ///
    /// Returns an error if metadata cannot be read for a reason other
    /// than absence.
    fn file_is_symlink(&self, path: &Path) -> Result<bool, Error>;

    /// Permission bits of the file the path resolves to.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not resolve or metadata cannot
    /// be read.
    fn file_mode(&self, path: &Path) -> Result<FileMode, Error>;

    /// Whether a user with this name exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the user database cannot be queried.
    fn user_exists(&self, name: &str) -> Result<bool, Error>;

    /// Names of all groups the user is a member of.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or group membership
    /// cannot be resolved.
    fn user_groups(&self, name: &str) -> Result<BTreeSet<String>, Error>;

    /// Run a shell command and capture its outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be spawned at all. A
    /// command that runs and exits non-zero is an `Ok` with that status.
    fn run_command(&self, command: &str) -> Result<CommandOutput, Error>;
}
