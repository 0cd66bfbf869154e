//! Captured command output

use serde::{Deserialize, Serialize};

/// Output from command execution.
///
/// `exit_status` is `None` when the process was terminated by a signal;
/// such a command can never satisfy an exit-status-zero condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput {
    pub exit_status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_status == Some(0)
    }
}
