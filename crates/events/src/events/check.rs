use serde::{Deserialize, Serialize};

/// Summary of what a verification run will inspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckTargetSummary {
    pub checks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<usize>,
}

/// Metrics captured at the end of a verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetrics {
    pub duration_ms: u64,
    pub checks_run: usize,
}

/// Structured description of a check failure surfaced to consumers.
///
/// `expected` and `actual` are human-readable renderings of the failed
/// comparison; `kind` is a stable machine-readable discriminator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckFailureInfo {
    pub check: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    pub message: String,
}

/// Check events for a verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckEvent {
    /// Verification run started.
    VerificationStarted {
        operation_id: String,
        targets: CheckTargetSummary,
    },

    /// One named check started.
    CheckStarted { name: String },

    /// One named check finished.
    CheckCompleted {
        name: String,
        passed: bool,
        duration_ms: u64,
    },

    /// Failure discovered while evaluating a check.
    FailureReported {
        operation_id: String,
        failure: CheckFailureInfo,
    },

    /// Verification run completed.
    VerificationCompleted {
        operation_id: String,
        failed: usize,
        metrics: RunMetrics,
    },
}
