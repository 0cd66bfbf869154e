//! Verification reports

use serde::Serialize;
use uuid::Uuid;

use crate::failure::Failure;
use crate::name::CheckName;

/// Outcome of one check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub failures: Vec<Failure>,
    pub duration_ms: u64,
}

impl CheckResult {
    #[must_use]
    pub fn new(name: CheckName, failures: Vec<Failure>, duration_ms: u64) -> Self {
        let passed = failures.is_empty();
        Self {
            name: name.as_str().to_string(),
            passed,
            failures,
            duration_ms,
        }
    }
}

/// Result of a full verification run.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub operation_id: Uuid,
    pub results: Vec<CheckResult>,
    pub passed: bool,
    pub duration_ms: u64,
}

impl VerificationReport {
    #[must_use]
    pub fn new(operation_id: Uuid, results: Vec<CheckResult>, duration_ms: u64) -> Self {
        let passed = results.iter().all(|r| r.passed);
        Self {
            operation_id,
            results,
            passed,
            duration_ms,
        }
    }

    /// Number of checks that failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Every failure across all checks, with the owning check name.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Failure)> {
        self.results
            .iter()
            .flat_map(|r| r.failures.iter().map(move |f| (r.name.as_str(), f)))
    }
}
