//! Structured logging integration for events
//!
//! Converts domain events into tracing records with structured fields
//! so observability tools see the same stream the console does.

use imgcheck_events::{AppEvent, CheckEvent, GeneralEvent};
use tracing::{debug, error, info, warn};

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    match event {
        AppEvent::Check(check_event) => match check_event {
            CheckEvent::VerificationStarted {
                operation_id,
                targets,
            } => {
                info!(
                    operation_id = %operation_id,
                    checks = targets.checks,
                    packages = ?targets.packages,
                    "Verification started"
                );
            }
            CheckEvent::CheckStarted { name } => {
                debug!(check = %name, "Check started");
            }
            CheckEvent::CheckCompleted {
                name,
                passed,
                duration_ms,
            } => {
                if *passed {
                    info!(check = %name, duration_ms, "Check passed");
                } else {
                    warn!(check = %name, duration_ms, "Check failed");
                }
            }
            CheckEvent::FailureReported {
                operation_id,
                failure,
            } => {
                error!(
                    operation_id = %operation_id,
                    check = %failure.check,
                    kind = %failure.kind,
                    expected = ?failure.expected,
                    actual = ?failure.actual,
                    message = %failure.message,
                    "Check failure"
                );
            }
            CheckEvent::VerificationCompleted {
                operation_id,
                failed,
                metrics,
            } => {
                if *failed == 0 {
                    info!(
                        operation_id = %operation_id,
                        checks_run = metrics.checks_run,
                        duration_ms = metrics.duration_ms,
                        "Verification passed"
                    );
                } else {
                    error!(
                        operation_id = %operation_id,
                        failed = failed,
                        checks_run = metrics.checks_run,
                        duration_ms = metrics.duration_ms,
                        "Verification failed"
                    );
                }
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::OperationStarted { operation } => {
                info!(operation = %operation, "Operation started");
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                if *success {
                    info!(operation = %operation, "Operation completed successfully");
                } else {
                    warn!(operation = %operation, "Operation completed with issues");
                }
            }
            GeneralEvent::OperationFailed { operation, error } => {
                error!(operation = %operation, error = %error, "Operation failed");
            }
            GeneralEvent::Warning { message, context } => {
                warn!(message = %message, context = ?context, "Warning");
            }
            GeneralEvent::Error { message, details } => {
                error!(message = %message, details = ?details, "Error");
            }
            GeneralEvent::DebugLog { message } => {
                debug!(message = %message, "Debug log");
            }
        },
    }
}
