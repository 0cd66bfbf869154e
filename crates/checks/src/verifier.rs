//! The verifier
//!
//! Walks the battery in order against a borrowed [`Host`]. Checks are
//! independent: each evaluates its own queries, failures accumulate per
//! check, and nothing short-circuits the rest of the run.

use std::path::Path;
use std::time::Instant;

use imgcheck_config::ImageProfile;
use imgcheck_errors::{CheckError, Error};
use imgcheck_events::{
    AppEvent, CheckEvent, CheckTargetSummary, EventEmitter, EventSender, RunMetrics,
};
use imgcheck_host::Host;
use uuid::Uuid;

use crate::failure::Failure;
use crate::name::CheckName;
use crate::report::{CheckResult, VerificationReport};

/// Runs the check battery against a host.
pub struct Verifier<'a, H: Host> {
    host: &'a H,
    profile: &'a ImageProfile,
    tx: EventSender,
}

impl<H: Host> EventEmitter for Verifier<'_, H> {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

impl<'a, H: Host> Verifier<'a, H> {
    pub fn new(host: &'a H, profile: &'a ImageProfile, tx: EventSender) -> Self {
        Self { host, profile, tx }
    }

    /// Run the full battery.
    ///
    /// # Errors
    ///
    /// Does not error on failed checks; those are reported in the
    /// returned report.
    pub fn run(&self) -> Result<VerificationReport, Error> {
        self.run_checks(&CheckName::ALL)
    }

    /// Run a subset of the battery.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection is empty.
    pub fn run_named(&self, names: &[CheckName]) -> Result<VerificationReport, Error> {
        if names.is_empty() {
            return Err(CheckError::EmptySelection.into());
        }
        self.run_checks(names)
    }

    fn run_checks(&self, names: &[CheckName]) -> Result<VerificationReport, Error> {
        let start = Instant::now();
        let operation_id = Uuid::new_v4();

        self.emit(AppEvent::Check(CheckEvent::VerificationStarted {
            operation_id: operation_id.to_string(),
            targets: CheckTargetSummary {
                checks: names.len(),
                packages: Some(self.profile.packages.required.len()),
            },
        }));

        let mut results = Vec::with_capacity(names.len());
        for name in names {
            self.emit(AppEvent::Check(CheckEvent::CheckStarted {
                name: name.as_str().to_string(),
            }));

            let check_start = Instant::now();
            let failures = self.evaluate(*name);
            let duration_ms = elapsed_ms(check_start);

            for failure in &failures {
                self.emit(AppEvent::Check(CheckEvent::FailureReported {
                    operation_id: operation_id.to_string(),
                    failure: failure.to_event(*name),
                }));
            }

            self.emit(AppEvent::Check(CheckEvent::CheckCompleted {
                name: name.as_str().to_string(),
                passed: failures.is_empty(),
                duration_ms,
            }));

            results.push(CheckResult::new(*name, failures, duration_ms));
        }

        let report = VerificationReport::new(operation_id, results, elapsed_ms(start));

        self.emit(AppEvent::Check(CheckEvent::VerificationCompleted {
            operation_id: operation_id.to_string(),
            failed: report.failed_count(),
            metrics: RunMetrics {
                duration_ms: report.duration_ms,
                checks_run: report.results.len(),
            },
        }));

        Ok(report)
    }

    fn evaluate(&self, name: CheckName) -> Vec<Failure> {
        match name {
            CheckName::Packages => self.check_packages(),
            CheckName::User => self.check_users(),
            CheckName::SshConfig => self.check_path_exists(&self.profile.ssh.config_path),
            CheckName::Timezone => self.check_timezone(),
            CheckName::Limits => self.check_path_exists(&self.profile.limits.path),
            CheckName::InitScript => self.check_init_script(),
            CheckName::Locale => self.check_locales(),
        }
    }

    /// Every missing package is its own failure record; duplicates in
    /// the profile produce duplicate records, which is harmless.
    fn check_packages(&self) -> Vec<Failure> {
        let mut failures = Vec::new();
        for package in &self.profile.packages.required {
            match self.host.package_is_installed(package) {
                Ok(true) => {}
                Ok(false) => failures.push(Failure::PackageMissing {
                    package: package.clone(),
                }),
                Err(e) => failures.push(Failure::Query {
                    detail: format!("package {package}: {e}"),
                }),
            }
        }
        failures
    }

    fn check_users(&self) -> Vec<Failure> {
        let mut failures = Vec::new();
        for user in &self.profile.users {
            match self.host.user_exists(&user.name) {
                Ok(true) => match self.host.user_groups(&user.name) {
                    Ok(groups) => {
                        for group in &user.groups {
                            if !groups.contains(group) {
                                failures.push(Failure::GroupMembership {
                                    user: user.name.clone(),
                                    group: group.clone(),
                                });
                            }
                        }
                    }
                    Err(e) => failures.push(Failure::Query {
                        detail: format!("groups of {}: {e}", user.name),
                    }),
                },
                Ok(false) => failures.push(Failure::UserMissing {
                    user: user.name.clone(),
                }),
                Err(e) => failures.push(Failure::Query {
                    detail: format!("user {}: {e}", user.name),
                }),
            }
        }
        failures
    }

    fn check_path_exists(&self, path: &Path) -> Vec<Failure> {
        match self.host.file_exists(path) {
            Ok(true) => Vec::new(),
            Ok(false) => vec![Failure::FileMissing {
                path: path.display().to_string(),
            }],
            Err(e) => vec![Failure::Query {
                detail: format!("{}: {e}", path.display()),
            }],
        }
    }

    /// The localtime path satisfies the check by existing or by being a
    /// symlink; a dangling symlink still counts.
    fn check_timezone(&self) -> Vec<Failure> {
        let path = &self.profile.timezone.localtime_path;
        match (self.host.file_exists(path), self.host.file_is_symlink(path)) {
            (Ok(true), _) | (_, Ok(true)) => Vec::new(),
            (Ok(false), Ok(false)) => vec![Failure::FileMissing {
                path: path.display().to_string(),
            }],
            (Err(e), _) | (_, Err(e)) => vec![Failure::Query {
                detail: format!("{}: {e}", path.display()),
            }],
        }
    }

    /// Mode comparison is exact bitwise equality, never "at least as
    /// permissive".
    fn check_init_script(&self) -> Vec<Failure> {
        let spec = &self.profile.init_script;
        match self.host.file_exists(&spec.path) {
            Ok(true) => match self.host.file_mode(&spec.path) {
                Ok(actual) if actual == spec.mode => Vec::new(),
                Ok(actual) => vec![Failure::ModeMismatch {
                    path: spec.path.display().to_string(),
                    expected: spec.mode,
                    actual,
                }],
                Err(e) => vec![Failure::Query {
                    detail: format!("mode of {}: {e}", spec.path.display()),
                }],
            },
            Ok(false) => vec![Failure::FileMissing {
                path: spec.path.display().to_string(),
            }],
            Err(e) => vec![Failure::Query {
                detail: format!("{}: {e}", spec.path.display()),
            }],
        }
    }

    /// Only stdout is inspected; a non-zero exit fails the check even
    /// if the substring appears elsewhere.
    fn check_locales(&self) -> Vec<Failure> {
        let mut failures = Vec::new();
        for locale in &self.profile.locale.required {
            let command = format!("locale -a | grep {locale}");
            match self.host.run_command(&command) {
                Ok(output) => {
                    if !output.success() {
                        failures.push(Failure::CommandFailed {
                            command,
                            exit_status: output.exit_status,
                        });
                    } else if !output.stdout.contains(locale.as_str()) {
                        failures.push(Failure::LocaleMissing {
                            locale: locale.clone(),
                        });
                    }
                }
                Err(e) => failures.push(Failure::Query {
                    detail: format!("locale {locale}: {e}"),
                }),
            }
        }
        failures
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
