//! Integration tests for the check battery
//!
//! All tests run against an in-memory host so every query result is
//! controlled exactly.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use imgcheck_checks::{CheckName, Failure, Verifier};
use imgcheck_config::{ImageProfile, LocaleSpec, PackageSpec, UserSpec};
use imgcheck_errors::{CheckError, Error, HostError};
use imgcheck_events::{AppEvent, CheckEvent, EventReceiver};
use imgcheck_host::{CommandOutput, Host};
use imgcheck_types::FileMode;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
struct FakeFile {
    exists: bool,
    symlink: bool,
    mode: u32,
}

/// In-memory host: every capability is a lookup table.
#[derive(Debug, Clone, Default)]
struct FakeHost {
    installed: BTreeSet<String>,
    files: BTreeMap<PathBuf, FakeFile>,
    users: BTreeMap<String, BTreeSet<String>>,
    commands: BTreeMap<String, (Option<i32>, String)>,
    fail_package_queries: bool,
    fail_commands: bool,
}

impl FakeHost {
    fn with_package(mut self, name: &str) -> Self {
        self.installed.insert(name.to_string());
        self
    }

    fn with_user(mut self, name: &str, groups: &[&str]) -> Self {
        self.users.insert(
            name.to_string(),
            groups.iter().map(ToString::to_string).collect(),
        );
        self
    }

    fn with_file(mut self, path: &str, mode: u32) -> Self {
        self.files.insert(
            PathBuf::from(path),
            FakeFile {
                exists: true,
                symlink: false,
                mode,
            },
        );
        self
    }

    fn with_dangling_symlink(mut self, path: &str) -> Self {
        self.files.insert(
            PathBuf::from(path),
            FakeFile {
                exists: false,
                symlink: true,
                mode: 0o777,
            },
        );
        self
    }

    fn with_command(mut self, command: &str, exit_status: Option<i32>, stdout: &str) -> Self {
        self.commands
            .insert(command.to_string(), (exit_status, stdout.to_string()));
        self
    }
}

impl Host for FakeHost {
    fn package_is_installed(&self, name: &str) -> Result<bool, Error> {
        if self.fail_package_queries {
            return Err(HostError::PackageQuery {
                name: name.to_string(),
                reason: "database unavailable".to_string(),
            }
            .into());
        }
        Ok(self.installed.contains(name))
    }

    fn file_exists(&self, path: &Path) -> Result<bool, Error> {
        Ok(self.files.get(path).is_some_and(|f| f.exists))
    }

    fn file_is_symlink(&self, path: &Path) -> Result<bool, Error> {
        Ok(self.files.get(path).is_some_and(|f| f.symlink))
    }

    fn file_mode(&self, path: &Path) -> Result<FileMode, Error> {
        match self.files.get(path) {
            Some(f) if f.exists => Ok(FileMode::from_raw(f.mode)),
            _ => Err(HostError::Metadata {
                path: path.display().to_string(),
                message: "no such file".to_string(),
            }
            .into()),
        }
    }

    fn user_exists(&self, name: &str) -> Result<bool, Error> {
        Ok(self.users.contains_key(name))
    }

    fn user_groups(&self, name: &str) -> Result<BTreeSet<String>, Error> {
        self.users.get(name).cloned().ok_or_else(|| {
            HostError::UserQuery {
                name: name.to_string(),
                reason: "no such user".to_string(),
            }
            .into()
        })
    }

    fn run_command(&self, command: &str) -> Result<CommandOutput, Error> {
        if self.fail_commands {
            return Err(HostError::CommandFailed {
                command: command.to_string(),
                message: "no shell available".to_string(),
            }
            .into());
        }
        let (exit_status, stdout) = self
            .commands
            .get(command)
            .cloned()
            .unwrap_or((Some(127), String::new()));
        Ok(CommandOutput {
            exit_status,
            stdout,
            stderr: String::new(),
        })
    }
}

/// Small profile exercising every check.
fn profile() -> ImageProfile {
    ImageProfile {
        packages: PackageSpec {
            required: vec!["curl".to_string(), "git".to_string()],
        },
        users: vec![UserSpec {
            name: "gpadmin".to_string(),
            groups: vec!["gpadmin".to_string()],
        }],
        locale: LocaleSpec {
            required: vec!["en_US.utf8".to_string()],
        },
        ..ImageProfile::default()
    }
}

/// A host that satisfies [`profile`] completely.
fn conforming_host() -> FakeHost {
    FakeHost::default()
        .with_package("curl")
        .with_package("git")
        .with_user("gpadmin", &["gpadmin"])
        .with_file("/etc/ssh/sshd_config", 0o644)
        .with_file("/etc/localtime", 0o644)
        .with_file("/etc/security/limits.d/90-cbdb-limits", 0o644)
        .with_file("/tmp/init_system.sh", 0o755)
        .with_command("locale -a | grep en_US.utf8", Some(0), "en_US.utf8\n")
}

fn run(host: &FakeHost, profile: &ImageProfile) -> imgcheck_checks::VerificationReport {
    let (tx, _rx) = imgcheck_events::channel();
    Verifier::new(host, profile, tx).run().unwrap()
}

fn run_with_events(
    host: &FakeHost,
    profile: &ImageProfile,
) -> (imgcheck_checks::VerificationReport, EventReceiver) {
    let (tx, rx) = imgcheck_events::channel();
    let report = Verifier::new(host, profile, tx).run().unwrap();
    (report, rx)
}

fn result_of<'a>(
    report: &'a imgcheck_checks::VerificationReport,
    name: CheckName,
) -> &'a imgcheck_checks::CheckResult {
    report
        .results
        .iter()
        .find(|r| r.name == name.as_str())
        .expect("check missing from report")
}

#[test]
fn conforming_host_passes_every_check() {
    let report = run(&conforming_host(), &profile());
    assert!(report.passed);
    assert_eq!(report.results.len(), CheckName::ALL.len());
    assert_eq!(report.failed_count(), 0);
}

#[test]
fn missing_package_is_named() {
    let mut host = conforming_host();
    host.installed.remove("git");

    let report = run(&host, &profile());
    assert!(!report.passed);

    let packages = result_of(&report, CheckName::Packages);
    assert!(!packages.passed);
    assert_eq!(packages.failures.len(), 1);
    assert!(matches!(
        &packages.failures[0],
        Failure::PackageMissing { package } if package == "git"
    ));

    // Other checks are unaffected
    assert!(result_of(&report, CheckName::User).passed);
    assert!(result_of(&report, CheckName::Locale).passed);
}

#[test]
fn all_missing_packages_are_reported() {
    let mut host = conforming_host();
    host.installed.clear();

    let report = run(&host, &profile());
    let packages = result_of(&report, CheckName::Packages);
    assert_eq!(packages.failures.len(), 2);
}

#[test]
fn duplicate_package_entries_are_harmless() {
    let mut profile = profile();
    profile.packages.required = vec!["flex".to_string(), "flex".to_string()];

    let host = conforming_host().with_package("flex");
    assert!(result_of(&run(&host, &profile), CheckName::Packages).passed);

    let mut host = host;
    host.installed.remove("flex");
    let report = run(&host, &profile);
    let packages = result_of(&report, CheckName::Packages);
    assert!(!packages.passed);
    // One record per profile entry, but the verdict matches a single entry
    assert_eq!(packages.failures.len(), 2);
}

#[test]
fn user_check_requires_existence_and_membership() {
    let profile = profile();

    // User absent entirely
    let mut host = conforming_host();
    host.users.clear();
    let report = run(&host, &profile);
    let user = result_of(&report, CheckName::User);
    assert!(matches!(
        &user.failures[0],
        Failure::UserMissing { user } if user == "gpadmin"
    ));

    // User present but not in its own group
    let host = {
        let mut h = conforming_host();
        h.users.clear();
        h.with_user("gpadmin", &["staff"])
    };
    let report = run(&host, &profile);
    let user = result_of(&report, CheckName::User);
    assert!(matches!(
        &user.failures[0],
        Failure::GroupMembership { user, group } if user == "gpadmin" && group == "gpadmin"
    ));

    // Fully configured
    assert!(result_of(&run(&conforming_host(), &profile), CheckName::User).passed);
}

#[test]
fn file_checks_track_filesystem_state() {
    let profile = profile();

    let with_config = conforming_host();
    assert!(result_of(&run(&with_config, &profile), CheckName::SshConfig).passed);

    let mut without_config = conforming_host();
    without_config.files.remove(Path::new("/etc/ssh/sshd_config"));
    let report = run(&without_config, &profile);
    let ssh = result_of(&report, CheckName::SshConfig);
    assert!(!ssh.passed);
    assert!(matches!(
        &ssh.failures[0],
        Failure::FileMissing { path } if path == "/etc/ssh/sshd_config"
    ));

    // No caching: the same profile against the restored state passes again
    assert!(result_of(&run(&with_config, &profile), CheckName::SshConfig).passed);
}

#[test]
fn timezone_accepts_regular_file_or_symlink() {
    let profile = profile();

    assert!(result_of(&run(&conforming_host(), &profile), CheckName::Timezone).passed);

    // A dangling symlink still satisfies the check
    let mut host = conforming_host();
    host.files.remove(Path::new("/etc/localtime"));
    let host = host.with_dangling_symlink("/etc/localtime");
    assert!(result_of(&run(&host, &profile), CheckName::Timezone).passed);

    // Nothing at the path at all
    let mut host = conforming_host();
    host.files.remove(Path::new("/etc/localtime"));
    let report = run(&host, &profile);
    assert!(!result_of(&report, CheckName::Timezone).passed);
}

#[test]
fn init_script_mode_must_match_exactly() {
    let profile = profile();

    for wrong in [0o750, 0o775, 0o777] {
        let host = conforming_host().with_file("/tmp/init_system.sh", wrong);
        let report = run(&host, &profile);
        let script = result_of(&report, CheckName::InitScript);
        assert!(!script.passed, "mode {wrong:o} must not pass");
        match &script.failures[0] {
            Failure::ModeMismatch {
                expected, actual, ..
            } => {
                assert_eq!(*expected, FileMode::from_raw(0o755));
                assert_eq!(*actual, FileMode::from_raw(wrong));
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    assert!(
        result_of(&run(&conforming_host(), &profile), CheckName::InitScript).passed,
        "exact 0755 must pass"
    );

    let mut host = conforming_host();
    host.files.remove(Path::new("/tmp/init_system.sh"));
    let report = run(&host, &profile);
    assert!(matches!(
        &result_of(&report, CheckName::InitScript).failures[0],
        Failure::FileMissing { .. }
    ));
}

#[test]
fn locale_check_inspects_exit_status_and_stdout() {
    let profile = profile();
    let command = "locale -a | grep en_US.utf8";

    // Exit 0 with the substring present
    let host = conforming_host().with_command(command, Some(0), "en_US.utf8\n");
    assert!(result_of(&run(&host, &profile), CheckName::Locale).passed);

    // Non-zero exit fails even with empty output
    let host = conforming_host().with_command(command, Some(1), "");
    let report = run(&host, &profile);
    assert!(matches!(
        &result_of(&report, CheckName::Locale).failures[0],
        Failure::CommandFailed { exit_status: Some(1), .. }
    ));

    // Exit 0 but the wrong locale listed
    let host = conforming_host().with_command(command, Some(0), "fr_FR.utf8\n");
    let report = run(&host, &profile);
    assert!(matches!(
        &result_of(&report, CheckName::Locale).failures[0],
        Failure::LocaleMissing { locale } if locale == "en_US.utf8"
    ));

    // Terminated by a signal can never pass
    let host = conforming_host().with_command(command, None, "en_US.utf8\n");
    let report = run(&host, &profile);
    assert!(!result_of(&report, CheckName::Locale).passed);
}

#[test]
fn query_errors_fail_closed_without_aborting_the_run() {
    let mut host = conforming_host();
    host.fail_package_queries = true;

    let report = run(&host, &profile());
    let packages = result_of(&report, CheckName::Packages);
    assert!(!packages.passed);
    assert!(matches!(&packages.failures[0], Failure::Query { .. }));

    // Every other check still ran and passed
    assert_eq!(report.results.len(), CheckName::ALL.len());
    assert!(result_of(&report, CheckName::User).passed);
    assert!(result_of(&report, CheckName::Locale).passed);
}

#[test]
fn broken_command_execution_fails_only_the_locale_check() {
    let mut host = conforming_host();
    host.fail_commands = true;

    let report = run(&host, &profile());
    assert!(matches!(
        &result_of(&report, CheckName::Locale).failures[0],
        Failure::Query { .. }
    ));
    assert_eq!(report.failed_count(), 1);
}

#[test]
fn fully_broken_host_surfaces_every_misconfiguration() {
    let report = run(&FakeHost::default(), &profile());
    assert_eq!(report.failed_count(), CheckName::ALL.len());
    assert_eq!(report.results.len(), CheckName::ALL.len());
}

#[test]
fn runs_are_idempotent() {
    let host = {
        let mut h = conforming_host();
        h.installed.remove("curl");
        h
    };
    let profile = profile();

    let first = run(&host, &profile);
    let second = run(&host, &profile);

    for (a, b) in first.results.iter().zip(second.results.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.passed, b.passed);
        assert_eq!(a.failures.len(), b.failures.len());
    }
}

#[test]
fn check_order_does_not_affect_outcomes() {
    let host = {
        let mut h = conforming_host();
        h.installed.remove("curl");
        h.files.remove(Path::new("/tmp/init_system.sh"));
        h
    };
    let profile = profile();
    let (tx, _rx) = imgcheck_events::channel();
    let verifier = Verifier::new(&host, &profile, tx);

    let forward = verifier.run_named(&CheckName::ALL).unwrap();
    let mut reversed_names = CheckName::ALL;
    reversed_names.reverse();
    let reversed = verifier.run_named(&reversed_names).unwrap();

    for name in CheckName::ALL {
        let a = result_of(&forward, name);
        let b = result_of(&reversed, name);
        assert_eq!(a.passed, b.passed, "{name} outcome changed with order");
    }
}

#[test]
fn empty_selection_is_rejected() {
    let host = conforming_host();
    let profile = profile();
    let (tx, _rx) = imgcheck_events::channel();
    let verifier = Verifier::new(&host, &profile, tx);

    match verifier.run_named(&[]) {
        Err(Error::Check(CheckError::EmptySelection)) => {}
        other => panic!("expected EmptySelection, got {other:?}"),
    }
}

#[test]
fn run_emits_lifecycle_and_failure_events() {
    let mut host = conforming_host();
    host.installed.remove("git");

    let (report, rx) = run_with_events(&host, &profile());
    let events: Vec<AppEvent> = rx.try_iter().collect();

    assert!(matches!(
        events.first(),
        Some(AppEvent::Check(CheckEvent::VerificationStarted { .. }))
    ));
    assert!(matches!(
        events.last(),
        Some(AppEvent::Check(CheckEvent::VerificationCompleted { failed: 1, .. }))
    ));

    let reported = events
        .iter()
        .filter(|e| matches!(e, AppEvent::Check(CheckEvent::FailureReported { .. })))
        .count();
    assert_eq!(reported, report.failures().count());

    let completed = events
        .iter()
        .filter(|e| matches!(e, AppEvent::Check(CheckEvent::CheckCompleted { .. })))
        .count();
    assert_eq!(completed, CheckName::ALL.len());
}

#[test]
fn report_serializes_with_stable_failure_kinds() {
    let host = conforming_host().with_file("/tmp/init_system.sh", 0o777);
    let report = run(&host, &profile());

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"kind\":\"mode_mismatch\""));
    assert!(json.contains("\"expected\":\"0755\""));
    assert!(json.contains("\"actual\":\"0777\""));
}

proptest! {
    /// The packages check passes exactly when the required set is a
    /// subset of the installed set, regardless of duplicates.
    #[test]
    fn packages_pass_iff_required_is_subset_of_installed(
        required in proptest::collection::vec("[a-c]{1,2}", 0..6),
        installed in proptest::collection::btree_set("[a-c]{1,2}", 0..6),
    ) {
        let profile = ImageProfile {
            packages: PackageSpec { required: required.clone() },
            ..ImageProfile::default()
        };
        let host = FakeHost {
            installed: installed.clone(),
            ..FakeHost::default()
        };

        let (tx, _rx) = imgcheck_events::channel();
        let report = Verifier::new(&host, &profile, tx)
            .run_named(&[CheckName::Packages])
            .unwrap();

        let expected = required.iter().all(|p| installed.contains(p));
        prop_assert_eq!(report.passed, expected);
    }
}
