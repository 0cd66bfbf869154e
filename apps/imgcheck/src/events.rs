//! Event handling and progress display

use console::Style;
use imgcheck_events::{AppEvent, CheckEvent, GeneralEvent};

/// Event handler for progress display and user feedback
pub struct EventHandler {
    colors_enabled: bool,
    debug: bool,
    /// Suppress console output entirely (JSON mode)
    quiet: bool,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(colors_enabled: bool, debug: bool, quiet: bool) -> Self {
        Self {
            colors_enabled,
            debug,
            quiet,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: &AppEvent) {
        crate::logging::log_event_with_tracing(event);

        if self.quiet {
            return;
        }

        match event {
            AppEvent::Check(check_event) => self.handle_check_event(check_event),
            AppEvent::General(general_event) => self.handle_general_event(general_event),
        }
    }

    fn handle_check_event(&self, event: &CheckEvent) {
        match event {
            CheckEvent::VerificationStarted { targets, .. } => {
                println!("Verifying image ({} checks)...", targets.checks);
            }
            CheckEvent::CheckStarted { name } => {
                if self.debug {
                    println!("  running {name}");
                }
            }
            CheckEvent::CheckCompleted {
                name,
                passed,
                duration_ms,
            } => {
                if *passed {
                    println!("  {} {name} ({duration_ms}ms)", self.pass_marker());
                } else {
                    println!("  {} {name} ({duration_ms}ms)", self.fail_marker());
                }
            }
            CheckEvent::FailureReported { failure, .. } => {
                println!("      {}", failure.message);
            }
            CheckEvent::VerificationCompleted { failed, metrics, .. } => {
                if *failed == 0 {
                    println!(
                        "All {} checks passed in {}ms.",
                        metrics.checks_run, metrics.duration_ms
                    );
                } else {
                    println!(
                        "{failed} of {} checks failed ({}ms).",
                        metrics.checks_run, metrics.duration_ms
                    );
                }
            }
        }
    }

    fn handle_general_event(&self, event: &GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, .. } => {
                eprintln!("{} {message}", self.styled("warning:", Style::new().yellow()));
            }
            GeneralEvent::Error { message, .. } => {
                eprintln!("{} {message}", self.styled("error:", Style::new().red()));
            }
            GeneralEvent::DebugLog { message } => {
                if self.debug {
                    eprintln!("debug: {message}");
                }
            }
            _ => {}
        }
    }

    fn pass_marker(&self) -> String {
        self.styled("[PASS]", Style::new().green())
    }

    fn fail_marker(&self) -> String {
        self.styled("[FAIL]", Style::new().red().bold())
    }

    fn styled(&self, text: &str, style: Style) -> String {
        if self.colors_enabled {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}
