//! imgcheck - post-build verification for container images
//!
//! This is the CLI application that loads configuration and an image
//! profile, runs the check battery against the local system, and
//! renders the verification report.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use imgcheck_checks::{CheckName, VerificationReport, Verifier};
use imgcheck_config::{Config, ImageProfile};
use imgcheck_events::EventEmitter;
use imgcheck_host::{LocalHost, PackageBackend};
use imgcheck_types::{ColorChoice, OutputFormat};
use std::path::Path;
use std::process;
use std::thread;
use tracing::{error, info};

fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    // Initialize tracing with JSON awareness
    init_tracing(json_mode, cli.global.debug);

    // Run the application and handle errors
    match run(cli) {
        Ok(true) => {}
        Ok(false) => {
            // At least one check failed; the report already says which
            process::exit(1);
        }
        Err(e) => {
            error!("Application error: {}", e);
            if !json_mode {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}

/// Main application logic. Returns whether the run was fully successful.
fn run(cli: Cli) -> Result<bool, CliError> {
    info!("Starting imgcheck v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref())?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    let json_mode = cli.global.json || config.general.default_output == OutputFormat::Json;
    let color = cli.global.color.unwrap_or(config.general.color);

    let renderer = OutputRenderer::new(json_mode, color);
    let colors_enabled = match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stdout().features().colors_supported(),
    };

    let result = match cli.command {
        Commands::Verify {
            profile,
            checks,
            package_backend,
        } => {
            let profile_path = profile.or_else(|| config.paths.profile_path.clone());
            let profile = load_profile(profile_path.as_deref())?;
            let names = parse_check_names(&checks)?;

            let report = verify(
                &profile,
                &names,
                package_backend.as_deref(),
                colors_enabled,
                cli.global.debug,
                json_mode,
            )?;

            renderer.render_report(&report)?;
            report.passed
        }

        Commands::Checks => {
            renderer.render_checks()?;
            true
        }

        Commands::Profile { profile } => {
            let profile_path = profile.or_else(|| config.paths.profile_path.clone());
            let profile = load_profile(profile_path.as_deref())?;
            renderer.render_profile(&profile.to_toml()?)?;
            true
        }
    };

    info!("Command completed successfully");
    Ok(result)
}

/// Run the battery with event handling on a display thread. The
/// verifier itself stays single-threaded.
fn verify(
    profile: &ImageProfile,
    names: &[CheckName],
    package_backend: Option<&str>,
    colors_enabled: bool,
    debug: bool,
    json_mode: bool,
) -> Result<VerificationReport, CliError> {
    let host = match package_backend {
        Some(backend) => LocalHost::with_backend(backend.parse::<PackageBackend>().map_err(
            |_| CliError::InvalidArguments(format!("unknown package backend: {backend}")),
        )?),
        None => LocalHost::detect()?,
    };

    let (tx, rx) = imgcheck_events::channel();
    let mut handler = EventHandler::new(colors_enabled, debug, json_mode);
    let handler_thread = thread::spawn(move || {
        for event in rx.iter() {
            handler.handle_event(&event);
        }
    });

    for warning in profile.lint() {
        tx.emit_warning(warning);
    }

    let report = {
        let verifier = Verifier::new(&host, profile, tx.clone());
        if names.is_empty() {
            verifier.run()
        } else {
            verifier.run_named(names)
        }
    }?;

    // All senders must be gone before the handler thread can drain out
    drop(tx);
    let _ = handler_thread.join();

    Ok(report)
}

fn load_profile(path: Option<&Path>) -> Result<ImageProfile, CliError> {
    match path {
        Some(p) => Ok(ImageProfile::load_from_file(p)?),
        None => Ok(ImageProfile::baseline()),
    }
}

fn parse_check_names(raw: &[String]) -> Result<Vec<CheckName>, CliError> {
    raw.iter()
        .map(|s| {
            s.parse::<CheckName>()
                .map_err(|e| CliError::InvalidArguments(e.to_string()))
        })
        .collect()
}

fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    // Check if debug logging is enabled
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if !debug_enabled {
        // Disable all logging; the event handler owns console output
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,imgcheck=debug"));

    if json_mode {
        // Structured logs to stderr so stdout stays valid JSON
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    }
}
