//! Command line interface definition

use clap::{Parser, Subcommand};
use imgcheck_types::ColorChoice;
use std::path::PathBuf;

/// imgcheck - post-build verification for container images
#[derive(Parser)]
#[command(name = "imgcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Post-build verification for container images")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Verify the image against a profile
    #[command(alias = "v")]
    Verify {
        /// Image profile TOML file (default: the built-in baseline)
        #[arg(long, value_name = "PATH")]
        profile: Option<PathBuf>,

        /// Run only the named checks (repeatable; see `imgcheck checks`)
        #[arg(long = "check", value_name = "NAME")]
        checks: Vec<String>,

        /// Package database backend: dpkg or rpm (default: auto-detect)
        #[arg(long, value_name = "BACKEND")]
        package_backend: Option<String>,
    },

    /// List the check battery
    Checks,

    /// Print the effective image profile as TOML
    Profile {
        /// Image profile TOML file (default: the built-in baseline)
        #[arg(long, value_name = "PATH")]
        profile: Option<PathBuf>,
    },
}
