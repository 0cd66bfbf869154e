#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for imgcheck
//!
//! This crate handles loading and merging tool configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/imgcheck/config.toml)
//! - Environment variables
//! - CLI flags
//!
//! It also owns the image profile format: the expectation set a host is
//! verified against (see [`profile`]).

pub mod profile;

pub use profile::{
    ImageProfile, InitScriptSpec, LimitsSpec, LocaleSpec, PackageSpec, SshSpec, TimezoneSpec,
    UserSpec,
};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use imgcheck_errors::{ConfigError, Error};
use imgcheck_types::{ColorChoice, OutputFormat};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Image profile to verify against when --profile is not given.
    pub profile_path: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: OutputFormat::Tty,
            color: ColorChoice::Auto,
        }
    }
}

// Default value functions for serde
fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("imgcheck").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path.display().to_string(),
        })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// If path is provided, loads from that file.
    /// If path is None, uses the default loading behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load(),
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // IMGCHECK_OUTPUT
        if let Ok(output) = std::env::var("IMGCHECK_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "IMGCHECK_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        // IMGCHECK_COLOR
        if let Ok(color) = std::env::var("IMGCHECK_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "IMGCHECK_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // IMGCHECK_PROFILE
        if let Ok(profile) = std::env::var("IMGCHECK_PROFILE") {
            self.paths.profile_path = Some(PathBuf::from(profile));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_file_missing() {
        let config = Config::load_or_default(Some(Path::new("/nonexistent/config.toml")));
        assert!(config.is_err());

        let config = Config::default();
        assert_eq!(config.general.default_output, OutputFormat::Tty);
        assert_eq!(config.general.color, ColorChoice::Auto);
        assert!(config.paths.profile_path.is_none());
    }

    #[test]
    fn loads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[general]\ncolor = \"never\"").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.general.color, ColorChoice::Never);
        // Unspecified fields fall back to serde defaults
        assert_eq!(config.general.default_output, OutputFormat::Tty);
    }

    #[test]
    fn rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "general = not toml").unwrap();

        assert!(Config::load_from_file(&path).is_err());
    }
}
