//! Configuration and profile error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("invalid config: {message}")]
    Invalid { message: String },

    #[error("parse error: {message}")]
    ParseError { message: String },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("profile not found: {path}")]
    ProfileNotFound { path: String },

    #[error("invalid file mode {value}: expected an octal string such as \"0755\"")]
    InvalidMode { value: String },

    #[error("failed to serialize config: {error}")]
    SerializeError { error: String },
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => {
                Some("Provide a configuration file or rely on the built-in defaults.")
            }
            Self::ProfileNotFound { .. } => {
                Some("Pass --profile with the path to an image profile TOML file.")
            }
            Self::InvalidMode { .. } => {
                Some("Write file modes as quoted octal strings, e.g. mode = \"0755\".")
            }
            Self::InvalidValue { .. } | Self::Invalid { .. } | Self::ParseError { .. } => {
                Some("Fix the configuration value and retry the command.")
            }
            _ => None,
        }
    }
}
