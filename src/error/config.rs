//! Configuration errors.

use std::fmt;

/// Errors building the viewer configuration from args and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A flag that takes a value was last on the command line.
    MissingValue { flag: String },

    /// An argument the viewer does not recognize.
    UnknownArgument { argument: String },

    /// A value that could not be parsed.
    InvalidValue { key: String, value: String },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::MissingValue { .. } => "CONFIG_MISSING_VALUE",
            ConfigError::UnknownArgument { .. } => "CONFIG_UNKNOWN_ARG",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingValue { flag } => write!(f, "{} requires a value", flag),
            ConfigError::UnknownArgument { argument } => {
                write!(f, "Unknown argument: {}", argument)
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: {}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
