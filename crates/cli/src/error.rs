//! Error types for CLI operations.

use contracts::ContractError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration could not be loaded or is invalid
    #[error("Invalid configuration: {0}")]
    Config(#[source] ContractError),

    /// Input could not be opened or parsed
    #[error("Input error: {0}")]
    Input(#[source] ContractError),

    /// Replay option out of range
    #[error("Invalid option '{option}': {message}")]
    InvalidOption {
        option: &'static str,
        message: String,
    },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn invalid_option(option: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
