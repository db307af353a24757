//! Layered error definitions
//!
//! Categorized by source: config / sample source / general

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sample Source Errors =====
    /// A sample field could not be parsed (strict parsing only)
    #[error("sample parse error in '{source_id}' line {line}, field '{field}': {message}")]
    SampleParse {
        source_id: String,
        line: u64,
        field: &'static str,
        message: String,
    },

    /// The sample source could not be opened or read
    #[error("sample source '{source_id}' unavailable: {message}")]
    SourceUnavailable { source_id: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sample parse error
    pub fn sample_parse(
        source_id: impl Into<String>,
        line: u64,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::SampleParse {
            source_id: source_id.into(),
            line,
            field,
            message: message.into(),
        }
    }

    /// Create source unavailable error
    pub fn source_unavailable(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_id: source_id.into(),
            message: message.into(),
        }
    }
}
