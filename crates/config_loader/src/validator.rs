//! Configuration validation
//!
//! Rules:
//! - window_size >= 1
//! - peaks_per_hit >= 1
//! - sensitivity is finite and >= 0

use contracts::{ContractError, DetectorConfig};

/// Validate a DetectorConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &DetectorConfig) -> Result<(), ContractError> {
    validate_window(config)?;
    validate_train(config)?;
    validate_sensitivity(config)?;
    Ok(())
}

fn validate_window(config: &DetectorConfig) -> Result<(), ContractError> {
    if config.window_size == 0 {
        return Err(ContractError::config_validation(
            "window_size",
            "window_size must be >= 1",
        ));
    }
    Ok(())
}

fn validate_train(config: &DetectorConfig) -> Result<(), ContractError> {
    if config.peaks_per_hit == 0 {
        return Err(ContractError::config_validation(
            "peaks_per_hit",
            "peaks_per_hit must be >= 1",
        ));
    }
    Ok(())
}

fn validate_sensitivity(config: &DetectorConfig) -> Result<(), ContractError> {
    if !config.sensitivity.is_finite() || config.sensitivity < 0.0 {
        return Err(ContractError::config_validation(
            "sensitivity",
            format!(
                "sensitivity must be a finite value >= 0, got {}",
                config.sensitivity
            ),
        ));
    }
    Ok(())
}
