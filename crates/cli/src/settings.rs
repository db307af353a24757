//! Effective detector configuration: file (or defaults) plus CLI overrides.

use std::path::Path;

use config_loader::ConfigLoader;
use contracts::DetectorConfig;
use tracing::info;

use crate::cli::DetectorOverrides;
use crate::error::{CliError, Result};

/// Load a configuration file
pub fn load_config(path: &Path) -> Result<DetectorConfig> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()));
    }

    info!(config = %path.display(), "Loading configuration");
    ConfigLoader::load_from_path(path).map_err(CliError::Config)
}

/// Resolve the configuration a run should use
///
/// Overrides are applied after the file is loaded, then the result is
/// validated again.
pub fn resolve(overrides: &DetectorOverrides) -> Result<DetectorConfig> {
    let mut config = match overrides.config {
        Some(ref path) => load_config(path)?,
        None => DetectorConfig::default(),
    };

    if let Some(sensitivity) = overrides.sensitivity {
        info!(sensitivity, "Overriding sensitivity from CLI");
        config.sensitivity = sensitivity;
    }
    if let Some(window_size) = overrides.window_size {
        info!(window_size, "Overriding window size from CLI");
        config.window_size = window_size;
    }
    if let Some(peaks_per_hit) = overrides.peaks_per_hit {
        info!(peaks_per_hit, "Overriding peaks per hit from CLI");
        config.peaks_per_hit = peaks_per_hit;
    }
    if let Some(delay) = overrides.delay_after_hit {
        info!(delay_after_hit_ms = delay, "Overriding delay after hit from CLI");
        config.delay_after_hit_ms = delay;
    }
    if let Some(x) = overrides.baseline_x {
        config.baseline.x = x;
    }
    if let Some(y) = overrides.baseline_y {
        config.baseline.y = y;
    }
    if let Some(z) = overrides.baseline_z {
        config.baseline.z = z;
    }

    config_loader::validate(&config).map_err(CliError::Config)?;
    Ok(config)
}
