//! Detector configuration contracts shared across crates.
//!
//! All parameters are fixed at initialization; nothing is reconfigured at runtime.

use serde::{Deserialize, Serialize};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Sliding window capacity (samples)
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Peaks forming one full train
    #[serde(default = "default_peaks_per_hit")]
    pub peaks_per_hit: u32,

    /// Silence timeout ending a partial train (milliseconds)
    #[serde(default = "default_delay_after_hit_ms")]
    pub delay_after_hit_ms: u64,

    /// Threshold multiplier on the window standard deviation
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,

    /// Per-axis rest offsets
    #[serde(default)]
    pub baseline: Baseline,
}

fn default_window_size() -> usize {
    50
}

fn default_peaks_per_hit() -> u32 {
    4
}

fn default_delay_after_hit_ms() -> u64 {
    250
}

fn default_sensitivity() -> f64 {
    4.0
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            version: ConfigVersion::default(),
            window_size: default_window_size(),
            peaks_per_hit: default_peaks_per_hit(),
            delay_after_hit_ms: default_delay_after_hit_ms(),
            sensitivity: default_sensitivity(),
            baseline: Baseline::default(),
        }
    }
}

/// At-rest accelerometer offsets
///
/// For a digital accelerometer X and Y rest at zero and Z at
/// `-adc_range / accel_range` (a 12-bit ADC on a ±4g part gives -512).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default = "default_z_baseline")]
    pub z: i32,
}

fn default_z_baseline() -> i32 {
    -512
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            z: default_z_baseline(),
        }
    }
}
