//! # Observability
//!
//! Tracing initialization and detector metrics.
//!
//! ## Features
//!
//! - Tracing initialization (JSON/Pretty/Compact)
//! - `metrics` facade recording for samples, peaks and hits
//! - In-memory aggregation for end-of-run summaries
//!
//! No exporter is installed here. Without a global recorder the `metrics`
//! macros are no-ops, so embedding applications decide where numbers go.
//!
//! ## Example
//!
//! ```ignore
//! use observability::{init_with_config, ObservabilityConfig};
//!
//! init_with_config(ObservabilityConfig::default())?;
//!
//! let mut aggregator = observability::DetectionMetricsAggregator::new();
//! if let Some(hit) = detector.process(&reading) {
//!     aggregator.record_hit(&hit);
//! }
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use crate::metrics::{
    record_calibration_complete, record_hit, record_parse_error, record_peak, record_sample,
    record_threshold, DetectionMetricsAggregator, MetricsSummary, RunningStats, StatsSummary,
};

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log format
    pub log_format: LogFormat,
    /// Default log level when `RUST_LOG` is unset
    pub default_log_level: String,
    /// Ignore `RUST_LOG` and use `default_log_level` only
    pub ignore_env: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Compact,
            default_log_level: "info".to_string(),
            ignore_env: false,
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable multi-line format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

/// Initialize tracing with default settings
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

/// Initialize tracing with a custom configuration
///
/// Logs always go to stderr so stdout stays free for results.
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = if config.ignore_env {
        EnvFilter::new(&config.default_log_level)
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level))
    };

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        log_format = ?config.log_format,
        level = %config.default_log_level,
        "Observability initialized"
    );

    Ok(())
}
