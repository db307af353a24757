//! Detector metrics
//!
//! Facade recording (`counter!`/`gauge!`/`histogram!`) plus an in-memory
//! aggregator used for end-of-run summaries.

use std::collections::HashMap;

use contracts::{HitEvent, HitKind};
use metrics::{counter, gauge, histogram};

/// Record one processed sample
///
/// `calibrating` marks samples consumed by the startup window fill.
pub fn record_sample(magnitude: u64, calibrating: bool) {
    let phase = if calibrating { "calibrating" } else { "steady" };
    counter!("hitdetect_samples_total", "phase" => phase).increment(1);
    gauge!("hitdetect_magnitude").set(magnitude as f64);
}

/// Record the end of startup calibration
pub fn record_calibration_complete(threshold: u64) {
    counter!("hitdetect_calibrations_total").increment(1);
    gauge!("hitdetect_threshold").set(threshold as f64);
}

/// Record the threshold after a window update
pub fn record_threshold(threshold: u64) {
    gauge!("hitdetect_threshold").set(threshold as f64);
    histogram!("hitdetect_threshold_hist").record(threshold as f64);
}

/// Record a rising-edge peak
pub fn record_peak(magnitude: u64, threshold: u64) {
    counter!("hitdetect_peaks_total").increment(1);
    histogram!("hitdetect_peak_excess").record(magnitude.saturating_sub(threshold) as f64);
}

/// Record a finalized hit
pub fn record_hit(hit: &HitEvent) {
    counter!("hitdetect_hits_total", "kind" => hit.kind.as_str()).increment(1);
    gauge!("hitdetect_hit_count").set(hit.hit_number as f64);
    histogram!("hitdetect_peaks_per_hit").record(hit.peaks as f64);
}

/// Record a sample the source failed to parse
pub fn record_parse_error(source_id: &str) {
    counter!(
        "hitdetect_parse_errors_total",
        "source_id" => source_id.to_string()
    )
    .increment(1);
}

/// Detection metrics aggregator
///
/// Aggregates in memory for summaries printed at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct DetectionMetricsAggregator {
    /// Samples seen (calibration included)
    pub total_samples: u64,

    /// Samples consumed by calibration
    pub calibration_samples: u64,

    /// Rising-edge peaks
    pub total_peaks: u64,

    /// Hits by finalization rule
    pub hits_by_kind: HashMap<HitKind, u64>,

    /// Steady-state magnitude statistics
    pub magnitude_stats: RunningStats,

    /// Threshold statistics (steady state)
    pub threshold_stats: RunningStats,

    /// Interval between consecutive hits (ms)
    pub interval_stats: RunningStats,

    last_hit_timestamp: Option<u64>,
}

impl DetectionMetricsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sample; `threshold` is `None` while calibrating
    pub fn record_sample(&mut self, magnitude: u64, threshold: Option<u64>) {
        self.total_samples += 1;
        match threshold {
            Some(threshold) => {
                self.magnitude_stats.push(magnitude as f64);
                self.threshold_stats.push(threshold as f64);
            }
            None => self.calibration_samples += 1,
        }
    }

    /// Record a rising-edge peak
    pub fn record_peak(&mut self) {
        self.total_peaks += 1;
    }

    /// Record a finalized hit
    pub fn record_hit(&mut self, hit: &HitEvent) {
        *self.hits_by_kind.entry(hit.kind).or_insert(0) += 1;

        if let Some(last) = self.last_hit_timestamp {
            self.interval_stats
                .push(hit.timestamp.saturating_sub(last) as f64);
        }
        self.last_hit_timestamp = Some(hit.timestamp);
    }

    /// Total hits across kinds
    pub fn total_hits(&self) -> u64 {
        self.hits_by_kind.values().sum()
    }

    /// Build a summary report
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_samples: self.total_samples,
            calibration_samples: self.calibration_samples,
            total_peaks: self.total_peaks,
            total_hits: self.total_hits(),
            full_train_hits: self.hits_by_kind.get(&HitKind::FullTrain).copied().unwrap_or(0),
            timeout_hits: self.hits_by_kind.get(&HitKind::Timeout).copied().unwrap_or(0),
            magnitude: StatsSummary::from(&self.magnitude_stats),
            threshold: StatsSummary::from(&self.threshold_stats),
            hit_interval_ms: StatsSummary::from(&self.interval_stats),
        }
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_samples: u64,
    pub calibration_samples: u64,
    pub total_peaks: u64,
    pub total_hits: u64,
    pub full_train_hits: u64,
    pub timeout_hits: u64,
    pub magnitude: StatsSummary,
    pub threshold: StatsSummary,
    pub hit_interval_ms: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Detection Summary ===")?;
        writeln!(
            f,
            "Samples: {} ({} calibration)",
            self.total_samples, self.calibration_samples
        )?;
        writeln!(f, "Peaks: {}", self.total_peaks)?;
        writeln!(
            f,
            "Hits: {} (full train: {}, timeout: {})",
            self.total_hits, self.full_train_hits, self.timeout_hits
        )?;
        writeln!(f, "Magnitude: {}", self.magnitude)?;
        writeln!(f, "Threshold: {}", self.threshold)?;
        writeln!(f, "Hit interval (ms): {}", self.hit_interval_ms)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
