//! Replay statistics.

use std::time::Duration;

use contracts::{HitEvent, HitKind};
use hit_engine::{PeakEdge, SampleOutcome};
use observability::DetectionMetricsAggregator;

/// Statistics from a replay run
#[derive(Debug, Clone, Default)]
pub struct ReplayStats {
    /// Samples processed (calibration included)
    pub samples: u64,

    /// Rising-edge peaks
    pub peaks: u64,

    /// Hits finalized during this run
    pub hits: u64,

    /// Every hit in detection order
    pub events: Vec<HitEvent>,

    /// Stopped by a shutdown signal before the source was exhausted
    pub interrupted: bool,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Threshold after the last sample (`None` if calibration never completed)
    pub final_threshold: Option<u64>,

    /// Detection metrics aggregator
    pub metrics: DetectionMetricsAggregator,
}

impl ReplayStats {
    /// Account for one processed sample
    pub fn record(&mut self, outcome: &SampleOutcome) {
        self.samples += 1;
        self.metrics.record_sample(outcome.magnitude, outcome.threshold);

        if outcome.edge == Some(PeakEdge::Rising) {
            self.peaks += 1;
            self.metrics.record_peak();
        }

        if let Some(hit) = outcome.hit {
            self.hits += 1;
            self.events.push(hit);
            self.metrics.record_hit(&hit);
        }
    }

    pub fn hits_of_kind(&self, kind: HitKind) -> u64 {
        self.events.iter().filter(|e| e.kind == kind).count() as u64
    }

    /// Samples per second of wall-clock time
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.samples as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}
