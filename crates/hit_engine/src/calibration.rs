//! Startup calibration.
//!
//! The first `window_size` samples only fill the window; no threshold exists
//! until the fill completes. The transition to steady state happens once.

use serde::Serialize;
use tracing::info;

use crate::window::{Threshold, WindowStats};

/// Detector lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Filling the window; `remaining` samples until the first threshold
    Calibrating { remaining: usize },
    /// Threshold available, detection active
    Steady,
}

/// One-shot window filler
#[derive(Debug, Clone)]
pub struct Calibrator {
    phase: Phase,
}

impl Calibrator {
    pub fn new(window_size: usize) -> Self {
        Self {
            phase: Phase::Calibrating {
                remaining: window_size.max(1),
            },
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Steady
    }

    /// Feed one calibration sample into the window
    ///
    /// Returns the first threshold on the sample that completes the fill and
    /// `None` otherwise. Once steady, further calls are ignored and return `None`.
    pub fn feed(
        &mut self,
        window: &mut WindowStats,
        magnitude: u64,
        sensitivity: f64,
    ) -> Option<Threshold> {
        let Phase::Calibrating { remaining } = self.phase else {
            return None;
        };

        if !window.init_sample(magnitude) {
            self.phase = Phase::Calibrating {
                remaining: remaining.saturating_sub(1),
            };
            return None;
        }

        self.phase = Phase::Steady;
        let threshold = window.threshold(sensitivity);
        info!(
            window_size = window.capacity(),
            mean = threshold.mean,
            stddev = threshold.stddev,
            threshold = threshold.value,
            "Calibration complete"
        );
        Some(threshold)
    }
}
