//! Rising-edge threshold crossing detector.

use serde::Serialize;

/// Result of observing one steady-state sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakEdge {
    /// Magnitude crossed above the threshold on this sample
    Rising,
    /// No new peak: below threshold, or still on an existing plateau
    NoRise,
}

/// Two-state (`NoPeak` / `Peak`) edge detector
///
/// Peak state is simply "the previous sample was above threshold", so a
/// plateau of consecutive high samples reports a single rising edge.
#[derive(Debug, Clone, Default)]
pub struct PeakDetector {
    in_peak: bool,
    last_onset: Option<u64>,
}

impl PeakDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `magnitude` against `threshold` and advance the state
    #[inline]
    pub fn observe(&mut self, magnitude: u64, threshold: u64, timestamp: u64) -> PeakEdge {
        let new_peak = magnitude > threshold;
        let edge = if !self.in_peak && new_peak {
            self.last_onset = Some(timestamp);
            PeakEdge::Rising
        } else {
            PeakEdge::NoRise
        };
        self.in_peak = new_peak;
        edge
    }

    /// Whether the most recent sample was above threshold
    #[inline]
    pub fn in_peak(&self) -> bool {
        self.in_peak
    }

    /// Timestamp of the most recent rising edge
    #[inline]
    pub fn last_onset(&self) -> Option<u64> {
        self.last_onset
    }
}
