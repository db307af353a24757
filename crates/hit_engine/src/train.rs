//! Hit-train grouping.
//!
//! One physical impact produces either a full train of `peaks_per_hit`
//! closely spaced peaks, or fewer peaks followed by at least
//! `delay_after_hit_ms` of silence. Either finalizes exactly one hit.
//!
//! The peak counter is only ever advanced modulo `peaks_per_hit`. A timeout
//! finalization leaves it where it is, so a partial train carries its count
//! into the next one.

use contracts::{HitEvent, HitKind};
use serde::Serialize;

/// Peak grouping state machine (`Idle` / `InTrain`)
#[derive(Debug, Clone, Serialize)]
pub struct HitTrain {
    peaks_per_hit: u32,
    delay_after_hit_ms: u64,
    peak_count: u32,
    in_train: bool,
    last_peak: u64,
    hit_count: u64,
    peaks_since_hit: u32,
}

impl HitTrain {
    /// Create an idle train
    ///
    /// A `peaks_per_hit` of zero is treated as one.
    pub fn new(peaks_per_hit: u32, delay_after_hit_ms: u64) -> Self {
        Self {
            peaks_per_hit: peaks_per_hit.max(1),
            delay_after_hit_ms,
            peak_count: 0,
            in_train: false,
            last_peak: 0,
            hit_count: 0,
            peaks_since_hit: 0,
        }
    }

    /// Handle a rising-edge peak
    ///
    /// Returns a `FullTrain` hit when the peak counter wraps to zero.
    pub fn on_peak(&mut self, timestamp: u64) -> Option<HitEvent> {
        self.peak_count = (self.peak_count + 1) % self.peaks_per_hit;
        self.peaks_since_hit = self.peaks_since_hit.saturating_add(1);

        let hit = if self.peak_count == 0 {
            Some(self.finalize(timestamp, HitKind::FullTrain))
        } else {
            None
        };

        self.in_train = self.peak_count > 0;
        self.last_peak = timestamp;
        hit
    }

    /// Handle a sample that did not start a new peak
    ///
    /// Returns a `Timeout` hit once more than `delay_after_hit_ms` has passed
    /// since the last peak of an open train.
    pub fn on_no_peak_edge(&mut self, timestamp: u64) -> Option<HitEvent> {
        if self.in_train && timestamp > self.last_peak.saturating_add(self.delay_after_hit_ms) {
            self.in_train = false;
            return Some(self.finalize(timestamp, HitKind::Timeout));
        }
        None
    }

    fn finalize(&mut self, timestamp: u64, kind: HitKind) -> HitEvent {
        self.hit_count += 1;
        let event = HitEvent {
            hit_number: self.hit_count,
            timestamp,
            kind,
            peaks: self.peaks_since_hit,
        };
        self.peaks_since_hit = 0;
        event
    }

    #[inline]
    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }

    #[inline]
    pub fn peak_count(&self) -> u32 {
        self.peak_count
    }

    #[inline]
    pub fn in_train(&self) -> bool {
        self.in_train
    }

    #[inline]
    pub fn last_peak(&self) -> u64 {
        self.last_peak
    }

    #[inline]
    pub fn peaks_per_hit(&self) -> u32 {
        self.peaks_per_hit
    }

    #[inline]
    pub fn delay_after_hit_ms(&self) -> u64 {
        self.delay_after_hit_ms
    }
}
