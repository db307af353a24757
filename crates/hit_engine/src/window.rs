//! Sliding window noise statistics.
//!
//! A fixed-capacity ring of recent non-peak magnitudes with a running sum and
//! sum of squares. Storage is a `HeapRb`: once full, pushing overwrites the
//! oldest entry, which is exactly the slot a circular write cursor would point
//! at. The cursor is tracked alongside for diagnostics.

use std::fmt;

use ringbuf::{traits::*, HeapRb};
use serde::Serialize;

/// Adaptive threshold derived from the window
///
/// Rounding policy, applied in this order:
/// - `mean = sum / capacity` (integer division, truncating)
/// - `stddev = isqrt(sum_sq / capacity)` (both steps truncating)
/// - `value = mean + trunc(sensitivity * stddev)` (`f64` product, truncated toward zero)
///
/// `stddev` is the root mean square of the window, not the deviation about the mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Threshold {
    pub mean: u64,
    pub stddev: u64,
    pub value: u64,
}

/// Per-window running statistics
pub struct WindowStats {
    ring: HeapRb<u64>,
    capacity: usize,
    cursor: usize,
    sum: u64,
    sum_sq: u128,
}

impl fmt::Debug for WindowStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowStats")
            .field("len", &self.ring.occupied_len())
            .field("capacity", &self.capacity)
            .field("cursor", &self.cursor)
            .field("sum", &self.sum)
            .field("sum_sq", &self.sum_sq)
            .finish()
    }
}

impl WindowStats {
    /// Create an empty window
    ///
    /// A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ring: HeapRb::new(capacity),
            capacity,
            cursor: 0,
            sum: 0,
            sum_sq: 0,
        }
    }

    /// Append a calibration sample
    ///
    /// Returns `true` on the call that fills the window (the cursor wraps
    /// back to 0). On an already full window this behaves like [`update`].
    ///
    /// [`update`]: WindowStats::update
    pub fn init_sample(&mut self, magnitude: u64) -> bool {
        if self.is_ready() {
            self.update(magnitude);
            return false;
        }

        let _ = self.ring.try_push(magnitude);
        self.add(magnitude);
        self.advance();
        self.is_ready()
    }

    /// Replace the oldest sample with `magnitude`
    ///
    /// Returns the evicted value, or `None` if the window was not yet full.
    pub fn update(&mut self, magnitude: u64) -> Option<u64> {
        let evicted = self.ring.push_overwrite(magnitude);
        if let Some(old) = evicted {
            self.sum -= old;
            self.sum_sq -= sq(old);
        }
        self.add(magnitude);
        self.advance();
        evicted
    }

    /// Current threshold for the given sensitivity
    pub fn threshold(&self, sensitivity: f64) -> Threshold {
        let n = self.capacity as u64;
        let mean = self.sum / n;
        let variance_base = self.sum_sq / u128::from(n);
        let stddev = u64::try_from(variance_base.isqrt()).unwrap_or(u64::MAX);
        // `as` saturates and maps NaN to 0
        let scaled = (sensitivity * stddev as f64) as u64;

        Threshold {
            mean,
            stddev,
            value: mean.saturating_add(scaled),
        }
    }

    /// Window filled to capacity
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ring.is_full()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.occupied_len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slot the next write lands in, in `[0, capacity)`
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn sum(&self) -> u64 {
        self.sum
    }

    #[inline]
    pub fn sum_sq(&self) -> u128 {
        self.sum_sq
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &u64> + '_ {
        self.ring.iter()
    }

    #[inline]
    fn add(&mut self, magnitude: u64) {
        self.sum += magnitude;
        self.sum_sq += sq(magnitude);
    }

    #[inline]
    fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.capacity;
    }
}

#[inline]
fn sq(v: u64) -> u128 {
    u128::from(v) * u128::from(v)
}
