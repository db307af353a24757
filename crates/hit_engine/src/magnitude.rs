//! Baseline correction and magnitude calculation.
//!
//! All arithmetic is exact integer math: components are widened to `i64`
//! before subtraction and the squared sum is accumulated in `u128`, so no
//! `i32` reading can overflow. The magnitude is the truncating integer
//! square root, which equals `floor(sqrt(x))` computed in floating point for
//! every value a 32-bit accumulator could hold.

use contracts::{Baseline, Reading};

/// Reading with per-axis rest offsets removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectedReading {
    pub timestamp: u64,
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

/// Subtract the rest offsets from a raw reading
#[inline]
pub fn correct(reading: &Reading, baseline: &Baseline) -> CorrectedReading {
    CorrectedReading {
        timestamp: reading.timestamp,
        x: i64::from(reading.x) - i64::from(baseline.x),
        y: i64::from(reading.y) - i64::from(baseline.y),
        z: i64::from(reading.z) - i64::from(baseline.z),
    }
}

/// Euclidean norm of a corrected reading, truncated to an integer
#[inline]
pub fn magnitude(corrected: &CorrectedReading) -> u64 {
    let sum_sq = square(corrected.x) + square(corrected.y) + square(corrected.z);
    // sqrt(3 * 2^64) < 2^33
    sum_sq.isqrt() as u64
}

/// Baseline correction followed by magnitude
#[inline]
pub fn reading_magnitude(reading: &Reading, baseline: &Baseline) -> u64 {
    magnitude(&correct(reading, baseline))
}

#[inline]
fn square(v: i64) -> u128 {
    let a = v.unsigned_abs() as u128;
    a * a
}
