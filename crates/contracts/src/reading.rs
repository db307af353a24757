//! Reading - Sample Source output
//!
//! Raw tri-axial accelerometer sample as delivered by the sensor or a replay file.

use serde::{Deserialize, Serialize};

/// Raw accelerometer reading
///
/// Axis values are raw ADC counts; no unit conversion is applied anywhere
/// in the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reading {
    /// Sample timestamp (milliseconds)
    pub timestamp: u64,

    /// X axis
    pub x: i32,

    /// Y axis
    pub y: i32,

    /// Z axis
    pub z: i32,
}

impl Reading {
    /// Create a reading
    #[inline]
    pub const fn new(timestamp: u64, x: i32, y: i32, z: i32) -> Self {
        Self { timestamp, x, y, z }
    }
}
