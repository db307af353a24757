//! # Hit Engine
//!
//! Adaptive-threshold impact detector for tri-axial accelerometer samples.
//!
//! Responsible for:
//! - Baseline correction and integer magnitude
//! - Sliding-window noise statistics and the adaptive threshold
//! - Startup calibration
//! - Rising-edge peak detection
//! - Grouping peaks into hits (full train or silence timeout)
//!
//! ## Example
//!
//! ```ignore
//! use hit_engine::{DetectorConfig, HitDetector};
//!
//! let mut detector = HitDetector::new(&DetectorConfig::default());
//!
//! // Push readings as they arrive
//! if let Some(hit) = detector.process(&reading) {
//!     // Handle hit
//! }
//! ```

mod calibration;
mod engine;
mod magnitude;
mod peak;
mod train;
mod window;

pub use calibration::{Calibrator, Phase};
pub use engine::{HitDetector, RunSummary, SampleOutcome};
pub use magnitude::{correct, magnitude, reading_magnitude, CorrectedReading};
pub use peak::{PeakDetector, PeakEdge};
pub use train::HitTrain;
pub use window::{Threshold, WindowStats};

// Re-export contracts types
pub use contracts::{Baseline, DetectorConfig, HitEvent, HitKind, Reading, SampleSource};
