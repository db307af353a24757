//! # Ingestion
//!
//! Sample sources feeding the hit detector.
//!
//! Responsibilities:
//! - Replay recorded `timestamp,x,y,z` CSV files (lenient or strict parsing)
//! - Serve in-memory readings
//! - Generate deterministic synthetic signals
//! - Count lines, blank lines and parse errors
//!
//! Every source implements [`contracts::SampleSource`], so the detector pulls
//! readings the same way regardless of origin.
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{CsvReplaySource, ParseMode};
//! use contracts::SampleSource;
//!
//! let mut source = CsvReplaySource::open("capture.csv", ParseMode::Lenient)?;
//! while let Some(reading) = source.next_reading() {
//!     detector.process(&reading?);
//! }
//! ```

mod csv;
mod memory;
mod metrics;
mod synthetic;

// Re-exports
pub use crate::csv::{CsvReplaySource, ParseMode};
pub use crate::memory::VecSource;
pub use crate::metrics::{IngestionMetrics, MetricsSnapshot};
pub use crate::synthetic::{SyntheticConfig, SyntheticSource};
pub use contracts::{Reading, SampleSource};
