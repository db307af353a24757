//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Sample timestamps are integer milliseconds (`u64`) supplied by the sample source
//! - Timestamps are assumed monotonically non-decreasing; the core never reorders

mod config;
mod error;
mod hit;
mod reading;
mod sample_source;

pub use config::*;
pub use error::*;
pub use hit::*;
pub use reading::*;
pub use sample_source::SampleSource;
