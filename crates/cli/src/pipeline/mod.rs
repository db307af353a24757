//! Replay pipeline: sample source -> detector -> statistics.

mod replay;
mod shutdown;
mod stats;

pub use replay::{Replay, ReplayOptions};
pub use shutdown::spawn_shutdown_listener;
pub use stats::ReplayStats;
