//! HitEvent - Hit Engine output

use serde::{Deserialize, Serialize};

/// How a hit was finalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    /// The peak counter wrapped after a full train of `peaks_per_hit` peaks
    FullTrain,
    /// A partial train was followed by `delay_after_hit_ms` of silence
    Timeout,
}

impl HitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HitKind::FullTrain => "full_train",
            HitKind::Timeout => "timeout",
        }
    }
}

/// One finalized physical impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitEvent {
    /// Running hit total after this hit (1-based)
    pub hit_number: u64,

    /// Timestamp of the sample that finalized the hit (milliseconds)
    pub timestamp: u64,

    /// Finalization rule that fired
    pub kind: HitKind,

    /// Rising edges seen since the previous hit was finalized (diagnostic only)
    pub peaks: u32,
}
