//! Ingestion metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Ingestion counters
///
/// Shared with the caller through an `Arc` so counts survive the source.
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Lines read from the input (blank lines included)
    pub lines_read: AtomicU64,

    /// Readings handed to the detector
    pub readings_emitted: AtomicU64,

    /// Blank lines seen
    pub blank_lines: AtomicU64,

    /// Fields that failed to parse (strict) or were coerced (lenient)
    pub parse_errors: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record line read
    pub fn record_line(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("hitdetect_lines_read_total").increment(1);
    }

    /// Record reading emitted
    pub fn record_reading(&self) {
        self.readings_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record blank line
    pub fn record_blank(&self) {
        self.blank_lines.fetch_add(1, Ordering::Relaxed);
    }

    /// Record parse error
    pub fn record_parse_error(&self, source_id: &str) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
        observability::record_parse_error(source_id);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            readings_emitted: self.readings_emitted.load(Ordering::Relaxed),
            blank_lines: self.blank_lines.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub lines_read: u64,
    pub readings_emitted: u64,
    pub blank_lines: u64,
    pub parse_errors: u64,
}
