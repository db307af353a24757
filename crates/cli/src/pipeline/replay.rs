//! Replay driver.
//!
//! Pulls readings from a sample source one at a time and feeds them through
//! the detector. Optional pacing sleeps for the timestamp delta between
//! consecutive readings divided by the speed multiplier.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use contracts::{ContractError, DetectorConfig, HitEvent, SampleSource};
use hit_engine::HitDetector;
use tracing::{debug, info};

use super::ReplayStats;

/// Samples processed between cooperative yields when unpaced
const YIELD_EVERY: u64 = 4_096;

/// Replay options
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Timestamp speed multiplier (0 = as fast as possible)
    pub speed: f64,

    /// Stop after this many samples (None = unlimited)
    pub max_samples: Option<u64>,

    /// Print each hit to stdout as it is finalized
    pub print_events: bool,
}

/// Single-source replay
pub struct Replay<S> {
    source: S,
    detector: HitDetector,
    options: ReplayOptions,
    running: Arc<AtomicBool>,
}

impl<S: SampleSource> Replay<S> {
    pub fn new(source: S, config: &DetectorConfig, options: ReplayOptions) -> Self {
        Self {
            source,
            detector: HitDetector::new(config),
            options,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Flag that stops the replay once cleared
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Run to exhaustion, `max_samples`, or shutdown
    ///
    /// A source error ends the run and is returned as is.
    pub async fn run(mut self) -> Result<ReplayStats, ContractError> {
        let start_time = Instant::now();
        let mut stats = ReplayStats::default();
        let mut previous_timestamp: Option<u64> = None;

        info!(
            source_id = self.source.source_id(),
            speed = self.options.speed,
            max_samples = ?self.options.max_samples,
            "Replay started"
        );

        loop {
            if !self.running.load(Ordering::Relaxed) {
                stats.interrupted = true;
                break;
            }

            if let Some(max) = self.options.max_samples {
                if stats.samples >= max {
                    info!(samples = stats.samples, "Reached max samples limit");
                    break;
                }
            }

            let reading = match self.source.next_reading() {
                Some(reading) => reading?,
                None => break,
            };

            if self.options.speed > 0.0 {
                if let Some(previous) = previous_timestamp {
                    let delta_ms = reading.timestamp.saturating_sub(previous);
                    if delta_ms > 0 {
                        let secs = delta_ms as f64 / 1_000.0 / self.options.speed;
                        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
                    }
                }
                previous_timestamp = Some(reading.timestamp);
            } else if stats.samples % YIELD_EVERY == YIELD_EVERY - 1 {
                tokio::task::yield_now().await;
            }

            let outcome = self.detector.step(&reading);
            stats.record(&outcome);

            if let Some(hit) = outcome.hit {
                if self.options.print_events {
                    println!("{}", format_hit(&hit));
                }
            }
        }

        stats.duration = start_time.elapsed();
        stats.final_threshold = self.detector.threshold().map(|t| t.value);

        debug!(
            samples = stats.samples,
            phase = ?self.detector.phase(),
            in_peak = self.detector.in_peak(),
            "Replay loop exited"
        );

        Ok(stats)
    }
}

/// One-line human-readable hit
pub fn format_hit(hit: &HitEvent) -> String {
    format!(
        "Hit {} at {} ms ({}, {} peaks)",
        hit.hit_number,
        hit.timestamp,
        hit.kind.as_str(),
        hit.peaks
    )
}
