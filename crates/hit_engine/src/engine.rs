//! Main hit detector implementation.

use contracts::{Baseline, ContractError, DetectorConfig, HitEvent, Reading, SampleSource};
use serde::Serialize;
use tracing::{debug, info, instrument, trace, warn};

use crate::calibration::{Calibrator, Phase};
use crate::magnitude::reading_magnitude;
use crate::peak::{PeakDetector, PeakEdge};
use crate::train::HitTrain;
use crate::window::{Threshold, WindowStats};

/// Per-sample diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleOutcome {
    pub timestamp: u64,
    pub magnitude: u64,
    /// Threshold the sample was compared against (`None` while calibrating)
    pub threshold: Option<u64>,
    /// Edge classification (`None` while calibrating)
    pub edge: Option<PeakEdge>,
    /// Hit finalized by this sample
    pub hit: Option<HitEvent>,
}

/// Result of draining a sample source
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub samples: u64,
    pub peaks: u64,
    pub hits: u64,
    pub events: Vec<HitEvent>,
}

/// Adaptive-threshold impact detector
///
/// Owns every piece of mutable state: window, calibration phase, peak state
/// and hit train. One reading is fully processed before the next is accepted.
#[derive(Debug)]
pub struct HitDetector {
    baseline: Baseline,
    sensitivity: f64,
    window: WindowStats,
    calibrator: Calibrator,
    peak: PeakDetector,
    train: HitTrain,
    threshold: Threshold,
    samples_processed: u64,
    peaks_detected: u64,
}

impl HitDetector {
    /// Create a detector in the calibration phase
    ///
    /// The configuration is expected to be validated already; a zero window
    /// size or zero `peaks_per_hit` is clamped to one.
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            baseline: config.baseline,
            sensitivity: config.sensitivity,
            window: WindowStats::new(config.window_size),
            calibrator: Calibrator::new(config.window_size),
            peak: PeakDetector::new(),
            train: HitTrain::new(config.peaks_per_hit, config.delay_after_hit_ms),
            threshold: Threshold::default(),
            samples_processed: 0,
            peaks_detected: 0,
        }
    }

    /// Process one reading
    ///
    /// Returns `Some(HitEvent)` if this reading finalized a hit.
    pub fn process(&mut self, reading: &Reading) -> Option<HitEvent> {
        self.step(reading).hit
    }

    /// Process one reading and report the full per-sample outcome
    #[instrument(
        level = "trace",
        name = "hit_detector_step",
        skip(self, reading),
        fields(timestamp = reading.timestamp)
    )]
    pub fn step(&mut self, reading: &Reading) -> SampleOutcome {
        let magnitude = reading_magnitude(reading, &self.baseline);
        self.samples_processed += 1;

        if !self.calibrator.is_complete() {
            observability::record_sample(magnitude, true);
            if let Some(threshold) =
                self.calibrator
                    .feed(&mut self.window, magnitude, self.sensitivity)
            {
                self.threshold = threshold;
                observability::record_calibration_complete(threshold.value);
            }
            return SampleOutcome {
                timestamp: reading.timestamp,
                magnitude,
                threshold: None,
                edge: None,
                hit: None,
            };
        }

        observability::record_sample(magnitude, false);

        let threshold = self.threshold.value;
        let edge = self.peak.observe(magnitude, threshold, reading.timestamp);

        let hit = match edge {
            PeakEdge::Rising => {
                self.peaks_detected += 1;
                observability::record_peak(magnitude, threshold);
                debug!(
                    timestamp = reading.timestamp,
                    magnitude,
                    threshold,
                    peak_count = self.train.peak_count(),
                    "Peak detected"
                );
                self.train.on_peak(reading.timestamp)
            }
            PeakEdge::NoRise => self.train.on_no_peak_edge(reading.timestamp),
        };

        // Frozen while above threshold so the peak cannot raise its own cutoff
        if !self.peak.in_peak() {
            self.window.update(magnitude);
            self.threshold = self.window.threshold(self.sensitivity);
            observability::record_threshold(self.threshold.value);
        }

        trace!(magnitude, threshold, ?edge, in_peak = self.peak.in_peak(), "Sample processed");

        if let Some(ref event) = hit {
            observability::record_hit(event);
            info!(
                hit_number = event.hit_number,
                timestamp = event.timestamp,
                kind = event.kind.as_str(),
                peaks = event.peaks,
                "Hit detected"
            );
        }

        SampleOutcome {
            timestamp: reading.timestamp,
            magnitude,
            threshold: Some(threshold),
            edge: Some(edge),
            hit,
        }
    }

    /// Drain a sample source
    ///
    /// Stops at the first error the source reports.
    pub fn run<S: SampleSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<RunSummary, ContractError> {
        let mut summary = RunSummary::default();
        let peaks_before = self.peaks_detected;

        while let Some(reading) = source.next_reading() {
            let reading = match reading {
                Ok(reading) => reading,
                Err(e) => {
                    warn!(source_id = source.source_id(), error = %e, "Sample source failed");
                    return Err(e);
                }
            };

            summary.samples += 1;
            if let Some(event) = self.process(&reading) {
                summary.events.push(event);
            }
        }

        summary.peaks = self.peaks_detected - peaks_before;
        summary.hits = summary.events.len() as u64;

        info!(
            source_id = source.source_id(),
            samples = summary.samples,
            peaks = summary.peaks,
            hits = summary.hits,
            total_hits = self.hit_count(),
            "Sample source exhausted"
        );

        Ok(summary)
    }

    /// Total hits since creation
    #[inline]
    pub fn hit_count(&self) -> u64 {
        self.train.hit_count()
    }

    /// Current threshold, `None` while calibrating
    #[inline]
    pub fn threshold(&self) -> Option<Threshold> {
        self.calibrator.is_complete().then_some(self.threshold)
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.calibrator.phase()
    }

    #[inline]
    pub fn window(&self) -> &WindowStats {
        &self.window
    }

    #[inline]
    pub fn train(&self) -> &HitTrain {
        &self.train
    }

    #[inline]
    pub fn in_peak(&self) -> bool {
        self.peak.in_peak()
    }

    #[inline]
    pub fn samples_processed(&self) -> u64 {
        self.samples_processed
    }

    #[inline]
    pub fn peaks_detected(&self) -> u64 {
        self.peaks_detected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::HitKind;

    const WINDOW: usize = 50;
    const SPACING_MS: u64 = 2;

    /// Reading whose magnitude under the reference baseline is exactly `m`
    fn with_magnitude(timestamp: u64, m: i32) -> Reading {
        Reading::new(timestamp, m, 0, -512)
    }

    struct Feeder {
        detector: HitDetector,
        t: u64,
    }

    impl Feeder {
        fn new() -> Self {
            Self {
                detector: HitDetector::new(&DetectorConfig::default()),
                t: 0,
            }
        }

        fn feed(&mut self, m: i32) -> SampleOutcome {
            let outcome = self.detector.step(&with_magnitude(self.t, m));
            self.t += SPACING_MS;
            outcome
        }

        fn feed_n(&mut self, m: i32, n: usize) -> Vec<SampleOutcome> {
            (0..n).map(|_| self.feed(m)).collect()
        }

        fn calibrate(&mut self, m: i32) {
            self.feed_n(m, WINDOW);
        }
    }

    #[test]
    fn test_calibration_prefix_never_reports() {
        let mut feeder = Feeder::new();
        let outcomes = feeder.feed_n(10_000, WINDOW);

        assert!(outcomes.iter().all(|o| o.edge.is_none() && o.hit.is_none()));
        assert_eq!(feeder.detector.phase(), Phase::Steady);
        assert_eq!(feeder.detector.peaks_detected(), 0);
    }

    #[test]
    fn test_threshold_unavailable_until_calibrated() {
        let mut feeder = Feeder::new();
        feeder.feed_n(10, WINDOW - 1);
        assert!(feeder.detector.threshold().is_none());
        assert_eq!(
            feeder.detector.phase(),
            Phase::Calibrating { remaining: 1 }
        );

        feeder.feed(10);
        assert_eq!(feeder.detector.threshold().unwrap().value, 50);
    }

    #[test]
    fn test_no_signal_zero_hits() {
        let mut feeder = Feeder::new();
        feeder.calibrate(10);
        feeder.feed_n(10, 200);

        assert_eq!(feeder.detector.hit_count(), 0);
        assert_eq!(feeder.detector.peaks_detected(), 0);
        assert_eq!(feeder.detector.threshold().unwrap().value, 50);
    }

    #[test]
    fn test_silent_signal_threshold_is_signal() {
        let mut feeder = Feeder::new();
        feeder.calibrate(0);
        feeder.feed_n(0, 200);

        let threshold = feeder.detector.threshold().unwrap();
        assert_eq!(threshold.value, 0);
        assert_eq!(threshold.stddev, 0);
        assert_eq!(feeder.detector.hit_count(), 0);
    }

    #[test]
    fn test_single_spike_then_timeout() {
        let mut feeder = Feeder::new();
        feeder.calibrate(10);

        let spike = feeder.feed(10_000);
        assert_eq!(spike.edge, Some(PeakEdge::Rising));
        assert!(spike.hit.is_none());

        // 200 samples * 2ms = 400ms of quiet
        let hits: Vec<HitEvent> = feeder
            .feed_n(10, 200)
            .into_iter()
            .filter_map(|o| o.hit)
            .collect();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, HitKind::Timeout);
        assert!(hits[0].timestamp > spike.timestamp + 250);
        assert_eq!(feeder.detector.hit_count(), 1);
        assert_eq!(feeder.detector.train().peak_count(), 1);
        assert!(!feeder.detector.train().in_train());
    }

    #[test]
    fn test_full_train_of_separated_spikes() {
        let mut feeder = Feeder::new();
        feeder.calibrate(10);

        let mut hits = Vec::new();
        for _ in 0..4 {
            hits.extend(feeder.feed(10_000).hit);
            hits.extend(feeder.feed(10).hit);
        }

        assert_eq!(feeder.detector.peaks_detected(), 4);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, HitKind::FullTrain);
        assert_eq!(feeder.detector.train().peak_count(), 0);
        assert!(!feeder.detector.train().in_train());

        // quiet afterwards adds no timeout hit
        feeder.feed_n(10, 300);
        assert_eq!(feeder.detector.hit_count(), 1);
    }

    #[test]
    fn test_consecutive_high_samples_are_one_peak() {
        let mut feeder = Feeder::new();
        feeder.calibrate(10);
        feeder.feed_n(10_000, 4);

        assert_eq!(feeder.detector.peaks_detected(), 1);
        assert_eq!(feeder.detector.train().peak_count(), 1);
        assert_eq!(feeder.detector.hit_count(), 0);
    }

    #[test]
    fn test_threshold_frozen_during_peak() {
        let mut feeder = Feeder::new();
        feeder.calibrate(10);
        feeder.feed_n(12, 20);

        let before: Vec<u64> = feeder.detector.window().iter().copied().collect();
        let threshold_before = feeder.detector.threshold();

        for m in [5_000, 9_000, 7_000, 8_000] {
            feeder.feed(m);
            assert!(feeder.detector.in_peak());
            let during: Vec<u64> = feeder.detector.window().iter().copied().collect();
            assert_eq!(during, before);
            assert_eq!(feeder.detector.threshold(), threshold_before);
        }

        // first quiet sample resumes window updates
        feeder.feed(10);
        assert_ne!(
            feeder.detector.window().iter().copied().collect::<Vec<_>>(),
            before
        );
    }

    #[test]
    fn test_hit_count_non_decreasing() {
        let mut feeder = Feeder::new();
        feeder.calibrate(10);

        let mut last = 0;
        for i in 0..2_000 {
            let m = if i % 97 == 0 || i % 101 == 0 { 5_000 } else { 10 + (i % 3) as i32 };
            feeder.feed(m);
            let count = feeder.detector.hit_count();
            assert!(count >= last);
            last = count;
        }
        assert!(last > 0);
    }

    #[test]
    fn test_deterministic_replay() {
        let signal: Vec<Reading> = (0..3_000u64)
            .map(|t| {
                let m = match t % 400 {
                    0 | 8 | 16 => 4_000,
                    n => (n % 7) as i32 + 20,
                };
                with_magnitude(t * SPACING_MS, m)
            })
            .collect();

        let run = |signal: &[Reading]| {
            let mut detector = HitDetector::new(&DetectorConfig::default());
            signal.iter().filter_map(|r| detector.process(r)).collect::<Vec<_>>()
        };

        let first = run(&signal);
        let second = run(&signal);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_window_sums_match_contents_throughout() {
        let mut feeder = Feeder::new();
        for i in 0..1_000 {
            let m = if i % 150 == 120 { 3_000 } else { (i % 17) as i32 };
            feeder.feed(m);
            let window = feeder.detector.window();
            let sum: u64 = window.iter().sum();
            let sum_sq: u128 = window.iter().map(|&v| u128::from(v) * u128::from(v)).sum();
            assert_eq!(window.sum(), sum);
            assert_eq!(window.sum_sq(), sum_sq);
        }
    }

    struct VecSource(std::vec::IntoIter<Result<Reading, ContractError>>);

    impl SampleSource for VecSource {
        fn source_id(&self) -> &str {
            "test"
        }

        fn next_reading(&mut self) -> Option<Result<Reading, ContractError>> {
            self.0.next()
        }
    }

    #[test]
    fn test_run_drains_source() {
        let mut readings: Vec<Result<Reading, ContractError>> =
            (0..50).map(|t| Ok(with_magnitude(t * 2, 10))).collect();
        readings.push(Ok(with_magnitude(100, 10_000)));
        readings.extend((0..200).map(|t| Ok(with_magnitude(102 + t * 2, 10))));

        let mut detector = HitDetector::new(&DetectorConfig::default());
        let summary = detector.run(&mut VecSource(readings.into_iter())).unwrap();

        assert_eq!(summary.samples, 251);
        assert_eq!(summary.peaks, 1);
        assert_eq!(summary.hits, 1);
        assert_eq!(summary.events[0].kind, HitKind::Timeout);
    }

    #[test]
    fn test_run_stops_on_source_error() {
        let readings = vec![
            Ok(with_magnitude(0, 10)),
            Err(ContractError::sample_parse("test", 2, "x", "bad")),
            Ok(with_magnitude(4, 10)),
        ];

        let mut detector = HitDetector::new(&DetectorConfig::default());
        let result = detector.run(&mut VecSource(readings.into_iter()));

        assert!(matches!(result, Err(ContractError::SampleParse { line: 2, .. })));
        assert_eq!(detector.samples_processed(), 1);
    }
}
