//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Contract snapshots (config serialization round trips)
//! - CSV replay -> detector scenarios
//! - Synthetic source -> detector agreement

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ConfigVersion, DetectorConfig};

    #[test]
    fn test_default_config_survives_toml() {
        let config = DetectorConfig::default();
        let toml = ConfigLoader::to_toml(&config).unwrap();
        let loaded = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.version, ConfigVersion::V1);
    }

    #[test]
    fn test_default_config_survives_json() {
        let config = DetectorConfig {
            sensitivity: 2.5,
            ..Default::default()
        };
        let json = ConfigLoader::to_json(&config).unwrap();
        assert_eq!(
            ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap(),
            config
        );
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::path::Path;

    use config_loader::ConfigLoader;
    use contracts::{ContractError, DetectorConfig, HitKind};
    use hit_engine::{HitDetector, RunSummary};
    use ingestion::{CsvReplaySource, ParseMode, SyntheticConfig, SyntheticSource};
    use tempfile::NamedTempFile;

    const QUIET: i32 = 10;
    const SPIKE: i32 = 10_000;

    /// CSV builder emitting one line every 2ms
    struct Capture {
        file: NamedTempFile,
        t: u64,
    }

    impl Capture {
        fn new() -> Self {
            Self {
                file: NamedTempFile::new().unwrap(),
                t: 0,
            }
        }

        /// Sample whose magnitude under the default baseline is `m`
        fn sample(&mut self, m: i32) -> &mut Self {
            writeln!(self.file, "{},{},0,-512", self.t, m).unwrap();
            self.t += 2;
            self
        }

        fn quiet(&mut self, n: usize) -> &mut Self {
            for _ in 0..n {
                self.sample(QUIET);
            }
            self
        }

        fn raw(&mut self, line: &str) -> &mut Self {
            writeln!(self.file, "{}", line).unwrap();
            self
        }

        /// Sample line with arbitrary bytes in place of the x field
    fn raw_x(&mut self, x: &[u8]) -> &mut Self {
        write!(self.file, "{},", self.t).unwrap();
        self.file.write_all(x).unwrap();
        writeln!(self.file, ",0,-512").unwrap();
        self.t += 2;
        self
    }

    fn path(&self) -> &Path {
            self.file.path()
        }
    }

    fn replay(path: &Path, config: &DetectorConfig, mode: ParseMode) -> Result<RunSummary, ContractError> {
        let mut source = CsvReplaySource::open(path, mode)?;
        HitDetector::new(config).run(&mut source)
    }

    #[test]
    fn test_csv_single_spike_times_out() {
        let mut capture = Capture::new();
        capture.quiet(60).sample(SPIKE).quiet(200);

        let summary = replay(capture.path(), &DetectorConfig::default(), ParseMode::Lenient).unwrap();

        assert_eq!(summary.samples, 261);
        assert_eq!(summary.peaks, 1);
        assert_eq!(summary.hits, 1);
        assert_eq!(summary.events[0].kind, HitKind::Timeout);
    }

    #[test]
    fn test_csv_full_train() {
        let mut capture = Capture::new();
        capture.quiet(60);
        for _ in 0..4 {
            capture.sample(SPIKE).sample(QUIET);
        }
        capture.quiet(300);

        let summary = replay(capture.path(), &DetectorConfig::default(), ParseMode::Strict).unwrap();

        assert_eq!(summary.peaks, 4);
        assert_eq!(summary.hits, 1);
        assert_eq!(summary.events[0].kind, HitKind::FullTrain);
        assert_eq!(summary.events[0].peaks, 4);
    }

    #[test]
    fn test_csv_separate_impacts() {
        let mut capture = Capture::new();
        capture.quiet(60);
        for _ in 0..3 {
            capture.sample(SPIKE).quiet(200);
        }

        let summary = replay(capture.path(), &DetectorConfig::default(), ParseMode::Lenient).unwrap();

        assert_eq!(summary.hits, 3);
        assert!(summary.events.iter().all(|e| e.kind == HitKind::Timeout));
        let numbers: Vec<u64> = summary.events.iter().map(|e| e.hit_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_spikes_during_calibration_are_ignored() {
        let mut capture = Capture::new();
        capture.sample(SPIKE).quiet(48).sample(SPIKE);
        capture.quiet(200);

        let summary = replay(capture.path(), &DetectorConfig::default(), ParseMode::Lenient).unwrap();
        assert_eq!(summary.peaks, 0);
        assert_eq!(summary.hits, 0);
    }

    #[test]
    fn test_lenient_blank_line_reads_as_jolt() {
        // a blank line is timestamp 0 with all axes 0, i.e. magnitude 512
        let mut capture = Capture::new();
        capture.quiet(100).raw("").quiet(100);

        let summary = replay(capture.path(), &DetectorConfig::default(), ParseMode::Lenient).unwrap();
        assert_eq!(summary.samples, 201);
        assert_eq!(summary.peaks, 1);
        assert_eq!(summary.hits, 1);
        assert_eq!(summary.events[0].kind, HitKind::Timeout);
    }

    #[test]
    fn test_lenient_replays_past_invalid_utf8() {
        let mut capture = Capture::new();
        capture.quiet(50).raw_x(b"\xff10").quiet(10).sample(SPIKE).quiet(193);

        let summary = replay(capture.path(), &DetectorConfig::default(), ParseMode::Lenient).unwrap();
        assert_eq!(summary.samples, 255);
        assert_eq!(summary.hits, 1);
        assert_eq!(summary.events[0].kind, HitKind::Timeout);
    }

    #[test]
    fn test_strict_skips_blank_line() {
        let mut capture = Capture::new();
        capture.quiet(100).raw("").quiet(100);

        let summary = replay(capture.path(), &DetectorConfig::default(), ParseMode::Strict).unwrap();
        assert_eq!(summary.samples, 200);
        assert_eq!(summary.hits, 0);
    }

    #[test]
    fn test_strict_error_stops_run() {
        let mut capture = Capture::new();
        capture.quiet(10).raw("20,1,2").quiet(10);

        let err = replay(capture.path(), &DetectorConfig::default(), ParseMode::Strict).unwrap_err();
        assert!(matches!(err, ContractError::SampleParse { line: 11, field: "z", .. }));
    }

    #[test]
    fn test_config_file_changes_grouping() {
        let mut config_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(config_file, "peaks_per_hit = 1").unwrap();
        let config = ConfigLoader::load_from_path(config_file.path()).unwrap();

        let mut capture = Capture::new();
        capture.quiet(60);
        for _ in 0..4 {
            capture.sample(SPIKE).sample(QUIET);
        }

        let summary = replay(capture.path(), &config, ParseMode::Lenient).unwrap();
        assert_eq!(summary.hits, 4);
        assert!(summary.events.iter().all(|e| e.kind == HitKind::FullTrain));
    }

    #[test]
    fn test_replay_is_deterministic() {
        let mut capture = Capture::new();
        capture.quiet(60);
        for i in 0..20 {
            capture.sample(SPIKE).quiet(5 + (i * 37) % 150);
        }

        let config = DetectorConfig::default();
        let first = replay(capture.path(), &config, ParseMode::Lenient).unwrap();
        let second = replay(capture.path(), &config, ParseMode::Lenient).unwrap();
        assert_eq!(first.events, second.events);
        assert!(first.hits > 0);
    }

    #[test]
    fn test_synthetic_impacts_are_all_detected() {
        let synthetic = SyntheticConfig {
            impacts: 5,
            ..Default::default()
        };
        let mut source = SyntheticSource::new(synthetic);
        let summary = HitDetector::new(&DetectorConfig::default())
            .run(&mut source)
            .unwrap();

        assert_eq!(summary.hits, 5);
        assert_eq!(summary.peaks, 20);
        assert!(summary.events.iter().all(|e| e.kind == HitKind::FullTrain));
    }

    #[test]
    fn test_unreadable_input_lenient_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let summary = replay(
            &dir.path().join("nope.csv"),
            &DetectorConfig::default(),
            ParseMode::Lenient,
        )
        .unwrap();
        assert_eq!(summary.samples, 0);
        assert_eq!(summary.hits, 0);
    }
}

#[cfg(test)]
mod metrics_tests {
    use contracts::{DetectorConfig, Reading};
    use hit_engine::HitDetector;
    use observability::DetectionMetricsAggregator;

    #[test]
    fn test_aggregator_matches_detector() {
        let mut detector = HitDetector::new(&DetectorConfig::default());
        let mut aggregator = DetectionMetricsAggregator::new();

        for t in 0..1_000u64 {
            let x = if t % 200 == 150 { 5_000 } else { 10 };
            let outcome = detector.step(&Reading::new(t * 2, x, 0, -512));
            aggregator.record_sample(outcome.magnitude, outcome.threshold);
            if outcome.edge == Some(hit_engine::PeakEdge::Rising) {
                aggregator.record_peak();
            }
            if let Some(hit) = outcome.hit {
                aggregator.record_hit(&hit);
            }
        }

        let summary = aggregator.summary();
        assert_eq!(summary.total_samples, 1_000);
        assert_eq!(summary.calibration_samples, 50);
        assert_eq!(summary.total_peaks, detector.peaks_detected());
        assert_eq!(summary.total_hits, detector.hit_count());
        assert!(summary.total_hits > 0);
    }
}
