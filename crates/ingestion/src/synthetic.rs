//! Synthetic sample source
//!
//! Deterministic accelerometer signal for tests and demos without hardware:
//! uniform rest noise around the baseline plus scheduled impacts, each a burst
//! of separated spikes on the X axis.

use contracts::{Baseline, ContractError, Reading, SampleSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Synthetic source configuration
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// Source ID
    pub source_id: String,

    /// RNG seed
    pub seed: u64,

    /// Interval between samples (ms)
    pub sample_interval_ms: u64,

    /// Rest offsets the noise is centered on
    pub baseline: Baseline,

    /// Maximum per-axis noise (counts)
    pub noise_amplitude: i32,

    /// Number of impacts
    pub impacts: u32,

    /// Time of the first impact (ms)
    pub first_impact_ms: u64,

    /// Interval between impact onsets (ms)
    pub impact_spacing_ms: u64,

    /// Spikes per impact
    pub peaks_per_impact: u32,

    /// Interval between spikes of one impact (ms)
    ///
    /// Raised to two sample intervals if smaller, so every spike is followed
    /// by at least one rest sample.
    pub peak_spacing_ms: u64,

    /// Spike height above the baseline (counts)
    pub spike_amplitude: i32,

    /// Quiet time after the last impact (ms)
    pub tail_ms: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            source_id: "synthetic".to_string(),
            seed: 42,
            sample_interval_ms: 2,
            baseline: Baseline::default(),
            noise_amplitude: 8,
            impacts: 5,
            first_impact_ms: 500,
            impact_spacing_ms: 1_000,
            peaks_per_impact: 4,
            peak_spacing_ms: 6,
            spike_amplitude: 2_000,
            tail_ms: 1_000,
        }
    }
}

impl SyntheticConfig {
    fn peak_spacing(&self) -> u64 {
        self.peak_spacing_ms.max(self.interval().saturating_mul(2))
    }

    fn interval(&self) -> u64 {
        self.sample_interval_ms.max(1)
    }

    fn impact_time(&self, i: u64) -> u64 {
        self.first_impact_ms
            .saturating_add(i.saturating_mul(self.impact_spacing_ms))
    }

    /// Onset time of every scheduled impact, saturating at `u64::MAX`
    pub fn impact_times(&self) -> Vec<u64> {
        (0..u64::from(self.impacts))
            .map(|i| self.impact_time(i))
            .collect()
    }

    /// Timestamp after which the source is exhausted, saturating at `u64::MAX`
    pub fn duration_ms(&self) -> u64 {
        let last = self.impact_time(u64::from(self.impacts.saturating_sub(1)));
        let burst = u64::from(self.peaks_per_impact).saturating_mul(self.peak_spacing());
        last.saturating_add(burst).saturating_add(self.tail_ms)
    }

    fn is_spike(&self, t: u64) -> bool {
        if self.impacts == 0 || self.peaks_per_impact == 0 || t < self.first_impact_ms {
            return false;
        }

        let offset = t - self.first_impact_ms;
        let spacing = self.impact_spacing_ms.max(1);
        if offset / spacing >= u64::from(self.impacts) {
            return false;
        }

        let within = offset % spacing;
        let peak_spacing = self.peak_spacing();
        within / peak_spacing < u64::from(self.peaks_per_impact)
            && within % peak_spacing < self.interval()
    }
}

/// Seeded synthetic accelerometer
pub struct SyntheticSource {
    config: SyntheticConfig,
    rng: StdRng,
    /// `None` once the clock has run past `u64::MAX`
    next_timestamp: Option<u64>,
    emitted: u64,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        debug!(
            source_id = %config.source_id,
            seed = config.seed,
            impacts = config.impacts,
            duration_ms = config.duration_ms(),
            "Synthetic source created"
        );

        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            next_timestamp: Some(0),
            emitted: 0,
        }
    }

    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    /// Readings produced so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn noise(&mut self) -> i32 {
        let amplitude = self.config.noise_amplitude.saturating_abs();
        self.rng.random_range(-amplitude..=amplitude)
    }
}

impl SampleSource for SyntheticSource {
    fn source_id(&self) -> &str {
        &self.config.source_id
    }

    fn next_reading(&mut self) -> Option<Result<Reading, ContractError>> {
        let t = self.next_timestamp?;
        if t > self.config.duration_ms() {
            return None;
        }

        let baseline = self.config.baseline;
        let spike = if self.config.is_spike(t) {
            self.config.spike_amplitude
        } else {
            0
        };

        let reading = Reading {
            timestamp: t,
            x: baseline.x.saturating_add(spike).saturating_add(self.noise()),
            y: baseline.y.saturating_add(self.noise()),
            z: baseline.z.saturating_add(self.noise()),
        };

        self.next_timestamp = t.checked_add(self.config.interval());
        self.emitted += 1;
        Some(Ok(reading))
    }
}
