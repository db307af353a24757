//! `simulate` command implementation.

use anyhow::{Context, Result};
use contracts::HitEvent;
use ingestion::{SyntheticConfig, SyntheticSource};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::SimulateArgs;
use crate::commands::run::log_summary;
use crate::pipeline::{spawn_shutdown_listener, Replay, ReplayOptions};
use crate::settings;

#[derive(Serialize)]
struct SimulationReport {
    seed: u64,
    generated_impacts: u32,
    detected_hits: u64,
    samples: u64,
    peaks: u64,
    interrupted: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    impact_times_ms: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<HitEvent>,
}

/// Execute the `simulate` command
pub async fn run_simulate(args: &SimulateArgs) -> Result<()> {
    let config = settings::resolve(&args.detector)?;

    let synthetic = SyntheticConfig {
        seed: args.seed,
        sample_interval_ms: args.interval,
        baseline: config.baseline,
        noise_amplitude: args.noise,
        impacts: args.impacts,
        impact_spacing_ms: args.impact_spacing,
        peaks_per_impact: args.peaks_per_impact,
        peak_spacing_ms: args.peak_spacing,
        spike_amplitude: args.amplitude,
        ..Default::default()
    };
    let impact_times = synthetic.impact_times();

    info!(
        seed = args.seed,
        impacts = args.impacts,
        peaks_per_impact = args.peaks_per_impact,
        duration_ms = synthetic.duration_ms(),
        "Starting simulation"
    );

    let options = ReplayOptions {
        print_events: args.events && !args.json,
        ..Default::default()
    };
    let replay = Replay::new(SyntheticSource::new(synthetic), &config, options);
    let shutdown = spawn_shutdown_listener(replay.running_flag());
    let result = replay.run().await;
    shutdown.abort();

    let stats = result.context("Simulation failed")?;
    log_summary(&stats);

    if stats.hits != u64::from(args.impacts) && !stats.interrupted {
        warn!(
            generated = args.impacts,
            detected = stats.hits,
            "Detected hit count differs from generated impacts"
        );
    }

    if args.json {
        let report = SimulationReport {
            seed: args.seed,
            generated_impacts: args.impacts,
            detected_hits: stats.hits,
            samples: stats.samples,
            peaks: stats.peaks,
            interrupted: stats.interrupted,
            impact_times_ms: if args.events { impact_times } else { Vec::new() },
            events: if args.events { stats.events } else { Vec::new() },
        };
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize simulation report")?;
        println!("{}", json);
    } else {
        println!(
            "Simulation done; {} impacts generated, {} hits detected",
            args.impacts, stats.hits
        );
    }

    Ok(())
}
