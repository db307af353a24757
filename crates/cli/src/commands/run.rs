//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::{DetectorConfig, HitEvent, HitKind};
use ingestion::{CsvReplaySource, MetricsSnapshot, ParseMode};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{spawn_shutdown_listener, Replay, ReplayOptions, ReplayStats};
use crate::settings;

/// Run report for JSON output
#[derive(Serialize)]
struct RunReport {
    input: String,
    config: DetectorConfig,
    samples: u64,
    peaks: u64,
    hits: u64,
    full_train_hits: u64,
    timeout_hits: u64,
    interrupted: bool,
    duration_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_threshold: Option<u64>,
    ingestion: IngestionReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<HitEvent>,
}

#[derive(Serialize)]
struct IngestionReport {
    lines_read: u64,
    blank_lines: u64,
    parse_errors: u64,
}

impl From<MetricsSnapshot> for IngestionReport {
    fn from(snapshot: MetricsSnapshot) -> Self {
        Self {
            lines_read: snapshot.lines_read,
            blank_lines: snapshot.blank_lines,
            parse_errors: snapshot.parse_errors,
        }
    }
}

/// Execute the `run` command
pub async fn run_replay(args: &RunArgs) -> Result<()> {
    let config = settings::resolve(&args.detector)?;

    if !args.speed.is_finite() || args.speed < 0.0 {
        return Err(CliError::invalid_option("speed", "must be a finite number >= 0").into());
    }

    let mode = if args.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };

    let source = CsvReplaySource::open(&args.input, mode).map_err(CliError::Input)?;
    let ingestion_metrics = source.metrics();

    info!(
        input = %args.input.display(),
        ?mode,
        window_size = config.window_size,
        sensitivity = config.sensitivity,
        peaks_per_hit = config.peaks_per_hit,
        delay_after_hit_ms = config.delay_after_hit_ms,
        "Configuration resolved"
    );

    let options = ReplayOptions {
        speed: args.speed,
        max_samples: (args.max_samples > 0).then_some(args.max_samples),
        print_events: args.events && !args.json,
    };

    let replay = Replay::new(source, &config, options);
    let shutdown = spawn_shutdown_listener(replay.running_flag());
    let result = replay.run().await;
    shutdown.abort();

    let stats = result
        .map_err(CliError::Input)
        .with_context(|| format!("Replay of {} failed", args.input.display()))?;

    let ingestion = ingestion_metrics.snapshot();
    if stats.interrupted {
        warn!(samples = stats.samples, "Replay interrupted, reporting partial count");
    }
    if ingestion.parse_errors > 0 {
        warn!(
            parse_errors = ingestion.parse_errors,
            "Malformed lines were coerced"
        );
    }

    log_summary(&stats);

    if args.json {
        let report = RunReport {
            input: args.input.display().to_string(),
            config,
            samples: stats.samples,
            peaks: stats.peaks,
            hits: stats.hits,
            full_train_hits: stats.hits_of_kind(HitKind::FullTrain),
            timeout_hits: stats.hits_of_kind(HitKind::Timeout),
            interrupted: stats.interrupted,
            duration_ms: stats.duration.as_millis(),
            final_threshold: stats.final_threshold,
            ingestion: ingestion.into(),
            events: if args.events { stats.events } else { Vec::new() },
        };
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize run report")?;
        println!("{}", json);
    } else {
        println!("Test done; {} hits detected", stats.hits);
    }

    Ok(())
}

pub(crate) fn log_summary(stats: &ReplayStats) {
    info!(
        samples = stats.samples,
        peaks = stats.peaks,
        hits = stats.hits,
        duration_secs = stats.duration.as_secs_f64(),
        samples_per_sec = format!("{:.0}", stats.throughput()),
        "Replay finished"
    );
    debug!("\n{}", stats.metrics.summary());
}
