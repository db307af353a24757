//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// hitdetect - Adaptive-threshold impact detector for accelerometer data
#[derive(Parser, Debug)]
#[command(
    name = "hitdetect",
    author,
    version,
    about = "Adaptive-threshold accelerometer hit detector",
    long_about = "Counts physical impacts in a stream of tri-axial accelerometer samples.\n\n\
                  Each sample is baseline corrected and reduced to a magnitude, compared \n\
                  against a threshold derived from recent non-peak samples, and rising \n\
                  edges are grouped into hits."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "HITDETECT_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "HITDETECT_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a recorded CSV file through the detector
    Run(RunArgs),

    /// Drive the detector with a synthetic signal
    Simulate(SimulateArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display the effective detector configuration
    Info(InfoArgs),
}

/// Detector parameter overrides shared by `run` and `simulate`
#[derive(Args, Debug, Clone, Default)]
pub struct DetectorOverrides {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "HITDETECT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Threshold multiplier on the window standard deviation
    #[arg(long, env = "HITDETECT_SENSITIVITY")]
    pub sensitivity: Option<f64>,

    /// Sliding window capacity in samples
    #[arg(long)]
    pub window_size: Option<usize>,

    /// Peaks forming one full hit train
    #[arg(long)]
    pub peaks_per_hit: Option<u32>,

    /// Silence in milliseconds that ends a partial train
    #[arg(long)]
    pub delay_after_hit: Option<u64>,

    /// X axis rest offset
    #[arg(long, allow_hyphen_values = true)]
    pub baseline_x: Option<i32>,

    /// Y axis rest offset
    #[arg(long, allow_hyphen_values = true)]
    pub baseline_y: Option<i32>,

    /// Z axis rest offset
    #[arg(long, allow_hyphen_values = true)]
    pub baseline_z: Option<i32>,
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// CSV file with one `timestamp,x,y,z` sample per line
    pub input: PathBuf,

    #[command(flatten)]
    pub detector: DetectorOverrides,

    /// Reject malformed lines instead of reading them as zeros
    #[arg(long)]
    pub strict: bool,

    /// Replay speed multiplier on sample timestamps (0 = as fast as possible)
    #[arg(long, default_value = "0", env = "HITDETECT_SPEED")]
    pub speed: f64,

    /// Stop after this many samples (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub max_samples: u64,

    /// Print each hit as it is detected
    #[arg(long)]
    pub events: bool,

    /// Output the run report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `simulate` command
#[derive(Parser, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub detector: DetectorOverrides,

    /// Number of impacts to generate
    #[arg(long, default_value = "5")]
    pub impacts: u32,

    /// Spikes per generated impact
    #[arg(long, default_value = "4")]
    pub peaks_per_impact: u32,

    /// Interval between impacts in milliseconds
    #[arg(long, default_value = "1000")]
    pub impact_spacing: u64,

    /// Interval between spikes of one impact in milliseconds
    #[arg(long, default_value = "6")]
    pub peak_spacing: u64,

    /// Spike height in counts
    #[arg(long, default_value = "2000")]
    pub amplitude: i32,

    /// Maximum per-axis rest noise in counts
    #[arg(long, default_value = "8")]
    pub noise: i32,

    /// Sample interval in milliseconds
    #[arg(long, default_value = "2")]
    pub interval: u64,

    /// RNG seed
    #[arg(long, default_value = "42", env = "HITDETECT_SEED")]
    pub seed: u64,

    /// Print each hit as it is detected
    #[arg(long)]
    pub events: bool,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long)]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file (defaults are shown when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
