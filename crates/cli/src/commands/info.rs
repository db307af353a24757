//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::DetectorConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::settings;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    source: String,
    config: DetectorConfig,
    /// Samples consumed before the first threshold exists
    calibration_samples: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let (config, source) = match args.config {
        Some(ref path) => (
            settings::load_config(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            path.display().to_string(),
        ),
        None => {
            info!("No configuration file given, showing defaults");
            (DetectorConfig::default(), "defaults".to_string())
        }
    };

    if args.json {
        let info = ConfigInfo {
            source,
            calibration_samples: config.window_size,
            config,
        };
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config, &source);
    }

    Ok(())
}

fn print_config_info(config: &DetectorConfig, source: &str) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Hit Detector Configuration                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📄 Source: {}", source);
    println!("   └─ Version: {:?}", config.version);

    println!("\n📈 Threshold");
    println!("   ├─ Window size: {} samples", config.window_size);
    println!("   └─ Sensitivity: {}", config.sensitivity);

    println!("\n💥 Hit Train");
    println!("   ├─ Peaks per hit: {}", config.peaks_per_hit);
    println!("   └─ Delay after hit: {} ms", config.delay_after_hit_ms);

    println!("\n⚖️  Baseline");
    println!("   ├─ X: {}", config.baseline.x);
    println!("   ├─ Y: {}", config.baseline.y);
    println!("   └─ Z: {}", config.baseline.z);

    println!();
}
