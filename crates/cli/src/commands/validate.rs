//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::DetectorConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::settings;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<DetectorConfig>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    match settings::load_config(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                config: Some(config),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            config: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &DetectorConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.sensitivity == 0.0 {
        warnings.push("sensitivity is 0 - every sample above the window mean is a peak".to_string());
    }

    if config.window_size < 10 {
        warnings.push(format!(
            "window_size {} is small - the threshold will follow the signal closely",
            config.window_size
        ));
    }

    if config.delay_after_hit_ms == 0 {
        warnings.push("delay_after_hit_ms is 0 - every partial train times out on the next quiet sample".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref config) = result.config {
            println!("\n  Window size: {}", config.window_size);
            println!("  Sensitivity: {}", config.sensitivity);
            println!("  Peaks per hit: {}", config.peaks_per_hit);
            println!("  Delay after hit: {} ms", config.delay_after_hit_ms);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
