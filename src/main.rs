mod analysis;
mod config;
mod data;
mod loader;
mod output;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use analysis::{analyze, build_report};
use config::AppConfig;
use loader::{load_bars_from_csv, validate_series, BarFormat};
use output::{print_json, print_report};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("swing_structure=info")),
        )
        .init();

    let config = AppConfig::parse();
    run(&config)
}

fn run(config: &AppConfig) -> Result<()> {
    let settings = config
        .analysis_settings()
        .context("invalid configuration")?;

    let input_path = &config.input_path;
    if !Path::new(input_path).exists() {
        bail!("input file {:?} does not exist", input_path);
    }

    let format = BarFormat {
        timezone: settings.source_tz,
        tick_size: settings.tick_size,
    };
    let bars = load_bars_from_csv(input_path, format)
        .with_context(|| format!("failed to load input data from {:?}", input_path))?;
    validate_series(&bars)?;

    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        info!(
            bars = bars.len(),
            first = %first.timestamp.with_timezone(&settings.reference_tz).format("%Y-%m-%d %H:%M"),
            last = %last.timestamp.with_timezone(&settings.reference_tz).format("%Y-%m-%d %H:%M"),
            strength = settings.strength,
            "loaded bars"
        );
    }

    let result = analyze(&bars, &settings, config.anchor_date)?;
    let report = build_report(&result);

    if config.json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }

    Ok(())
}
