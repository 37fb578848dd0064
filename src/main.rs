//! CLI entry point for the PV rater tool.
//!
//! Provides subcommands for bucketing exported optimizer power data, rating
//! system efficiency, spotting weak panels, and totalling daily energy.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use pv_rater::analyzers::{
    aggregate_intervals, analyze_efficiency, daily_energy, find_underperforming_panels,
    rank_panels, summarize_intervals,
};
use pv_rater::output::{print_json, print_pretty, write_buckets};
use pv_rater::parser::{parse_panel_table, parse_readings};
use pv_rater::{AnalysisConfig, Outcome};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "pv_rater")]
#[command(about = "A tool to analyze solar optimizer power telemetry", long_about = None)]
struct Cli {
    /// JSON file with analysis settings; flags override its values
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bucket a `timestamp,power` CSV export into fixed windows
    Aggregate {
        /// CSV export to read
        #[arg(value_name = "FILE")]
        input: String,

        /// Window width in minutes (must divide 60)
        #[arg(short, long)]
        window: Option<u32>,

        /// Optional CSV file to write buckets to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Rate system efficiency during productive hours
    Efficiency {
        /// CSV export to read
        #[arg(value_name = "FILE")]
        input: String,

        /// Nameplate DC rating in watts (falls back to PV_RATED_POWER_WATTS)
        #[arg(short, long)]
        rated_power: Option<f64>,

        /// Number of days the export covers
        #[arg(short, long)]
        days: Option<u32>,

        /// Start of productive hours, HH:MM
        #[arg(long, value_parser = parse_hhmm)]
        start: Option<NaiveTime>,

        /// End of productive hours, HH:MM
        #[arg(long, value_parser = parse_hhmm)]
        end: Option<NaiveTime>,

        /// Minimum power in watts for a sample to count as productive
        #[arg(long)]
        floor: Option<f64>,

        /// Window width in minutes used to bucket readings first
        #[arg(short, long)]
        window: Option<u32>,

        /// Analyze raw readings instead of bucketing them first
        #[arg(long, default_value_t = false)]
        raw: bool,
    },
    /// Find panels underperforming the best panel in a wide per-panel CSV
    Panels {
        /// CSV with a `timestamp,<panel>,<panel>,...` header
        #[arg(value_name = "FILE")]
        input: String,

        /// Relative efficiency (percent of best panel) below which panels are flagged
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Also log the full panel ranking
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Estimate energy produced per calendar day
    Daily {
        /// CSV export to read
        #[arg(value_name = "FILE")]
        input: String,

        /// Window width in minutes (must divide 60)
        #[arg(short, long)]
        window: Option<u32>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/pv_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("pv_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => AnalysisConfig::default(),
    };

    match cli.command {
        Commands::Aggregate {
            input,
            window,
            output,
        } => {
            if let Some(window) = window {
                config.window_minutes = window;
            }

            let readings = parse_readings(&read_input(&input)?);
            let buckets = aggregate_intervals(&readings, config.window_minutes)?;
            info!(
                readings = readings.len(),
                buckets = buckets.len(),
                window_minutes = config.window_minutes,
                "Aggregation complete"
            );

            if let Some(path) = output {
                write_buckets(&path, &buckets)
                    .with_context(|| format!("Failed to write buckets to {path}"))?;
                info!(path = %path, "Buckets written");
            } else {
                print_pretty(&buckets);
            }

            report(
                "Interval summary",
                summarize_intervals(
                    &buckets,
                    config.window_minutes,
                    config.productivity_floor_watts,
                )?,
            )?;
        }
        Commands::Efficiency {
            input,
            rated_power,
            days,
            start,
            end,
            floor,
            window,
            raw,
        } => {
            if let Some(days) = days {
                config.analysis_period_days = days;
            }
            if let Some(start) = start {
                config.daylight_start = start;
            }
            if let Some(end) = end {
                config.daylight_end = end;
            }
            if let Some(floor) = floor {
                config.productivity_floor_watts = floor;
            }
            if let Some(window) = window {
                config.window_minutes = window;
            }

            let rated_power = rated_power.or_else(rated_power_from_env);
            let readings = parse_readings(&read_input(&input)?);

            let outcome = if raw {
                analyze_efficiency(&readings, rated_power, &config)?
            } else {
                let buckets = aggregate_intervals(&readings, config.window_minutes)?;
                if config.sample_interval_minutes.is_none() {
                    config.sample_interval_minutes = Some(config.window_minutes);
                }
                analyze_efficiency(&buckets, rated_power, &config)?
            };

            if let Outcome::Ready(efficiency) = &outcome {
                info!(
                    rating = %efficiency.rating(),
                    avg_efficiency_pct = efficiency.avg_efficiency_pct,
                    capacity_factor_pct = efficiency.capacity_factor_pct,
                    "Efficiency rated"
                );
            }
            report("Efficiency", outcome)?;
        }
        Commands::Panels {
            input,
            threshold,
            all,
        } => {
            if let Some(threshold) = threshold {
                config.threshold_percent = threshold;
            }

            let panels = parse_panel_table(&read_input(&input)?);
            info!(panels = panels.len(), "Panel table loaded");

            if all {
                report("Panel ranking", rank_panels(&panels))?;
            }

            let flagged = find_underperforming_panels(&panels, config.threshold_percent)?;
            if let Outcome::Ready(flagged) = &flagged {
                if flagged.is_empty() {
                    info!(
                        threshold_percent = config.threshold_percent,
                        "All panels within threshold"
                    );
                }
                for panel in flagged {
                    warn!(
                        panel_id = %panel.panel_id,
                        efficiency_pct = panel.efficiency_pct,
                        mean_power_watts = panel.mean_power_watts,
                        max_power_watts = panel.max_power_watts,
                        "Panel underperforming"
                    );
                }
            }
            report("Underperforming panels", flagged)?;
        }
        Commands::Daily { input, window } => {
            if let Some(window) = window {
                config.window_minutes = window;
            }

            let readings = parse_readings(&read_input(&input)?);
            let buckets = aggregate_intervals(&readings, config.window_minutes)?;
            let days = daily_energy(&buckets, config.window_minutes)?;

            let total: f64 = days.iter().map(|d| d.energy_kwh).sum();
            info!(days = days.len(), total_kwh = total, "Daily energy estimated");
            print_json(&days)?;
        }
    }

    Ok(())
}

fn read_input(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
}

fn rated_power_from_env() -> Option<f64> {
    std::env::var("PV_RATED_POWER_WATTS")
        .ok()
        .and_then(|v| v.trim().parse().ok())
}

fn parse_hhmm(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(value, "%H:%M")
}

/// Logs a ready result as JSON, or the reason it could not be computed.
fn report<T: Serialize>(label: &str, outcome: Outcome<T>) -> Result<()> {
    match outcome {
        Outcome::Ready(value) => {
            info!(label, "Result");
            print_json(&value)
        }
        Outcome::InsufficientData { reason } => {
            warn!(label, reason = %reason, "Insufficient data");
            Ok(())
        }
    }
}
