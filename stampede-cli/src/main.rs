use anyhow::{Context, Result};
use clap::Parser;
use stampede_config::{ConfigLoader, LogFormat, LoggingConfig, StampedeConfig};
use stampede_core::RunReport;
use stampede_engine::RampScheduler;
use stampede_http::HttpWorkUnit;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{Cli, Commands, ConfigCommands, OutputFormat};

// Exit status contract: 0 all thresholds passed, 1 a threshold failed,
// 2 configuration or setup error.
const EXIT_THRESHOLD_FAILED: i32 = 1;
const EXIT_CONFIG_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match dispatch(cli).await {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    }
}

async fn dispatch(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Run { output } => run_scenario(cli.config, cli.log_level, output).await,
        Commands::Config { config_cmd } => {
            init_logging(&LoggingConfig::default(), cli.log_level.as_deref())?;
            match config_cmd {
                ConfigCommands::Validate { config_file } => validate_config(&config_file),
                ConfigCommands::Generate { output } => generate_config(output.as_deref()),
            }
        }
    }
}

async fn run_scenario(
    config_path: Option<PathBuf>,
    log_level: Option<String>,
    output: OutputFormat,
) -> Result<i32> {
    let config = ConfigLoader::new()
        .load(config_path.as_ref())
        .context("Failed to load configuration")?;

    init_logging(&config.logging, log_level.as_deref())?;

    let work = HttpWorkUnit::from_config(&config.http, &config.target)
        .context("Failed to build HTTP work unit")?;

    let stages = config.scenario.stages();
    info!(
        "Starting run against {}: {} stage(s), {} threshold(s)",
        config.target.url,
        stages.len(),
        config.thresholds.len()
    );

    let scheduler = RampScheduler::new()
        .with_iteration_delay(config.scenario.iteration_delay)
        .with_drain_timeout(config.scenario.drain_timeout);

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    let report = scheduler
        .run_until(&stages, Arc::new(work), &config.thresholds, shutdown)
        .await
        .context("Run failed")?;

    match output {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to render report")?
        ),
    }

    if report.all_passed() {
        Ok(0)
    } else {
        Ok(EXIT_THRESHOLD_FAILED)
    }
}

fn validate_config(path: &std::path::Path) -> Result<i32> {
    ConfigLoader::new()
        .from_file(path)
        .with_context(|| format!("Configuration file {} is invalid", path.display()))?;

    println!("Configuration file {} is valid", path.display());
    Ok(0)
}

fn generate_config(output: Option<&std::path::Path>) -> Result<i32> {
    let sample = StampedeConfig::generate_sample();

    match output {
        Some(path) => {
            std::fs::write(path, &sample)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Sample configuration written to {}", path.display());
        }
        None => print!("{}", sample),
    }

    Ok(0)
}

fn init_logging(config: &LoggingConfig, override_level: Option<&str>) -> Result<()> {
    let level = override_level.unwrap_or_else(|| config.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }

    Ok(())
}

fn print_report(report: &RunReport) {
    println!("\n=== Run Report ===");
    println!("Total samples: {}", report.total_samples);
    if report.total_samples > 0 {
        println!(
            "Successful: {} ({:.2}%)",
            report.success_count,
            report.success_count as f64 / report.total_samples as f64 * 100.0
        );
        println!(
            "Failed: {} ({:.2}%)",
            report.failure_count,
            report.failure_count as f64 / report.total_samples as f64 * 100.0
        );
    }
    println!("Wall clock: {:.2}s", report.wall_clock.as_secs_f64());
    println!("Requests/second: {:.2}", report.requests_per_second);

    if let Some(latency) = &report.latency {
        println!("Latency:");
        println!("  Mean: {:.2}ms", latency.mean_ms);
        println!("  P50: {:.2}ms", latency.p50_ms);
        println!("  P95: {:.2}ms", latency.p95_ms);
        println!("  P99: {:.2}ms", latency.p99_ms);
        println!("  Min: {:.2}ms", latency.min_ms);
        println!("  Max: {:.2}ms", latency.max_ms);
    }

    if !report.thresholds.is_empty() {
        println!("Thresholds:");
        for result in &report.thresholds {
            let computed = result
                .computed
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "n/a (no samples)".to_string());
            println!(
                "  {} {} {}: {} (computed {})",
                result.metric,
                result.comparator,
                result.limit,
                if result.passed { "passed" } else { "FAILED" },
                computed
            );
        }
    }
}
