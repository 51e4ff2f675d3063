//! CarSales - monthly car-sales summary report
//!
//! A CLI tool that summarizes a car-sales dataset, writes a report
//! document and dispatches it to the sales team.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any failure (missing/malformed input, empty dataset, render or delivery error)

mod analysis;
mod cli;
mod config;
mod currency;
mod error;
mod loader;
mod models;
mod notify;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE};
use notify::{DeliveryReceipt, Dispatcher};
use pipeline::RunSettings;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let (mut config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };
    init_logging(level);

    info!("CarSales v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match config_source {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    if let Err(e) = run_report(&config, args.quiet).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .carsales.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the input file, recipients and delivery transport.");
    Ok(())
}

/// Initialize logging at the given level. `RUST_LOG` wins when set.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete report workflow.
async fn run_report(config: &Config, quiet: bool) -> Result<()> {
    let settings = RunSettings::from(config);
    let dispatcher = Dispatcher::from_config(&config.notify, !quiet)?;

    println!("📥 Loading sales data: {}", settings.input.display());
    println!("   Report: {} ({:?})", settings.output.display(), settings.format);
    println!("   Delivery: {}", dispatcher.describe());

    let outcome = pipeline::run(&settings, &dispatcher)
        .await
        .with_context(|| format!("Sales report from {}", settings.input.display()))?;

    println!("\n📊 {} ({} records):", config.report.title, outcome.record_count);
    for line in &outcome.summary_lines {
        println!("   {}", line);
    }
    println!("\n✅ Report saved to: {}", outcome.artifact.display());

    match outcome.receipt {
        DeliveryReceipt::Spooled(path) => {
            println!("📨 Message to {} spooled at {}", settings.recipient, path.display())
        }
        DeliveryReceipt::Posted { status } => {
            println!("📨 Message to {} delivered (HTTP {})", settings.recipient, status)
        }
        DeliveryReceipt::Skipped => println!("📭 Notification not sent (dispatch disabled)"),
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Also returns the path the configuration came from, if any.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Ok((Config::load(config_path)?, Some(config_path.clone())));
    }

    match Config::load_default()? {
        Some(config) => Ok((config, Some(PathBuf::from(CONFIG_FILE)))),
        None => Ok((Config::default(), None)),
    }
}
