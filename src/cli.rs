//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Every option is optional so that values from
//! `.carsales.toml` apply unless overridden here.

use crate::notify::TransportKind;
use crate::report::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// CarSales - monthly car-sales summary report
///
/// Reads a JSON list of car-sales records, finds the top revenue model,
/// the top selling model and the most popular model year, writes a
/// report and sends it on to the sales team.
///
/// Examples:
///   carsales
///   carsales --input data/car_sales.json --format json
///   carsales --transport webhook --webhook-url https://relay.example.com/send
///   carsales --no-send
///   carsales --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Sales dataset (JSON array of records)
    ///
    /// Default: car_sales.json
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Default: cars.md (cars.json with --format json)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Report title
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .carsales.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sender address
    #[arg(long, value_name = "ADDR", env = "CARSALES_SENDER")]
    pub from: Option<String>,

    /// Recipient address
    #[arg(long, value_name = "ADDR", env = "CARSALES_RECIPIENT")]
    pub to: Option<String>,

    /// Subject line of the notification
    #[arg(long, value_name = "TEXT")]
    pub subject: Option<String>,

    /// How to deliver the notification (outbox, webhook)
    #[arg(long, value_name = "KIND")]
    pub transport: Option<TransportKind>,

    /// Spool directory for the outbox transport
    #[arg(long, value_name = "DIR")]
    pub outbox_dir: Option<PathBuf>,

    /// Endpoint for the webhook transport
    #[arg(long, value_name = "URL", env = "CARSALES_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Webhook request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Write the report but do not send the notification
    #[arg(long)]
    pub no_send: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .carsales.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        for (flag, address) in [("--from", &self.from), ("--to", &self.to)] {
            if let Some(address) = address {
                if !address.contains('@') {
                    return Err(format!("{} must be an email address: {}", flag, address));
                }
            }
        }

        if let Some(ref url) = self.webhook_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Webhook URL must start with 'http://' or 'https://'".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
