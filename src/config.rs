//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.carsales.toml` files.

use crate::currency::CurrencyLocale;
use crate::notify::TransportKind;
use crate::report::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".carsales.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Currency locale used to parse prices and format figures.
    #[serde(default)]
    pub locale: CurrencyLocale,

    /// Notification settings.
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Sales dataset to read.
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Report artifact to write.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_input() -> PathBuf {
    PathBuf::from("car_sales.json")
}

fn default_output() -> PathBuf {
    PathBuf::from("cars.md")
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Document title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Artifact format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            format: OutputFormat::default(),
        }
    }
}

fn default_title() -> String {
    "Sales Summary".to_string()
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Send the notification at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_sender")]
    pub sender: String,

    #[serde(default = "default_recipient")]
    pub recipient: String,

    #[serde(default = "default_subject")]
    pub subject: String,

    /// Delivery transport.
    #[serde(default)]
    pub transport: TransportKind,

    /// Spool directory for the outbox transport.
    #[serde(default = "default_outbox_dir")]
    pub outbox_dir: PathBuf,

    /// Endpoint for the webhook transport.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Webhook request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sender: default_sender(),
            recipient: default_recipient(),
            subject: default_subject(),
            transport: TransportKind::default(),
            outbox_dir: default_outbox_dir(),
            webhook_url: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sender() -> String {
    "automation@example.com".to_string()
}

fn default_recipient() -> String {
    "sales@example.com".to_string()
}

fn default_subject() -> String {
    "Sales Summary for last month".to_string()
}

fn default_outbox_dir() -> PathBuf {
    PathBuf::from("outbox")
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given explicitly on the command line (or via env)
    /// override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.general.input = input.clone();
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref output) = args.output {
            self.general.output = output.clone();
        } else if args.format.is_some() {
            self.general.output.set_extension(self.report.format.extension());
        }
        if let Some(ref title) = args.title {
            self.report.title = title.clone();
        }

        if let Some(ref sender) = args.from {
            self.notify.sender = sender.clone();
        }
        if let Some(ref recipient) = args.to {
            self.notify.recipient = recipient.clone();
        }
        if let Some(ref subject) = args.subject {
            self.notify.subject = subject.clone();
        }
        if let Some(transport) = args.transport {
            self.notify.transport = transport;
        }
        if let Some(ref dir) = args.outbox_dir {
            self.notify.outbox_dir = dir.clone();
        }
        if let Some(ref url) = args.webhook_url {
            self.notify.webhook_url = Some(url.clone());
        }
        if let Some(timeout) = args.timeout {
            self.notify.timeout_seconds = timeout;
        }

        // Flags always override
        if args.no_send {
            self.notify.enabled = false;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
