//! Notification dispatch.
//!
//! A [`Notification`] carries the summary text and the rendered report as
//! an attachment. Transports implement [`Notifier`]; [`Dispatcher`] picks
//! one from configuration.

mod outbox;
mod webhook;

pub use outbox::OutboxNotifier;
pub use webhook::WebhookNotifier;

use crate::config::NotifyConfig;
use crate::error::SalesError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// An outbound message with the report attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Path of the file to attach.
    pub attachment: PathBuf,
}

impl Notification {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        attachment: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            attachment: attachment.into(),
        }
    }

    /// File name the attachment is delivered under.
    pub fn attachment_name(&self) -> String {
        self.attachment
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string())
    }

    /// MIME type of the attachment, inferred from its extension.
    pub fn attachment_mime(&self) -> &'static str {
        mime_for(&self.attachment)
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("md") => "text/markdown",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// How a notification left the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReceipt {
    /// Written to the outbox at this path.
    Spooled(PathBuf),
    /// Accepted by the webhook with this HTTP status.
    Posted { status: u16 },
    /// Dispatch disabled for this run.
    Skipped,
}

/// A channel that can deliver a notification.
pub trait Notifier {
    async fn send(&self, notification: &Notification) -> Result<DeliveryReceipt, SalesError>;
}

/// Delivery transport selectable from config or CLI.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Write an .eml message into the outbox directory (default)
    #[default]
    Outbox,
    /// POST the message to an HTTP endpoint
    Webhook,
}

/// The configured transport.
pub enum Dispatcher {
    Outbox(OutboxNotifier),
    Webhook(WebhookNotifier),
    Disabled,
}

impl Dispatcher {
    /// Build the transport described by the `[notify]` settings.
    pub fn from_config(config: &NotifyConfig, show_progress: bool) -> Result<Self, SalesError> {
        if !config.enabled {
            return Ok(Dispatcher::Disabled);
        }

        match config.transport {
            TransportKind::Outbox => Ok(Dispatcher::Outbox(OutboxNotifier::new(
                config.outbox_dir.clone(),
            ))),
            TransportKind::Webhook => {
                let url = config.webhook_url.as_deref().ok_or_else(|| {
                    SalesError::Delivery("webhook transport requires a webhook URL".to_string())
                })?;
                if config.timeout_seconds == 0 {
                    return Err(SalesError::Delivery(
                        "webhook timeout must be at least 1 second".to_string(),
                    ));
                }
                let notifier = WebhookNotifier::new(
                    url,
                    Duration::from_secs(config.timeout_seconds),
                    show_progress,
                )?;
                Ok(Dispatcher::Webhook(notifier))
            }
        }
    }

    /// Short human-readable name of the transport.
    pub fn describe(&self) -> String {
        match self {
            Dispatcher::Outbox(n) => format!("outbox ({})", n.dir().display()),
            Dispatcher::Webhook(n) => format!("webhook ({})", n.url()),
            Dispatcher::Disabled => "disabled".to_string(),
        }
    }
}

impl Notifier for Dispatcher {
    async fn send(&self, notification: &Notification) -> Result<DeliveryReceipt, SalesError> {
        match self {
            Dispatcher::Outbox(n) => n.send(notification).await,
            Dispatcher::Webhook(n) => n.send(notification).await,
            Dispatcher::Disabled => {
                info!(
                    "Dispatch disabled; not sending '{}' to {}",
                    notification.subject, notification.recipient
                );
                Ok(DeliveryReceipt::Skipped)
            }
        }
    }
}
