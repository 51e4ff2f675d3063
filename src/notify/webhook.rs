//! Webhook transport.
//!
//! Posts the notification as `multipart/form-data` to an HTTP endpoint
//! (a mail relay API, a chat bot, ...). Fields are `from`, `to`,
//! `subject` and `body`; the report goes in the `attachment` file part.

use super::{DeliveryReceipt, Notification, Notifier};
use crate::error::SalesError;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info};

/// Delivers notifications over HTTP.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
    show_progress: bool,
}

impl WebhookNotifier {
    /// Create a notifier for `url` with the given request timeout.
    pub fn new(url: &str, timeout: Duration, show_progress: bool) -> Result<Self, SalesError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(SalesError::Delivery(format!(
                "webhook URL must start with 'http://' or 'https://': {}",
                url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SalesError::Delivery(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.to_string(),
            client,
            show_progress,
        })
    }

    /// Endpoint messages are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_form(notification: &Notification) -> Result<Form, SalesError> {
        let bytes = std::fs::read(&notification.attachment).map_err(|e| {
            SalesError::Delivery(format!(
                "cannot read attachment '{}': {}",
                notification.attachment.display(),
                e
            ))
        })?;

        let part = Part::bytes(bytes)
            .file_name(notification.attachment_name())
            .mime_str(notification.attachment_mime())
            .map_err(|e| SalesError::Delivery(format!("invalid attachment type: {}", e)))?;

        Ok(Form::new()
            .text("from", notification.sender.clone())
            .text("to", notification.recipient.clone())
            .text("subject", notification.subject.clone())
            .text("body", notification.body.clone())
            .part("attachment", part))
    }

    fn spinner(&self) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Posting to {}", self.url));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<DeliveryReceipt, SalesError> {
        let form = Self::build_form(notification)?;

        debug!("Posting notification '{}' to {}", notification.subject, self.url);
        let spinner = self.spinner();

        let result = self.client.post(&self.url).multipart(form).send().await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let response = result.map_err(|e| {
            SalesError::Delivery(format!("request to {} failed: {}", self.url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SalesError::Delivery(format!(
                "webhook returned {}: {}",
                status,
                text.trim()
            )));
        }

        info!("Webhook accepted notification ({})", status);
        Ok(DeliveryReceipt::Posted {
            status: status.as_u16(),
        })
    }
}
