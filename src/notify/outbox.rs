//! Outbox transport.
//!
//! Messages are written as RFC 5322 `multipart/mixed` `.eml` files into a
//! spool directory, ready for a mail relay to pick up.

use super::{DeliveryReceipt, Notification, Notifier};
use crate::error::SalesError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Spools notifications as `.eml` files.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    dir: PathBuf,
}

impl OutboxNotifier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Spool directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Notifier for OutboxNotifier {
    async fn send(&self, notification: &Notification) -> Result<DeliveryReceipt, SalesError> {
        let attachment = std::fs::read_to_string(&notification.attachment).map_err(|e| {
            SalesError::Delivery(format!(
                "cannot read attachment '{}': {}",
                notification.attachment.display(),
                e
            ))
        })?;

        std::fs::create_dir_all(&self.dir).map_err(|e| {
            SalesError::Delivery(format!(
                "cannot create outbox '{}': {}",
                self.dir.display(),
                e
            ))
        })?;

        let now = Utc::now();
        let path = self.dir.join(message_file_name(&notification.subject, now));
        let message = compose_message(notification, &attachment, now);

        debug!("Spooling {} byte message to {}", message.len(), path.display());
        std::fs::write(&path, message).map_err(|e| {
            SalesError::Delivery(format!("cannot write '{}': {}", path.display(), e))
        })?;

        info!("Message for {} spooled to {}", notification.recipient, path.display());
        Ok(DeliveryReceipt::Spooled(path))
    }
}

/// Build the full `.eml` text for a notification.
pub fn compose_message(notification: &Notification, attachment: &str, date: DateTime<Utc>) -> String {
    let boundary = format!("=_carsales_{}", date.timestamp_micros());
    let file_name = header_value(&notification.attachment_name()).replace('"', "'");
    let mut message = String::new();

    let mut line = |text: &str| {
        message.push_str(text);
        message.push_str("\r\n");
    };

    line(&format!("From: {}", header_value(&notification.sender)));
    line(&format!("To: {}", header_value(&notification.recipient)));
    line(&format!("Subject: {}", header_value(&notification.subject)));
    line(&format!("Date: {}", date.to_rfc2822()));
    line("MIME-Version: 1.0");
    line(&format!("Content-Type: multipart/mixed; boundary=\"{}\"", boundary));
    line("");

    line(&format!("--{}", boundary));
    line("Content-Type: text/plain; charset=utf-8");
    line("Content-Transfer-Encoding: 8bit");
    line("");
    line(&crlf(&notification.body));

    line(&format!("--{}", boundary));
    line(&format!(
        "Content-Type: {}; charset=utf-8; name=\"{}\"",
        notification.attachment_mime(),
        file_name
    ));
    line(&format!("Content-Disposition: attachment; filename=\"{}\"", file_name));
    line("Content-Transfer-Encoding: 8bit");
    line("");
    line(&crlf(attachment));
    line(&format!("--{}--", boundary));

    message
}

/// Header values must stay on one line; CR and LF become spaces.
fn header_value(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect()
}

fn crlf(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join("\r\n")
}

fn message_file_name(subject: &str, date: DateTime<Utc>) -> String {
    let mut slug = String::new();
    for ch in subject.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "message" } else { slug };

    format!("{}-{}.eml", date.format("%Y%m%dT%H%M%S%.6fZ"), slug)
}
