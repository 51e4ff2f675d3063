//! End-to-end report run.
//!
//! Load, summarize, render, dispatch; strictly in that order. A failure
//! in any stage returns before the next one starts, so an empty or broken
//! dataset never produces an artifact and a failed render never sends.

use crate::analysis::{cars_to_table, sales_by_year, summarize, summary_lines};
use crate::config::Config;
use crate::currency::CurrencyLocale;
use crate::error::SalesError;
use crate::loader::load_records;
use crate::models::{Report, ReportMetadata, SaleRecord, YearTotal};
use crate::notify::{DeliveryReceipt, Notification, Notifier};
use crate::report::{write_report, OutputFormat};
use chrono::Utc;
use std::path::PathBuf;
use tracing::{debug, info};

/// Everything a single run needs, resolved from config and CLI.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub title: String,
    pub locale: CurrencyLocale,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
}

impl From<&Config> for RunSettings {
    fn from(config: &Config) -> Self {
        Self {
            input: config.general.input.clone(),
            output: config.general.output.clone(),
            format: config.report.format,
            title: config.report.title.clone(),
            locale: config.locale.clone(),
            sender: config.notify.sender.clone(),
            recipient: config.notify.recipient.clone(),
            subject: config.notify.subject.clone(),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub record_count: usize,
    pub summary_lines: Vec<String>,
    pub artifact: PathBuf,
    pub receipt: DeliveryReceipt,
}

/// Build the report for an already-loaded dataset.
pub fn build_report(records: &[SaleRecord], settings: &RunSettings) -> Result<Report, SalesError> {
    let summary = summarize(records, &settings.locale)?;
    let lines = summary_lines(&summary, &settings.locale);
    debug!("Summary: {:?}", lines);

    Ok(Report {
        title: settings.title.clone(),
        metadata: ReportMetadata {
            input: settings.input.display().to_string(),
            generated_at: Utc::now(),
            record_count: records.len(),
        },
        summary_lines: lines,
        summary,
        sales_by_year: sales_by_year(records)?
            .into_iter()
            .map(|(year, total_sales)| YearTotal { year, total_sales })
            .collect(),
        table: cars_to_table(records),
    })
}

/// Run the whole pipeline, delivering through `notifier`.
pub async fn run<N: Notifier>(settings: &RunSettings, notifier: &N) -> Result<RunOutcome, SalesError> {
    let records = load_records(&settings.input)?;
    let report = build_report(&records, settings)?;

    write_report(&report, settings.format, &settings.output)?;
    info!("Report written to {}", settings.output.display());

    let notification = Notification::new(
        settings.sender.clone(),
        settings.recipient.clone(),
        settings.subject.clone(),
        report.body(),
        settings.output.clone(),
    );
    let receipt = notifier.send(&notification).await?;

    Ok(RunOutcome {
        record_count: records.len(),
        summary_lines: report.summary_lines,
        artifact: settings.output.clone(),
        receipt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::OutboxNotifier;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        async fn send(&self, notification: &Notification) -> Result<DeliveryReceipt, SalesError> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(DeliveryReceipt::Skipped)
        }
    }

    fn settings(dir: &Path, input: &str) -> RunSettings {
        let input_path = dir.join("car_sales.json");
        std::fs::write(&input_path, input).unwrap();

        let mut config = Config::default();
        config.general.input = input_path;
        config.general.output = dir.join("cars.md");
        RunSettings::from(&config)
    }

    const SCENARIO_A: &str = r#"[
        {"id": 1, "car": {"car_make": "Make", "car_model": "X", "car_year": 2020}, "price": "$10.00", "total_sales": 5},
        {"id": 2, "car": {"car_make": "Make", "car_model": "Y", "car_year": 2021}, "price": "$5.00", "total_sales": 20}
    ]"#;

    #[tokio::test]
    async fn test_run_renders_and_dispatches() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), SCENARIO_A);
        let notifier = RecordingNotifier::default();

        let outcome = run(&settings, &notifier).await.unwrap();

        assert_eq!(outcome.record_count, 2);
        assert_eq!(
            outcome.summary_lines,
            vec![
                "The Make Y (2021) generated the most revenue: $100.00",
                "The Make Y (2021) generated the most sales: 20",
                "The most popular year was 2021 with 20 sales.",
            ]
        );

        let artifact = std::fs::read_to_string(&outcome.artifact).unwrap();
        assert!(artifact.contains("# Sales Summary"));
        assert!(artifact.contains("| 2 | Make Y (2021) | $5.00 | 20 |"));

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Sales Summary for last month");
        assert_eq!(sent[0].body, outcome.summary_lines.join("\n"));
        assert_eq!(sent[0].attachment, settings.output);
    }

    #[tokio::test]
    async fn test_empty_dataset_produces_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path(), "[]");
        let notifier = RecordingNotifier::default();

        let err = run(&settings, &notifier).await.unwrap_err();

        assert!(matches!(err, SalesError::EmptyDataset));
        assert!(!settings.output.exists());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_input_produces_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(dir.path(), SCENARIO_A);
        settings.input = dir.path().join("absent.json");
        let notifier = RecordingNotifier::default();

        let err = run(&settings, &notifier).await.unwrap_err();

        assert!(matches!(err, SalesError::NotFound(_)));
        assert!(!settings.output.exists());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_render_failure_skips_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(dir.path(), SCENARIO_A);
        settings.output = dir.path().join("no-such-dir").join("cars.md");
        let notifier = RecordingNotifier::default();

        let err = run(&settings, &notifier).await.unwrap_err();

        assert!(matches!(err, SalesError::Render { .. }));
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_with_outbox_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(dir.path(), include_str!("../fixtures/car_sales.json"));
        settings.format = OutputFormat::Json;
        settings.output = dir.path().join("cars.json");
        let outbox = OutboxNotifier::new(dir.path().join("outbox"));

        let outcome = run(&settings, &outbox).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&outcome.artifact).unwrap()).unwrap();
        assert_eq!(json["summary"]["popular_year"]["year"], 2007);
        assert_eq!(json["table"].as_array().map(|t| t.len()), Some(13));

        let DeliveryReceipt::Spooled(message) = outcome.receipt else {
            panic!("expected spooled receipt");
        };
        let eml = std::fs::read_to_string(message).unwrap();
        assert!(eml.contains("Content-Type: application/json"));
        assert!(eml.contains("The most popular year was 2007 with 2,571 sales."));
    }
}
