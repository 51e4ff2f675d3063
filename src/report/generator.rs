//! Report generation.
//!
//! This module renders a [`Report`] as a Markdown document or as JSON,
//! and writes the result to the artifact path.

use crate::error::SalesError;
use crate::models::{Report, ReportMetadata, TableCell, YearTotal};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Output format for the report artifact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension conventionally used for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.title));
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.summary_lines, &report.sales_by_year));
    output.push_str(&generate_table_section(&report.table));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Input:** `{}`\n", metadata.input));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.record_count));
    section.push('\n');

    section
}

/// Generate the summary section: one paragraph line per summary line,
/// then the per-year breakdown.
fn generate_summary_section(lines: &[String], by_year: &[YearTotal]) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    for line in lines {
        section.push_str(line);
        section.push_str("  \n");
    }
    section.push('\n');

    if !by_year.is_empty() {
        section.push_str("### Sales by Year\n\n");
        section.push_str("| Year | Total Sales |\n");
        section.push_str("|:---|---:|\n");
        for entry in by_year {
            section.push_str(&format!("| {} | {} |\n", entry.year, entry.total_sales));
        }
        section.push('\n');
    }

    section
}

/// Generate the record table section. The first row is the header.
fn generate_table_section(table: &[Vec<TableCell>]) -> String {
    let mut section = String::new();

    section.push_str("## Sales Data\n\n");

    let Some((header, rows)) = table.split_first() else {
        return section;
    };

    section.push_str(&markdown_row(header));
    section.push('|');
    for _ in header {
        section.push_str(":---|");
    }
    section.push('\n');

    for row in rows {
        section.push_str(&markdown_row(row));
    }
    section.push('\n');

    section
}

fn markdown_row(cells: &[TableCell]) -> String {
    let escaped: Vec<String> = cells
        .iter()
        .map(|c| c.to_string().replace('|', "\\|"))
        .collect();
    format!("| {} |\n", escaped.join(" | "))
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by carsales v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Render the report in the given format and write it to `path`.
pub fn write_report(report: &Report, format: OutputFormat, path: &Path) -> Result<(), SalesError> {
    let render_error = |message: String| SalesError::Render {
        path: path.to_path_buf(),
        message,
    };

    let content = match format {
        OutputFormat::Markdown => generate_markdown_report(report),
        OutputFormat::Json => generate_json_report(report).map_err(|e| render_error(e.to_string()))?,
    };

    debug!("Writing {} bytes to {}", content.len(), path.display());
    std::fs::write(path, content).map_err(|e| render_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::cars_to_table;
    use crate::models::{CarInfo, RevenueLeader, SaleRecord, SalesSummary};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn create_test_report() -> Report {
        let record = SaleRecord {
            id: 1,
            car: CarInfo {
                car_make: "Ford".to_string(),
                car_model: "F-150 | Lariat".to_string(),
                car_year: 2014,
            },
            price: "$32,000.00".to_string(),
            total_sales: 10,
        };

        Report {
            title: "Sales Summary".to_string(),
            metadata: ReportMetadata {
                input: "car_sales.json".to_string(),
                generated_at: Utc::now(),
                record_count: 1,
            },
            summary_lines: vec![
                "The Ford F-150 | Lariat (2014) generated the most revenue: $320,000.00"
                    .to_string(),
                "The Ford F-150 | Lariat (2014) generated the most sales: 10".to_string(),
                "The most popular year was 2014 with 10 sales.".to_string(),
            ],
            summary: SalesSummary {
                top_revenue: RevenueLeader {
                    record: record.clone(),
                    revenue: Decimal::new(320_000, 0),
                },
                top_sales: record.clone(),
                popular_year: YearTotal {
                    year: 2014,
                    total_sales: 10,
                },
            },
            sales_by_year: vec![YearTotal {
                year: 2014,
                total_sales: 10,
            }],
            table: cars_to_table(&[record]),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.starts_with("# Sales Summary\n"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("### Sales by Year"));
        assert!(markdown.contains("| 2014 | 10 |"));
        assert!(markdown.contains("| ID | Car | Price | Total Sales |"));
        assert!(markdown.contains("generated the most sales: 10  \n"));
    }

    #[test]
    fn test_table_cells_are_escaped() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("| 1 | Ford F-150 \\| Lariat (2014) | $32,000.00 | 10 |"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "Sales Summary");
        assert_eq!(value["table"][0][0], "ID");
        assert_eq!(value["table"][1][0], 1);
        assert_eq!(value["summary_lines"].as_array().map(|a| a.len()), Some(3));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.md");

        write_report(&create_test_report(), OutputFormat::Markdown, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("# Sales Summary"));
    }

    #[test]
    fn test_write_report_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("cars.md");

        let err = write_report(&create_test_report(), OutputFormat::Json, &path).unwrap_err();
        assert!(matches!(err, SalesError::Render { path: p, .. } if p == path));
    }
}
