//! Data models for the sales report.
//!
//! This module contains the loaded sale records, the derived summary
//! and the report structure handed to the renderers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the car a record refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarInfo {
    pub car_make: String,
    pub car_model: String,
    pub car_year: i32,
}

impl fmt::Display for CarInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.car_make, self.car_model, self.car_year)
    }
}

impl CarInfo {
    /// Returns the display label, e.g. `Acura TL (2009)`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

/// A single car-sales entry as it appears in the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Record id. Not guaranteed unique.
    pub id: i64,
    /// The car this entry refers to.
    pub car: CarInfo,
    /// Unit price as a locale currency string, e.g. `$18,731.76`.
    pub price: String,
    /// Units sold.
    pub total_sales: u64,
}

/// The record that generated the most revenue, with that revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueLeader {
    pub record: SaleRecord,
    pub revenue: Decimal,
}

/// Summed unit sales for one model year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTotal {
    pub year: i32,
    pub total_sales: u64,
}

/// The three headline facts of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub top_revenue: RevenueLeader,
    pub top_sales: SaleRecord,
    pub popular_year: YearTotal,
}

/// One cell of the projected record table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableCell {
    Int(i64),
    Count(u64),
    Text(String),
}

impl fmt::Display for TableCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableCell::Int(v) => write!(f, "{}", v),
            TableCell::Count(v) => write!(f, "{}", v),
            TableCell::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for TableCell {
    fn from(s: &str) -> Self {
        TableCell::Text(s.to_string())
    }
}

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the dataset the report was computed from.
    pub input: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records in the dataset.
    pub record_count: usize,
}

/// The complete sales report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Document title.
    pub title: String,
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Human-readable summary lines.
    pub summary_lines: Vec<String>,
    /// Structured form of the summary lines.
    pub summary: SalesSummary,
    /// Unit sales per model year, ascending by year.
    pub sales_by_year: Vec<YearTotal>,
    /// Record table, header row first.
    pub table: Vec<Vec<TableCell>>,
}

impl Report {
    /// Summary lines joined with line breaks.
    pub fn body(&self) -> String {
        self.summary_lines.join("\n")
    }
}
