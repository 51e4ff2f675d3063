//! Error types for the sales report pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, summarizing, rendering or dispatching.
#[derive(Error, Debug)]
pub enum SalesError {
    /// Input file does not exist
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Input file exists but could not be read
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input is not a well-formed array of sale records
    #[error("malformed sales data in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A record's price could not be turned into a non-negative amount
    #[error("record {id}: invalid price '{price}': {reason}")]
    InvalidPrice {
        id: i64,
        price: String,
        reason: String,
    },

    /// price * total_sales exceeded decimal range
    #[error("record {id}: revenue overflows decimal range")]
    RevenueOverflow { id: i64 },

    /// Summed unit sales for a year exceeded u64 range
    #[error("model year {year}: summed sales overflow")]
    SalesOverflow { year: i32 },

    /// Nothing to aggregate
    #[error("dataset contains no sale records")]
    EmptyDataset,

    /// Report artifact could not be produced
    #[error("failed to render report to '{}': {message}", path.display())]
    Render { path: PathBuf, message: String },

    /// Notification could not be delivered
    #[error("failed to deliver notification: {0}")]
    Delivery(String),
}
