//! Analysis modules.
//!
//! Aggregation of the loaded dataset into summary figures, and the flat
//! table projection of the records.

pub mod aggregator;
pub mod table;

pub use aggregator::*;
pub use table::*;
