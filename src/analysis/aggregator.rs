//! Sales aggregation and statistics.
//!
//! This module computes the headline figures of a report from the full
//! in-memory dataset: the record with the most revenue, the record with
//! the most unit sales, and the model year with the most unit sales.
//!
//! Every maximum is taken with a strict greater-than, so on exact ties the
//! earliest candidate wins: the first record in file order for the two
//! per-record maxima, the lowest year for the year grouping.

use crate::currency::{format_count, format_currency, parse_currency, CurrencyLocale};
use crate::error::SalesError;
use crate::models::{RevenueLeader, SaleRecord, SalesSummary, YearTotal};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Revenue of one record: `total_sales * price`.
pub fn record_revenue(record: &SaleRecord, locale: &CurrencyLocale) -> Result<Decimal, SalesError> {
    let price = parse_currency(&record.price, locale).map_err(|e| SalesError::InvalidPrice {
        id: record.id,
        price: record.price.clone(),
        reason: e.to_string(),
    })?;

    price
        .checked_mul(Decimal::from(record.total_sales))
        .ok_or(SalesError::RevenueOverflow { id: record.id })
}

/// Find the record that generated the most revenue.
pub fn top_revenue(
    records: &[SaleRecord],
    locale: &CurrencyLocale,
) -> Result<RevenueLeader, SalesError> {
    let mut best: Option<(&SaleRecord, Decimal)> = None;

    for record in records {
        let revenue = record_revenue(record, locale)?;
        match best {
            Some((_, max)) if revenue <= max => {}
            _ => best = Some((record, revenue)),
        }
    }

    best.map(|(record, revenue)| RevenueLeader {
        record: record.clone(),
        revenue,
    })
    .ok_or(SalesError::EmptyDataset)
}

/// Find the record with the most unit sales.
pub fn top_sales(records: &[SaleRecord]) -> Result<&SaleRecord, SalesError> {
    let mut best: Option<&SaleRecord> = None;

    for record in records {
        match best {
            Some(max) if record.total_sales <= max.total_sales => {}
            _ => best = Some(record),
        }
    }

    best.ok_or(SalesError::EmptyDataset)
}

/// Sum unit sales per model year, ascending by year.
pub fn sales_by_year(records: &[SaleRecord]) -> Result<BTreeMap<i32, u64>, SalesError> {
    let mut totals: BTreeMap<i32, u64> = BTreeMap::new();

    for record in records {
        let year = record.car.car_year;
        let total = totals.entry(year).or_default();
        *total = total
            .checked_add(record.total_sales)
            .ok_or(SalesError::SalesOverflow { year })?;
    }

    Ok(totals)
}

/// Find the model year with the most summed unit sales.
///
/// Years are compared in ascending order, so the lowest year wins a tie.
pub fn most_popular_year(records: &[SaleRecord]) -> Result<YearTotal, SalesError> {
    let mut best: Option<YearTotal> = None;

    for (year, total_sales) in sales_by_year(records)? {
        match best {
            Some(max) if total_sales <= max.total_sales => {}
            _ => best = Some(YearTotal { year, total_sales }),
        }
    }

    best.ok_or(SalesError::EmptyDataset)
}

/// Compute all three headline figures.
pub fn summarize(records: &[SaleRecord], locale: &CurrencyLocale) -> Result<SalesSummary, SalesError> {
    if records.is_empty() {
        return Err(SalesError::EmptyDataset);
    }

    Ok(SalesSummary {
        top_revenue: top_revenue(records, locale)?,
        top_sales: top_sales(records)?.clone(),
        popular_year: most_popular_year(records)?,
    })
}

/// Render the summary as the three human-readable report lines.
pub fn summary_lines(summary: &SalesSummary, locale: &CurrencyLocale) -> Vec<String> {
    vec![
        format!(
            "The {} generated the most revenue: {}",
            summary.top_revenue.record.car,
            format_currency(summary.top_revenue.revenue, locale)
        ),
        format!(
            "The {} generated the most sales: {}",
            summary.top_sales.car,
            format_count(summary.top_sales.total_sales, locale)
        ),
        format!(
            "The most popular year was {} with {} sales.",
            summary.popular_year.year,
            format_count(summary.popular_year.total_sales, locale)
        ),
    ]
}
