//! Locale-aware currency parsing and number formatting.
//!
//! Prices arrive as display strings (`$18,731.76`). Everything that turns
//! such a string into a [`Decimal`], or a figure back into display text,
//! goes through this module so the locale can change without touching
//! the aggregation code.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Currency symbol and separators used for parsing and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyLocale {
    /// Symbol printed before amounts and stripped when parsing.
    #[serde(default = "default_symbol", rename = "currency_symbol")]
    pub symbol: String,

    /// Digit grouping separator.
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: char,

    /// Separator between whole and fractional part.
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
}

impl Default for CurrencyLocale {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            thousands_separator: default_thousands_separator(),
            decimal_separator: default_decimal_separator(),
        }
    }
}

fn default_symbol() -> String {
    "$".to_string()
}

fn default_thousands_separator() -> char {
    ','
}

fn default_decimal_separator() -> char {
    '.'
}

/// Reasons a price string is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("no amount after removing the currency symbol")]
    Empty,

    #[error("not a decimal number: {0}")]
    Malformed(String),

    #[error("amount is negative")]
    Negative,
}

/// Parse a currency string such as `$1,234.56` into a non-negative decimal.
///
/// The locale symbol is optional and may sit at either end. Grouping
/// separators are dropped and the locale decimal separator is normalized
/// before the number is parsed.
pub fn parse_currency(text: &str, locale: &CurrencyLocale) -> Result<Decimal, PriceError> {
    let mut amount = text.trim();
    if !locale.symbol.is_empty() {
        amount = amount.strip_prefix(locale.symbol.as_str()).unwrap_or(amount);
        amount = amount.strip_suffix(locale.symbol.as_str()).unwrap_or(amount);
        amount = amount.trim();
    }

    if amount.is_empty() {
        return Err(PriceError::Empty);
    }

    let normalized: String = amount
        .chars()
        .filter(|c| *c != locale.thousands_separator)
        .map(|c| if c == locale.decimal_separator { '.' } else { c })
        .collect();

    if let Some(c) = normalized
        .chars()
        .find(|c| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
    {
        return Err(PriceError::Malformed(format!("unexpected character '{c}'")));
    }

    let value =
        Decimal::from_str(&normalized).map_err(|e| PriceError::Malformed(e.to_string()))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(PriceError::Negative);
    }

    Ok(value)
}

/// Format an amount with symbol, grouping and exactly two decimals.
pub fn format_currency(amount: Decimal, locale: &CurrencyLocale) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!(
        "{}{}{}{}{}",
        sign,
        locale.symbol,
        group_digits(whole, locale.thousands_separator),
        locale.decimal_separator,
        fraction
    )
}

/// Format a count with thousands separators, e.g. `1,234`.
pub fn format_count(count: u64, locale: &CurrencyLocale) -> String {
    group_digits(&count.to_string(), locale.thousands_separator)
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }

    grouped
}
