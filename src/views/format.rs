//! Display formatting for money, dates and optional text

use std::fmt::Write;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder shown for absent optional fields
pub const PLACEHOLDER: &str = "—";

/// en-US short date, e.g. 3/5/2024
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Format a monetary amount as `<symbol><grouped digits>`.
///
/// Follows default en-US number formatting: `,` thousands separators and at
/// most three fraction digits with trailing zeros dropped.
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = amount
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(symbol.len() + digits.len() + digits.len() / 3 + 1);
    out.push_str(symbol);
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a timestamp as a date in the zone given by `offset`. An unusable
/// format string falls back to [`DEFAULT_DATE_FORMAT`].
pub fn format_date(date: DateTime<Utc>, format: &str, offset: FixedOffset) -> String {
    let date = date.with_timezone(&offset);
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        return date.format(DEFAULT_DATE_FORMAT).to_string();
    }
    out
}

/// Optional text, or the placeholder when missing or empty
pub fn or_placeholder(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.is_empty() => text,
        _ => PLACEHOLDER,
    }
}
