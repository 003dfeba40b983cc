//! Parsing helpers for user-entered numbers.
//!
//! Amounts are parsed leniently: the longest numeric prefix wins (`"120abc"`
//! is 120) and anything unusable becomes 0. Days are strict because an
//! unparseable day must be reported back to the user.

use crate::errors::{LedgerError, Result};

/// Parses an amount the lenient way. Non-numeric, non-finite, and negative
/// inputs all yield 0.
pub fn parse_amount(input: &str) -> f64 {
    let prefix = numeric_prefix(input.trim_start());
    sanitize_amount(prefix.parse::<f64>().unwrap_or(0.0))
}

/// Clamps a raw amount into the non-negative finite range.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parses a day-of-month token; range checks happen against the month later.
pub fn parse_day(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| LedgerError::validation(format!("`{trimmed}` is not a valid day number")))
}

fn numeric_prefix(input: &str) -> &str {
    let bytes = input.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return "";
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    &input[..end]
}
