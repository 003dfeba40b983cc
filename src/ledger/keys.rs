//! Structured ledger keys and their persisted string form.
//!
//! In memory, ledgers are indexed by [`ReservationKey`] and [`ExpenseKey`] using
//! structural equality. The `_`-joined strings only exist at the persistence
//! boundary, where they must match data written by earlier versions.

use std::fmt;
use std::ops::RangeInclusive;

use crate::errors::{LedgerError, Result};

pub const KEY_SEPARATOR: char = '_';

/// Years whose keys round-trip through the four-digit `_YYYY` suffix.
pub const STORABLE_YEARS: RangeInclusive<i32> = 1000..=9999;

/// Identity of one Day Ledger: property, then month, then year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReservationKey {
    pub property: String,
    pub month: String,
    pub year: i32,
}

impl ReservationKey {
    pub fn new(property: impl Into<String>, month: impl Into<String>, year: i32) -> Self {
        Self {
            property: property.into(),
            month: month.into(),
            year,
        }
    }

    pub fn storage_key(&self) -> String {
        reservation_key(&self.property, &self.month, self.year)
    }

    /// Splits from the right so property names may themselves contain `_`.
    /// Returns `None` for keys without a trailing year segment.
    pub fn parse(raw: &str) -> Option<Self> {
        let (rest, year) = split_year(raw)?;
        let (property, month) = rest.rsplit_once(KEY_SEPARATOR)?;
        if property.is_empty() || month.is_empty() {
            return None;
        }
        Some(Self::new(property, month, year))
    }

    pub fn matches_period(&self, month: &str, year: i32) -> bool {
        self.month == month && self.year == year
    }
}

impl fmt::Display for ReservationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

/// Identity of one Expense Set: month and year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpenseKey {
    pub month: String,
    pub year: i32,
}

impl ExpenseKey {
    pub fn new(month: impl Into<String>, year: i32) -> Self {
        Self {
            month: month.into(),
            year,
        }
    }

    pub fn storage_key(&self) -> String {
        expense_key(&self.month, self.year)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let (month, year) = split_year(raw)?;
        if month.is_empty() {
            return None;
        }
        Some(Self::new(month, year))
    }
}

impl fmt::Display for ExpenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

/// `property_Month_year`; no validation, unknown parts simply never match.
pub fn reservation_key(property: &str, month: &str, year: i32) -> String {
    format!("{property}{KEY_SEPARATOR}{month}{KEY_SEPARATOR}{year}")
}

/// `Month_year`.
pub fn expense_key(month: &str, year: i32) -> String {
    format!("{month}{KEY_SEPARATOR}{year}")
}

/// Rejects years that would be persisted under a key `parse` cannot read back.
pub fn validate_year(year: i32) -> Result<()> {
    if STORABLE_YEARS.contains(&year) {
        Ok(())
    } else {
        Err(LedgerError::validation(format!(
            "year {} is outside {}-{}",
            year,
            STORABLE_YEARS.start(),
            STORABLE_YEARS.end()
        )))
    }
}

/// True when the key already ends in `_YYYY`.
pub fn has_year_suffix(raw: &str) -> bool {
    split_year(raw).is_some()
}

fn split_year(raw: &str) -> Option<(&str, i32)> {
    let (rest, year) = raw.rsplit_once(KEY_SEPARATOR)?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((rest, year.parse().ok()?))
}
