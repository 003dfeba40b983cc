//! Calendar geometry for the twelve fixed month names used as ledger keys.
//!
//! Functions taking a month *name* are lenient: an unrecognized name falls back
//! to 31 days and a Sunday start so rendering never fails. Callers that need
//! strictness should resolve a [`Month`] first with [`Month::from_name`].

pub mod palette;

use std::{fmt, ops::RangeInclusive};

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

pub use palette::{color_of, PALETTE};

/// Fallback day count for unrecognized month names.
pub const FALLBACK_DAYS_IN_MONTH: u32 = 31;

/// Column headers for a Sunday-first week, matching [`first_weekday_of_month`].
pub const WEEKDAY_INITIALS: [&str; 7] = ["D", "L", "M", "M", "J", "V", "S"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    Enero,
    Febrero,
    Marzo,
    Abril,
    Mayo,
    Junio,
    Julio,
    Agosto,
    Septiembre,
    Octubre,
    Noviembre,
    Diciembre,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Enero,
        Month::Febrero,
        Month::Marzo,
        Month::Abril,
        Month::Mayo,
        Month::Junio,
        Month::Julio,
        Month::Agosto,
        Month::Septiembre,
        Month::Octubre,
        Month::Noviembre,
        Month::Diciembre,
    ];

    pub fn all() -> impl Iterator<Item = Month> {
        Month::ALL.into_iter()
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::Enero => "Enero",
            Month::Febrero => "Febrero",
            Month::Marzo => "Marzo",
            Month::Abril => "Abril",
            Month::Mayo => "Mayo",
            Month::Junio => "Junio",
            Month::Julio => "Julio",
            Month::Agosto => "Agosto",
            Month::Septiembre => "Septiembre",
            Month::Octubre => "Octubre",
            Month::Noviembre => "Noviembre",
            Month::Diciembre => "Diciembre",
        }
    }

    /// Exact, case-sensitive lookup; these names double as storage key segments.
    pub fn from_name(name: &str) -> Option<Month> {
        Month::ALL.into_iter().find(|month| month.name() == name)
    }

    /// Case-insensitive lookup for user input.
    pub fn parse(input: &str) -> Option<Month> {
        let needle = input.trim();
        Month::ALL
            .into_iter()
            .find(|month| month.name().eq_ignore_ascii_case(needle))
    }

    /// 1-based calendar month number.
    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }

    /// 0-based position in [`Month::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_number(number: u32) -> Option<Month> {
        number
            .checked_sub(1)
            .and_then(|idx| Month::ALL.get(idx as usize).copied())
    }

    pub fn days_in(self, year: i32) -> u32 {
        match self {
            Month::Abril | Month::Junio | Month::Septiembre | Month::Noviembre => 30,
            Month::Febrero if is_leap_year(year) => 29,
            Month::Febrero => 28,
            _ => 31,
        }
    }

    /// Weekday of day 1, 0 = Sunday.
    pub fn first_weekday(self, year: i32) -> u32 {
        match NaiveDate::from_ymd_opt(year, self.number(), 1) {
            Some(date) => date.weekday().num_days_from_sunday(),
            None => {
                warn!(year, month = self.name(), "year outside supported calendar range");
                0
            }
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gregorian rule: divisible by 4 and not by 100, unless also divisible by 400.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(month_name: &str, year: i32) -> u32 {
    match Month::from_name(month_name) {
        Some(month) => {
            let days = month.days_in(year);
            debug!(month = month_name, year, days, "days in month");
            days
        }
        None => {
            warn!(month = month_name, "unrecognized month name, assuming 31 days");
            FALLBACK_DAYS_IN_MONTH
        }
    }
}

/// Weekday (0 = Sunday) of day 1; unrecognized month names yield 0.
pub fn first_weekday_of_month(month_name: &str, year: i32) -> u32 {
    match Month::from_name(month_name) {
        Some(month) => month.first_weekday(year),
        None => {
            warn!(month = month_name, "unrecognized month name, assuming Sunday start");
            0
        }
    }
}

/// Leading empty slots for the first weekday followed by `1..=days_in_month`,
/// ready to be laid out in rows of seven.
pub fn build_calendar_grid(month_name: &str, year: i32) -> Vec<Option<u32>> {
    let days = days_in_month(month_name, year);
    let offset = first_weekday_of_month(month_name, year);
    let mut grid = Vec::with_capacity((days + offset) as usize);
    grid.extend((0..offset).map(|_| None));
    grid.extend((1..=days).map(Some));
    grid
}

/// Accepts any integer so unparsed user input can be checked directly.
pub fn is_valid_day(day: i64, month_name: &str, year: i32) -> bool {
    day >= 1 && day <= i64::from(days_in_month(month_name, year))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthInfo {
    pub name: String,
    pub year: i32,
    pub days_in_month: u32,
    pub first_weekday: u32,
    pub display_name: String,
    pub is_leap_year: bool,
}

pub fn month_info(month_name: &str, year: i32) -> MonthInfo {
    MonthInfo {
        name: month_name.to_string(),
        year,
        days_in_month: days_in_month(month_name, year),
        first_weekday: first_weekday_of_month(month_name, year),
        display_name: format!("{month_name} {year}"),
        is_leap_year: is_leap_year(year),
    }
}

/// Years offered for selection: `current - window ..= current + window`.
pub fn year_range(current: i32, window: i32) -> RangeInclusive<i32> {
    let window = window.max(0);
    (current - window)..=(current + window)
}
