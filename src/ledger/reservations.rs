//! The reservation ledger: every Day Ledger, indexed by property/month/year.

use std::collections::{BTreeMap, BTreeSet};

use serde::{ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::calendar::{color_of, days_in_month};
use crate::errors::{LedgerError, Result};
use crate::utils::parse::sanitize_amount;

use super::booking::{Booking, DayLedger};
use super::keys::{validate_year, ReservationKey};

static EMPTY_DAY_LEDGER: DayLedger = DayLedger::new();

/// Target of a create or move: a property and an inclusive day range within
/// one month/year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StayRange {
    pub property: String,
    pub month: String,
    pub year: i32,
    pub start_day: u32,
    pub end_day: u32,
}

impl StayRange {
    pub fn new(
        property: impl Into<String>,
        month: impl Into<String>,
        year: i32,
        start_day: u32,
        end_day: u32,
    ) -> Self {
        Self {
            property: property.into(),
            month: month.into(),
            year,
            start_day,
            end_day,
        }
    }

    pub fn key(&self) -> ReservationKey {
        ReservationKey::new(self.property.clone(), self.month.clone(), self.year)
    }

    fn validate(&self) -> Result<()> {
        validate_year(self.year)?;
        let days = days_in_month(&self.month, self.year);
        if self.start_day > self.end_day {
            return Err(LedgerError::validation(format!(
                "check-in day {} is after check-out day {}",
                self.start_day, self.end_day
            )));
        }
        if self.start_day < 1 || self.end_day > days {
            return Err(LedgerError::validation(format!(
                "days must be between 1 and {} for {} {}",
                days, self.month, self.year
            )));
        }
        Ok(())
    }
}

/// Outcome of a successful create or move.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingReceipt {
    pub client: String,
    pub property: String,
    pub start_day: u32,
    pub end_day: u32,
    pub amount_paid: f64,
    pub color: String,
}

impl BookingReceipt {
    pub fn nights(&self) -> u32 {
        self.end_day - self.start_day + 1
    }
}

/// A client's occupancy across every property of one month/year.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientStay {
    pub days: BTreeSet<u32>,
    pub properties: BTreeSet<String>,
    pub total: f64,
    pub first_day: u32,
    pub last_day: u32,
    pub color: String,
}

impl ClientStay {
    /// Property the edit form starts from: the first one the client occupies.
    pub fn primary_property(&self) -> Option<&str> {
        self.properties.iter().next().map(String::as_str)
    }

    /// True when the occupied days form one unbroken block.
    pub fn is_contiguous(&self) -> bool {
        self.days.len() as u32 == self.last_day - self.first_day + 1
    }
}

/// Owns every booking. All mutation goes through its operations, and each
/// operation validates fully before touching state, so a rejected call
/// leaves the ledger exactly as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationLedger {
    entries: BTreeMap<ReservationKey, DayLedger>,
    /// Persisted keys that do not parse as property/month/year. Kept so a
    /// save never drops them, but invisible to every read.
    legacy: BTreeMap<String, DayLedger>,
}

impl ReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The Day Ledger for the key, or an empty one when absent.
    pub fn day_ledger(&self, property: &str, month: &str, year: i32) -> &DayLedger {
        self.entries
            .get(&ReservationKey::new(property, month, year))
            .unwrap_or(&EMPTY_DAY_LEDGER)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ReservationKey, &DayLedger)> {
        self.entries.iter()
    }

    pub fn legacy_keys(&self) -> impl Iterator<Item = &str> {
        self.legacy.keys().map(String::as_str)
    }

    /// Day Ledgers of every property for one month/year, ordered by property.
    pub fn period<'a>(
        &'a self,
        month: &'a str,
        year: i32,
    ) -> impl Iterator<Item = (&'a ReservationKey, &'a DayLedger)> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| key.matches_period(month, year))
    }

    pub fn create_booking(
        &mut self,
        stay: &StayRange,
        client: &str,
        amount: Option<f64>,
    ) -> Result<BookingReceipt> {
        let client = client.trim();
        if client.is_empty() {
            return Err(LedgerError::validation("client name must not be empty"));
        }
        stay.validate()?;

        let key = stay.key();
        let current = self.entries.get(&key).unwrap_or(&EMPTY_DAY_LEDGER);
        let conflicts = current.conflicts(stay.start_day, stay.end_day, client);
        if !conflicts.is_empty() {
            warn!(%key, client, conflicts = conflicts.len(), "booking rejected");
            return Err(LedgerError::Conflict(conflicts));
        }

        // A client already present in this key keeps one shared amount and color.
        let existing = current
            .iter()
            .map(|(_, booking)| booking)
            .find(|booking| booking.client == client);
        let amount = sanitize_amount(
            amount
                .or_else(|| existing.map(|booking| booking.amount_paid))
                .unwrap_or(0.0),
        );
        let booking = match existing {
            Some(found) => Booking::with_color(client, found.color.clone(), amount),
            None => Booking::new(client, amount),
        };

        let ledger = self.entries.entry(key.clone()).or_default();
        ledger.assign(stay.start_day, stay.end_day, &booking);
        ledger.set_amount(client, amount);
        info!(%key, client, start = stay.start_day, end = stay.end_day, "booking created");

        Ok(BookingReceipt {
            client: booking.client,
            property: stay.property.clone(),
            start_day: stay.start_day,
            end_day: stay.end_day,
            amount_paid: amount,
            color: booking.color,
        })
    }

    /// Removes every booking of `client` in `month`/`year` across all
    /// properties. Returns the number of days freed; unknown clients free 0.
    pub fn delete_client(&mut self, month: &str, year: i32, client: &str) -> usize {
        let mut removed = 0;
        for (key, ledger) in self.entries.iter_mut() {
            if key.matches_period(month, year) {
                removed += ledger.remove_client(client).len();
            }
        }
        info!(month, year, client, removed, "client bookings deleted");
        removed
    }

    /// Moves or resizes a client's stay to `destination`.
    ///
    /// Conflicts are checked at the destination only, ignoring days the
    /// client already holds there. Only after that check passes are the
    /// client's existing entries for the month removed and the new range
    /// written with the client's previous color and amount.
    pub fn move_booking(&mut self, client: &str, destination: &StayRange) -> Result<BookingReceipt> {
        let client = client.trim();
        if client.is_empty() {
            return Err(LedgerError::validation("client name must not be empty"));
        }
        destination.validate()?;

        let key = destination.key();
        let conflicts = self
            .entries
            .get(&key)
            .unwrap_or(&EMPTY_DAY_LEDGER)
            .conflicts(destination.start_day, destination.end_day, client);
        if !conflicts.is_empty() {
            warn!(%key, client, conflicts = conflicts.len(), "move rejected");
            return Err(LedgerError::Conflict(conflicts));
        }

        let previous = self
            .period(&destination.month, destination.year)
            .flat_map(|(_, ledger)| ledger.iter().map(|(_, booking)| booking))
            .find(|booking| booking.client == client)
            .cloned();
        let (color, amount) = match previous {
            Some(booking) if !booking.color.is_empty() => (booking.color, booking.amount_paid),
            Some(booking) => (color_of(client).to_string(), booking.amount_paid),
            None => {
                debug!(client, "moving a client without bookings, creating fresh stay");
                (color_of(client).to_string(), 0.0)
            }
        };

        self.delete_client(&destination.month, destination.year, client);
        let booking = Booking::with_color(client, color, amount);
        self.entries.entry(key.clone()).or_default().assign(
            destination.start_day,
            destination.end_day,
            &booking,
        );
        info!(%key, client, start = destination.start_day, end = destination.end_day, "booking moved");

        Ok(BookingReceipt {
            client: booking.client,
            property: destination.property.clone(),
            start_day: destination.start_day,
            end_day: destination.end_day,
            amount_paid: amount,
            color: booking.color,
        })
    }

    /// Overwrites the amount on every day of `client` in `month`/`year`,
    /// across all properties. Returns the number of entries updated.
    pub fn set_client_amount(&mut self, client: &str, month: &str, year: i32, amount: f64) -> usize {
        let amount = sanitize_amount(amount);
        let mut updated = 0;
        for (key, ledger) in self.entries.iter_mut() {
            if key.matches_period(month, year) {
                updated += ledger.set_amount(client, amount);
            }
        }
        info!(month, year, client, amount, updated, "client amount updated");
        updated
    }

    /// Groups the month's bookings by client across every property.
    ///
    /// `total` is taken from the first entry seen for a client. `first_day`
    /// and `last_day` are the min/max day even when the set has gaps.
    pub fn group_by_client(&self, month: &str, year: i32) -> BTreeMap<String, ClientStay> {
        let mut grouped: BTreeMap<String, ClientStay> = BTreeMap::new();
        for (key, ledger) in self.period(month, year) {
            for (day, booking) in ledger.iter().filter(|(_, b)| b.is_occupied()) {
                let stay = grouped
                    .entry(booking.client.clone())
                    .or_insert_with(|| ClientStay {
                        days: BTreeSet::new(),
                        properties: BTreeSet::new(),
                        total: booking.amount_paid,
                        first_day: day,
                        last_day: day,
                        color: booking.color.clone(),
                    });
                stay.days.insert(day);
                stay.properties.insert(key.property.clone());
                stay.first_day = stay.first_day.min(day);
                stay.last_day = stay.last_day.max(day);
            }
        }
        grouped
    }

    fn from_raw(raw: BTreeMap<String, DayLedger>) -> Self {
        let mut ledger = Self::default();
        for (raw_key, days) in raw {
            match ReservationKey::parse(&raw_key) {
                Some(key) => {
                    ledger.entries.insert(key, days);
                }
                None => {
                    warn!(key = %raw_key, "unrecognized reservation key kept as-is");
                    ledger.legacy.insert(raw_key, days);
                }
            }
        }
        ledger
    }
}

impl Serialize for ReservationLedger {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len() + self.legacy.len()))?;
        for (key, days) in &self.entries {
            map.serialize_entry(&key.storage_key(), days)?;
        }
        for (key, days) in &self.legacy {
            map.serialize_entry(key, days)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ReservationLedger {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, DayLedger>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw))
    }
}
