use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::calendar::color_of;
use crate::errors::DayConflict;

/// One day occupied by one guest stay.
///
/// `amount_paid` is shared by every day of the same client within one
/// property/month/year and is always rewritten for all of them at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "cliente", default)]
    pub client: String,
    #[serde(default)]
    pub color: String,
    #[serde(rename = "total", default, deserialize_with = "lenient_amount")]
    pub amount_paid: f64,
}

impl Booking {
    pub fn new(client: impl Into<String>, amount_paid: f64) -> Self {
        let client = client.into();
        let color = color_of(&client).to_string();
        Self {
            client,
            color,
            amount_paid,
        }
    }

    pub fn with_color(client: impl Into<String>, color: impl Into<String>, amount_paid: f64) -> Self {
        Self {
            client: client.into(),
            color: color.into(),
            amount_paid,
        }
    }

    /// Entries without a client name are legacy noise and never block a day.
    pub fn is_occupied(&self) -> bool {
        !self.client.is_empty()
    }
}

/// Day-of-month to booking map for one property/month/year.
///
/// A present key means the day is taken. Overlaps are rejected before any
/// write, so each day holds at most one client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayLedger {
    days: BTreeMap<u32, Booking>,
}

impl DayLedger {
    pub const fn new() -> Self {
        Self {
            days: BTreeMap::new(),
        }
    }

    pub fn get(&self, day: u32) -> Option<&Booking> {
        self.days.get(&day)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of day entries, i.e. occupied days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Booking)> {
        self.days.iter().map(|(day, booking)| (*day, booking))
    }

    /// Days in `start..=end` held by someone other than `client`, in day order.
    pub fn conflicts(&self, start: u32, end: u32, client: &str) -> Vec<DayConflict> {
        self.days
            .range(start..=end)
            .filter(|(_, booking)| booking.is_occupied() && booking.client != client)
            .map(|(day, booking)| DayConflict {
                day: *day,
                client: booking.client.clone(),
            })
            .collect()
    }

    pub(crate) fn assign(&mut self, start: u32, end: u32, booking: &Booking) {
        for day in start..=end {
            self.days.insert(day, booking.clone());
        }
    }

    /// Removes every entry of `client`, returning the removed bookings in day order.
    pub(crate) fn remove_client(&mut self, client: &str) -> Vec<Booking> {
        let days: Vec<u32> = self.days_of(client).collect();
        days.into_iter()
            .filter_map(|day| self.days.remove(&day))
            .collect()
    }

    pub(crate) fn set_amount(&mut self, client: &str, amount: f64) -> usize {
        let mut updated = 0;
        for booking in self.days.values_mut().filter(|b| b.client == client) {
            booking.amount_paid = amount;
            updated += 1;
        }
        updated
    }

    pub fn days_of<'a>(&'a self, client: &'a str) -> impl Iterator<Item = u32> + 'a {
        self.days
            .iter()
            .filter(move |(_, booking)| booking.client == client)
            .map(|(day, _)| *day)
    }

    pub fn holds_client(&self, client: &str) -> bool {
        self.days.values().any(|booking| booking.client == client)
    }

    /// Distinct clients with their color, in order of first occupied day.
    pub fn clients(&self) -> Vec<(&str, &str)> {
        let mut seen: Vec<(&str, &str)> = Vec::new();
        for booking in self.days.values().filter(|b| b.is_occupied()) {
            if !seen.iter().any(|(client, _)| *client == booking.client) {
                seen.push((booking.client.as_str(), booking.color.as_str()));
            }
        }
        seen
    }
}

/// Accepts numbers, numeric strings, or null; anything unusable becomes 0.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(value) => crate::utils::parse::sanitize_amount(value),
        Raw::Text(text) => crate::utils::parse::parse_amount(&text),
        Raw::Other(_) => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(client: &str, start: u32, end: u32) -> DayLedger {
        let mut ledger = DayLedger::new();
        ledger.assign(start, end, &Booking::new(client, 100.0));
        ledger
    }

    #[test]
    fn conflicts_skip_own_days() {
        let ledger = ledger_with("Ana", 5, 10);
        assert!(ledger.conflicts(5, 12, "Ana").is_empty());
        let conflicts = ledger.conflicts(8, 12, "Beto");
        let days: Vec<u32> = conflicts.iter().map(|c| c.day).collect();
        assert_eq!(days, vec![8, 9, 10]);
        assert!(conflicts.iter().all(|c| c.client == "Ana"));
    }

    #[test]
    fn remove_client_leaves_others() {
        let mut ledger = ledger_with("Ana", 1, 3);
        ledger.assign(4, 5, &Booking::new("Beto", 50.0));
        let removed = ledger.remove_client("Ana");
        assert_eq!(removed.len(), 3);
        assert_eq!(ledger.len(), 2);
        assert!(!ledger.holds_client("Ana"));
    }

    #[test]
    fn legend_lists_each_client_once() {
        let mut ledger = ledger_with("Beto", 10, 12);
        ledger.assign(1, 2, &Booking::new("Ana", 0.0));
        let legend = ledger.clients();
        assert_eq!(legend.len(), 2);
        assert_eq!(legend[0].0, "Ana");
        assert_eq!(legend[1], ("Beto", color_of("Beto")));
    }

    #[test]
    fn deserializes_persisted_shape() {
        let json = r#"{
            "3": {"cliente": "Ana", "color": "bg-emerald-400", "total": 250},
            "4": {"cliente": "Ana", "color": "bg-emerald-400", "total": "250"},
            "7": {"cliente": "Luis", "color": "bg-red-400"}
        }"#;
        let ledger: DayLedger = serde_json::from_str(json).expect("parse day ledger");
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.get(4).map(|b| b.amount_paid), Some(250.0));
        assert_eq!(ledger.get(7).map(|b| b.amount_paid), Some(0.0));

        let out = serde_json::to_value(&ledger).expect("serialize");
        assert_eq!(out["3"]["cliente"], "Ana");
        assert_eq!(out["7"]["total"], 0.0);
    }

    #[test]
    fn nameless_entries_never_conflict() {
        let json = r#"{"2": {"color": ""}}"#;
        let ledger: DayLedger = serde_json::from_str(json).expect("parse");
        assert!(ledger.conflicts(1, 3, "Ana").is_empty());
        assert_eq!(ledger.len(), 1);
    }
}
