//! Monthly operating expenses.

use std::collections::BTreeMap;
use std::fmt;

use serde::{ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use tracing::{info, warn};

use crate::errors::Result;
use crate::utils::parse::{parse_amount, sanitize_amount};

use super::keys::{validate_year, ExpenseKey};

/// The fixed expense categories. `storage_name` is what persisted data uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExpenseCategory {
    Gas,
    Electricity,
    Water,
    Cable,
    Municipal,
    Rent,
    Misc,
    Taxes,
    Gardener,
    Housekeeper,
    PoolService,
    Marketing,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 12] = [
        ExpenseCategory::Gas,
        ExpenseCategory::Electricity,
        ExpenseCategory::Water,
        ExpenseCategory::Cable,
        ExpenseCategory::Municipal,
        ExpenseCategory::Rent,
        ExpenseCategory::Misc,
        ExpenseCategory::Taxes,
        ExpenseCategory::Gardener,
        ExpenseCategory::Housekeeper,
        ExpenseCategory::PoolService,
        ExpenseCategory::Marketing,
    ];

    pub fn storage_name(self) -> &'static str {
        match self {
            ExpenseCategory::Gas => "Gas",
            ExpenseCategory::Electricity => "Luz",
            ExpenseCategory::Water => "Agua",
            ExpenseCategory::Cable => "Cable",
            ExpenseCategory::Municipal => "Municipalidad",
            ExpenseCategory::Rent => "Rentas",
            ExpenseCategory::Misc => "Varios",
            ExpenseCategory::Taxes => "Impuestos",
            ExpenseCategory::Gardener => "Jardinero",
            ExpenseCategory::Housekeeper => "Empleada",
            ExpenseCategory::PoolService => "Piletero",
            ExpenseCategory::Marketing => "Marketing",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Gas => "Gas",
            ExpenseCategory::Electricity => "Electricity",
            ExpenseCategory::Water => "Water",
            ExpenseCategory::Cable => "Cable",
            ExpenseCategory::Municipal => "Municipal",
            ExpenseCategory::Rent => "Rent",
            ExpenseCategory::Misc => "Misc",
            ExpenseCategory::Taxes => "Taxes",
            ExpenseCategory::Gardener => "Gardener",
            ExpenseCategory::Housekeeper => "Housekeeper",
            ExpenseCategory::PoolService => "Pool service",
            ExpenseCategory::Marketing => "Marketing",
        }
    }

    /// Case-insensitive match on either the stored name or the English label.
    pub fn parse(input: &str) -> Option<Self> {
        let wanted = input.trim().to_lowercase().replace(['-', '_'], " ");
        Self::ALL.into_iter().find(|category| {
            category.storage_name().to_lowercase() == wanted
                || category.label().to_lowercase() == wanted
        })
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Amounts for one month. Reads of a missing category yield 0.
///
/// Names outside the fixed categories are stored and persisted but never
/// enumerated or totalled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseSet {
    amounts: BTreeMap<String, f64>,
}

impl ExpenseSet {
    /// All twelve categories present at 0.
    pub fn zeroed() -> Self {
        Self {
            amounts: ExpenseCategory::ALL
                .iter()
                .map(|c| (c.storage_name().to_string(), 0.0))
                .collect(),
        }
    }

    pub fn get(&self, category: ExpenseCategory) -> f64 {
        self.amounts
            .get(category.storage_name())
            .copied()
            .unwrap_or(0.0)
    }

    /// Raw lookup by stored name, including unrecognized names.
    pub fn get_named(&self, name: &str) -> Option<f64> {
        self.amounts.get(name).copied()
    }

    pub fn set(&mut self, name: &str, amount: f64) {
        self.amounts.insert(name.to_string(), sanitize_amount(amount));
    }

    /// The twelve categories in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ExpenseCategory, f64)> + '_ {
        ExpenseCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, amount)| amount).sum()
    }
}

impl Serialize for ExpenseSet {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.amounts.len()))?;
        for (name, amount) in &self.amounts {
            map.serialize_entry(name, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ExpenseSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let amounts = raw
            .into_iter()
            .map(|(name, value)| {
                let amount = match value {
                    serde_json::Value::Number(n) => sanitize_amount(n.as_f64().unwrap_or(0.0)),
                    serde_json::Value::String(s) => parse_amount(&s),
                    _ => 0.0,
                };
                (name, amount)
            })
            .collect();
        Ok(Self { amounts })
    }
}

/// Every month's Expense Set, keyed by month/year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseLedger {
    entries: BTreeMap<ExpenseKey, ExpenseSet>,
    legacy: BTreeMap<String, ExpenseSet>,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored set for the month, or the all-zero default.
    pub fn expenses(&self, month: &str, year: i32) -> ExpenseSet {
        let mut set = ExpenseSet::zeroed();
        if let Some(stored) = self.entries.get(&ExpenseKey::new(month, year)) {
            for (name, amount) in &stored.amounts {
                set.amounts.insert(name.clone(), *amount);
            }
        }
        set
    }

    /// Upserts one category, leaving the rest of the month untouched.
    pub fn set_expense(
        &mut self,
        month: &str,
        year: i32,
        category: &str,
        amount: f64,
    ) -> Result<()> {
        validate_year(year)?;
        let key = ExpenseKey::new(month, year);
        if ExpenseCategory::ALL
            .iter()
            .all(|c| c.storage_name() != category)
        {
            warn!(%key, category, "storing unrecognized expense category");
        }
        self.entries
            .entry(key.clone())
            .or_insert_with(ExpenseSet::zeroed)
            .set(category, amount);
        info!(%key, category, amount = sanitize_amount(amount), "expense updated");
        Ok(())
    }

    pub fn legacy_keys(&self) -> impl Iterator<Item = &str> {
        self.legacy.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ExpenseKey, &ExpenseSet)> {
        self.entries.iter()
    }
}

impl Serialize for ExpenseLedger {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len() + self.legacy.len()))?;
        for (key, set) in &self.entries {
            map.serialize_entry(&key.storage_key(), set)?;
        }
        for (key, set) in &self.legacy {
            map.serialize_entry(key, set)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ExpenseLedger {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, ExpenseSet>::deserialize(deserializer)?;
        let mut ledger = Self::default();
        for (raw_key, set) in raw {
            match ExpenseKey::parse(&raw_key) {
                Some(key) => {
                    ledger.entries.insert(key, set);
                }
                None => {
                    warn!(key = %raw_key, "unrecognized expense key kept as-is");
                    ledger.legacy.insert(raw_key, set);
                }
            }
        }
        Ok(ledger)
    }
}
