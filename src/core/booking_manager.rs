use std::collections::BTreeMap;

use tracing::{error, info};

use crate::config::DEFAULT_PROPERTIES;
use crate::core::services::{
    ClientTotals, MonthBalance, OccupancyStat, OverviewRow, PropertySummary, SummaryService,
};
use crate::errors::Result;
use crate::ledger::{
    BookingReceipt, ClientStay, DayLedger, ExpenseLedger, ExpenseSet, ReservationLedger, StayRange,
};
use crate::storage::{KeyValueStore, KeyValueStoreExt, EXPENSES_KEY, RESERVATIONS_KEY};

/// Owns both ledgers and the store they persist to.
///
/// Ledgers are loaded once at construction. Every successful mutation writes
/// the affected ledger back; a failed write is logged and left for
/// [`BookingManager::flush`] to report, the in-memory state stays authoritative.
pub struct BookingManager {
    reservations: ReservationLedger,
    expenses: ExpenseLedger,
    properties: Vec<String>,
    store: Box<dyn KeyValueStore>,
}

impl BookingManager {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let reservations = store.load_or(RESERVATIONS_KEY, ReservationLedger::new());
        let expenses = store.load_or(EXPENSES_KEY, ExpenseLedger::new());
        Self {
            reservations,
            expenses,
            properties: DEFAULT_PROPERTIES.iter().map(|p| p.to_string()).collect(),
            store,
        }
    }

    pub fn with_properties(mut self, properties: Vec<String>) -> Self {
        self.properties = properties;
        self
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn reservations(&self) -> &ReservationLedger {
        &self.reservations
    }

    pub fn expense_ledger(&self) -> &ExpenseLedger {
        &self.expenses
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Re-reads both ledgers, e.g. after a backup was restored underneath.
    pub fn reload(&mut self) {
        self.reservations = self.store.load_or(RESERVATIONS_KEY, ReservationLedger::new());
        self.expenses = self.store.load_or(EXPENSES_KEY, ExpenseLedger::new());
        info!("ledgers reloaded from store");
    }

    /// Writes both ledgers, surfacing any persistence error.
    pub fn flush(&self) -> Result<()> {
        self.store.save_value(RESERVATIONS_KEY, &self.reservations)?;
        self.store.save_value(EXPENSES_KEY, &self.expenses)
    }

    pub fn day_ledger(&self, property: &str, month: &str, year: i32) -> &DayLedger {
        self.reservations.day_ledger(property, month, year)
    }

    pub fn create_booking(
        &mut self,
        stay: &StayRange,
        client: &str,
        amount: Option<f64>,
    ) -> Result<BookingReceipt> {
        let receipt = self.reservations.create_booking(stay, client, amount)?;
        self.persist_reservations();
        Ok(receipt)
    }

    pub fn move_booking(&mut self, client: &str, destination: &StayRange) -> Result<BookingReceipt> {
        let receipt = self.reservations.move_booking(client, destination)?;
        self.persist_reservations();
        Ok(receipt)
    }

    pub fn delete_client(&mut self, month: &str, year: i32, client: &str) -> usize {
        let removed = self.reservations.delete_client(month, year, client);
        if removed > 0 {
            self.persist_reservations();
        }
        removed
    }

    pub fn set_client_amount(&mut self, client: &str, month: &str, year: i32, amount: f64) -> usize {
        let updated = self.reservations.set_client_amount(client, month, year, amount);
        if updated > 0 {
            self.persist_reservations();
        }
        updated
    }

    pub fn group_by_client(&self, month: &str, year: i32) -> BTreeMap<String, ClientStay> {
        self.reservations.group_by_client(month, year)
    }

    pub fn expenses(&self, month: &str, year: i32) -> ExpenseSet {
        self.expenses.expenses(month, year)
    }

    pub fn set_expense(
        &mut self,
        month: &str,
        year: i32,
        category: &str,
        amount: f64,
    ) -> Result<()> {
        self.expenses.set_expense(month, year, category, amount)?;
        if let Err(err) = self.store.save_value(EXPENSES_KEY, &self.expenses) {
            error!(error = %err, "failed to persist expense ledger");
        }
        Ok(())
    }

    pub fn property_summary(&self, month: &str, year: i32) -> Vec<PropertySummary> {
        SummaryService::property_summary(&self.reservations, &self.properties, month, year)
    }

    pub fn month_balance(&self, month: &str, year: i32) -> MonthBalance {
        SummaryService::month_balance(
            &self.reservations,
            &self.expenses,
            &self.properties,
            month,
            year,
        )
    }

    pub fn occupancy(&self, month: &str, year: i32) -> Vec<OccupancyStat> {
        SummaryService::occupancy(&self.reservations, &self.properties, month, year)
    }

    pub fn client_totals(&self, month: &str, year: i32) -> ClientTotals {
        SummaryService::client_totals(&self.reservations, month, year)
    }

    pub fn month_overview(&self, month: &str, year: i32) -> Vec<OverviewRow> {
        SummaryService::month_overview(&self.reservations, &self.properties, month, year)
    }

    fn persist_reservations(&self) {
        if let Err(err) = self.store.save_value(RESERVATIONS_KEY, &self.reservations) {
            error!(error = %err, "failed to persist reservation ledger");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;
    use crate::storage::MemoryStore;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(LedgerError::Storage("disk full".into()))
        }
    }

    #[test]
    fn mutations_are_persisted() {
        let store = MemoryStore::new();
        let mut manager = BookingManager::new(Box::new(store));
        manager
            .create_booking(&StayRange::new("Casa", "Julio", 2025, 1, 3), "Ana", Some(90.0))
            .expect("create");
        manager.set_expense("Julio", 2025, "Gas", 15.0).unwrap();

        let raw = manager
            .store()
            .read(RESERVATIONS_KEY)
            .expect("read")
            .expect("reservations saved");
        assert!(raw.contains("Casa_Julio_2025"));
        assert!(manager.store().contains(EXPENSES_KEY).expect("contains"));
    }

    #[test]
    fn reload_picks_up_stored_state() {
        let store = MemoryStore::with_values([(
            RESERVATIONS_KEY,
            r#"{"Depto 1_Enero_2026": {"4": {"cliente": "Luis", "color": "bg-red-400", "total": 50}}}"#,
        )]);
        let mut manager = BookingManager::new(Box::new(store));
        assert_eq!(manager.day_ledger("Depto 1", "Enero", 2026).len(), 1);
        manager.delete_client("Enero", 2026, "Luis");
        manager.reload();
        assert!(manager.day_ledger("Depto 1", "Enero", 2026).is_empty());
    }

    #[test]
    fn failed_writes_keep_memory_state_and_surface_on_flush() {
        let mut manager = BookingManager::new(Box::new(FailingStore));
        manager
            .create_booking(&StayRange::new("Casa", "Julio", 2025, 1, 3), "Ana", None)
            .expect("in-memory mutation still succeeds");
        assert_eq!(manager.day_ledger("Casa", "Julio", 2025).len(), 3);
        assert!(matches!(manager.flush(), Err(LedgerError::Storage(_))));
    }

    #[test]
    fn summaries_use_configured_properties() {
        let mut manager = BookingManager::new(Box::new(MemoryStore::new()))
            .with_properties(vec!["Casa".into()]);
        manager
            .create_booking(&StayRange::new("Casa", "Julio", 2025, 1, 2), "Ana", Some(100.0))
            .unwrap();
        manager.set_expense("Julio", 2025, "Luz", 30.0).unwrap();
        assert_eq!(manager.property_summary("Julio", 2025).len(), 1);
        assert_eq!(manager.month_balance("Julio", 2025).balance, 70.0);
    }
}
