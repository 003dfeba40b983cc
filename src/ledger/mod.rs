//! Booking and expense ledgers, their persisted key scheme, and value types.

pub mod booking;
pub mod expenses;
pub mod keys;
pub mod reservations;

pub use booking::{Booking, DayLedger};
pub use expenses::{ExpenseCategory, ExpenseLedger, ExpenseSet};
pub use keys::{
    expense_key, has_year_suffix, reservation_key, validate_year, ExpenseKey, ReservationKey,
    STORABLE_YEARS,
};
pub use reservations::{BookingReceipt, ClientStay, ReservationLedger, StayRange};
