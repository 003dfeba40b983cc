use std::fmt;

use thiserror::Error;

/// A single day that could not be assigned because another client holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayConflict {
    pub day: u32,
    pub client: String,
}

impl fmt::Display for DayConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {} ({})", self.day, self.client)
    }
}

/// Error type that captures booking and expense ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("days already booked: {}", format_conflicts(.0))]
    Conflict(Vec<DayConflict>),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    /// Conflicting days carried by a [`LedgerError::Conflict`], empty otherwise.
    pub fn conflicts(&self) -> &[DayConflict] {
        match self {
            LedgerError::Conflict(conflicts) => conflicts,
            _ => &[],
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

fn format_conflicts(conflicts: &[DayConflict]) -> String {
    conflicts
        .iter()
        .map(DayConflict::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
