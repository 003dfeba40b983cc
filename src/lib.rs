#![doc(test(attr(deny(warnings))))]

//! Booking Core keeps a per-property, per-month ledger of guest stays with
//! conflict detection, a monthly expense ledger, and the reports derived
//! from both, plus a small shell to drive them.

pub mod calendar;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Booking Core tracing initialized.");
    });
}
