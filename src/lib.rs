#![doc(test(attr(deny(warnings))))]

//! Backoffice Core implements the retail back-office domain: debts and debt
//! payments over an operational cash batch, dashboard aggregations, agenda
//! reminders, sticky notes, catalog, and role-based module permissions,
//! persisted as JSON office snapshots.

pub mod cli;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod domain;
pub mod errors;
pub mod office;
pub mod reminders;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Backoffice Core tracing initialized.");
    });
}
