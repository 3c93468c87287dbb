//! Business logic: the ledger write seam, the service layer, and the
//! office/persistence facade.

pub mod ledger;
pub mod office_manager;
pub mod services;

pub use ledger::{PaymentLedger, StoreWriteError};
pub use office_manager::OfficeManager;
