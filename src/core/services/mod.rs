pub mod agenda_service;
pub mod article_service;
pub mod batch_service;
pub mod debt_service;
pub mod note_service;
pub mod payment_service;
pub mod permission_service;
pub mod user_service;

pub use agenda_service::AgendaService;
pub use article_service::ArticleService;
pub use batch_service::BatchService;
pub use debt_service::DebtService;
pub use note_service::NoteService;
pub use payment_service::PaymentService;
pub use permission_service::PermissionService;
pub use user_service::UserService;

use uuid::Uuid;

use crate::core::ledger::StoreWriteError;
use crate::errors::BackofficeError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced by the service layer. Every variant maps to a
/// human-readable message; nothing is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("debt is {actual}; this operation handles {expected} debts only")]
    InvalidKind {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("payment amount must be greater than 0 (got {0})")]
    InvalidAmount(f64),
    #[error("payment of {requested} exceeds the outstanding balance of {balance}")]
    ExceedsBalance { requested: f64, balance: f64 },
    #[error("no operational batch is open; open the till before recording payments")]
    NoOpenBatch,
    #[error("role `{role}` is not allowed to {action}")]
    PermissionDenied {
        role: &'static str,
        action: &'static str,
    },
    #[error(transparent)]
    StoreWrite(#[from] StoreWriteError),
    #[error("ledger inconsistency on debt {debt_id}: stored balance {stored}, derived {derived}")]
    LedgerInconsistency {
        debt_id: Uuid,
        stored: f64,
        derived: f64,
    },
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Backoffice(#[from] BackofficeError),
}
