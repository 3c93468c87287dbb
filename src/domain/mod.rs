//! Back-office domain models: parties, debts and their payments, treasury
//! records, inventory, agenda, notes, and access control.

pub mod agenda;
pub mod article;
pub mod client;
pub mod debt;
pub mod expense;
pub mod note;
pub mod payment;
pub mod permission;
pub mod sale;
pub mod treasury;
pub mod user;

pub use agenda::{AgendaCategory, AgendaEvent, DEFAULT_EVENT_COLOR, DEFAULT_REMINDER_MINUTES};
pub use article::{Article, Variant};
pub use client::Client;
pub use debt::{Debt, DebtFilters, DebtKind, DebtSummary, DebtWithClient};
pub use expense::{EmployeeExpense, ExpenseCategory};
pub use note::{Note, NoteColor};
pub use payment::Payment;
pub use permission::{Module, ModulePermission};
pub use sale::{OrderPayment, SaleLine, SaleOrder};
pub use treasury::{CashMovement, MovementKind, OperationalBatch, TreasuryAccount};
pub use user::{Role, User};
