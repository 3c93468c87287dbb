//! The write seam between the payment processor and the backing store.
//!
//! The processor performs three independent writes per payment with no
//! cross-write rollback; each one goes through this trait so the sequence
//! (and its failure points) stays visible and testable.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{CashMovement, Debt, Payment};
use crate::office::BackOffice;

/// The store rejected a single row write.
#[derive(Debug, Error)]
#[error("store write rejected: {0}")]
pub struct StoreWriteError(pub String);

/// Row-level reads and writes the payment processor needs. Each write is an
/// independent durable operation; there is no multi-write transaction.
pub trait PaymentLedger {
    fn find_debt(&self, id: Uuid) -> Option<&Debt>;

    /// Identifier of the currently open operational batch, if any. A
    /// stateless read; no caching, no retry.
    fn open_batch(&self) -> Option<Uuid>;

    fn insert_payment(&mut self, payment: Payment) -> Result<(), StoreWriteError>;

    fn insert_movement(&mut self, movement: CashMovement) -> Result<(), StoreWriteError>;

    fn set_debt_balance(&mut self, debt_id: Uuid, balance: f64) -> Result<(), StoreWriteError>;
}

impl PaymentLedger for BackOffice {
    fn find_debt(&self, id: Uuid) -> Option<&Debt> {
        self.debt(id)
    }

    fn open_batch(&self) -> Option<Uuid> {
        self.batches.iter().find(|batch| batch.open).map(|b| b.id)
    }

    fn insert_payment(&mut self, payment: Payment) -> Result<(), StoreWriteError> {
        self.payments.push(payment);
        self.touch();
        Ok(())
    }

    fn insert_movement(&mut self, movement: CashMovement) -> Result<(), StoreWriteError> {
        self.movements.push(movement);
        self.touch();
        Ok(())
    }

    fn set_debt_balance(&mut self, debt_id: Uuid, balance: f64) -> Result<(), StoreWriteError> {
        let debt = self
            .debt_mut(debt_id)
            .ok_or_else(|| StoreWriteError(format!("debt {debt_id} vanished mid-update")))?;
        debt.balance = balance;
        debt.updated_at = chrono::Utc::now();
        self.touch();
        Ok(())
    }
}
