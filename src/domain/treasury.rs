use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named payment rail (cash drawer, bank transfer, card terminal) used to
/// settle payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasuryAccount {
    pub id: Uuid,
    pub description: String,
    pub active: bool,
    /// Clearing accounts (the store's running-account rail) are excluded
    /// from the accounts offered for debt payments.
    #[serde(default)]
    pub is_clearing: bool,
}

impl TreasuryAccount {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            active: true,
            is_clearing: false,
        }
    }

    pub fn clearing(description: impl Into<String>) -> Self {
        Self {
            is_clearing: true,
            ..Self::new(description)
        }
    }
}

/// A business-day-scoped cash session. Movements can only be recorded while
/// a batch is open; the payment core never opens or closes one itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalBatch {
    pub id: Uuid,
    pub opened_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    pub open: bool,
}

impl OperationalBatch {
    pub fn open_now() -> Self {
        Self {
            id: Uuid::new_v4(),
            opened_at: Utc::now(),
            closed_at: None,
            open: true,
        }
    }

    pub fn close(&mut self) {
        self.open = false;
        self.closed_at = Some(Utc::now());
    }
}

/// Audit-trail entry tied to an operational batch: money in or out through
/// a treasury account. Never mutated after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashMovement {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub treasury_account_id: Uuid,
    pub kind: MovementKind,
    pub amount: f64,
    pub moved_at: DateTime<Utc>,
    /// Set when the movement books an internal-debt payment against an
    /// expense category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_category_id: Option<Uuid>,
    /// Acting user for movements that require one (internal-debt payments).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<Uuid>,
}

impl CashMovement {
    pub fn ingress(batch_id: Uuid, treasury_account_id: Uuid, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            batch_id,
            treasury_account_id,
            kind: MovementKind::Ingress,
            amount,
            moved_at: Utc::now(),
            expense_category_id: None,
            recorded_by: None,
        }
    }

    pub fn egress(batch_id: Uuid, treasury_account_id: Uuid, amount: f64) -> Self {
        Self {
            kind: MovementKind::Egress,
            ..Self::ingress(batch_id, treasury_account_id, amount)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MovementKind {
    Ingress,
    Egress,
}
