use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded reduction against a debt's balance. Written exactly once per
/// successful payment operation and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub debt_id: Uuid,
    /// Owning client, carried over from the debt for external debts.
    pub client_id: Option<Uuid>,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub treasury_account_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        debt_id: Uuid,
        client_id: Option<Uuid>,
        amount: f64,
        payment_date: NaiveDate,
        treasury_account_id: Uuid,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            debt_id,
            client_id,
            amount,
            payment_date,
            treasury_account_id,
            description,
            created_at: Utc::now(),
        }
    }
}
