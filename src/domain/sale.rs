use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed sale. Lines and payment splits are embedded; the dashboard
/// reducers consume these rows as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleOrder {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Uuid>,
    /// Order total after any order-level discount.
    pub total: f64,
    #[serde(default)]
    pub lines: Vec<SaleLine>,
    #[serde(default)]
    pub payments: Vec<OrderPayment>,
}

impl SaleOrder {
    pub fn new(date: DateTime<Utc>, total: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            client_id: None,
            total,
            lines: Vec::new(),
            payments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub article_id: Uuid,
    pub quantity: i64,
    pub unit_price: f64,
}

/// How (part of) an order was settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPayment {
    pub treasury_account_id: Uuid,
    pub amount: f64,
}
