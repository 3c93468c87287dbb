use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub id: Uuid,
    pub description: String,
}

impl ExpenseCategory {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeExpense {
    pub id: Uuid,
    pub category_id: Uuid,
    pub amount: f64,
    pub spent_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<Uuid>,
}

impl EmployeeExpense {
    pub fn new(category_id: Uuid, amount: f64, spent_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            amount,
            spent_at,
            employee_id: None,
        }
    }
}
