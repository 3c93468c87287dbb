use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub legal_name: String,
    pub doc_type: String,
    pub doc_number: String,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(
        legal_name: impl Into<String>,
        doc_type: impl Into<String>,
        doc_number: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            legal_name: legal_name.into(),
            doc_type: doc_type.into(),
            doc_number: doc_number.into(),
            created_at: Utc::now(),
        }
    }
}
