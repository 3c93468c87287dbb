use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tracked obligation with a fixed total and a shrinking outstanding
/// balance. External debts are owed by a client; internal debts are owed by
/// the business itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: Uuid,
    pub kind: DebtKind,
    /// Owning client, present for external debts only.
    pub client_id: Option<Uuid>,
    /// Fixed at creation.
    pub total: f64,
    /// Outstanding balance. Starts equal to `total`; only the payment
    /// processor or an administrative edit moves it.
    pub balance: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Debt {
    pub fn new(kind: DebtKind, client_id: Option<Uuid>, total: f64, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            client_id,
            total,
            balance: total,
            date,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_settled(&self) -> bool {
        self.balance <= 0.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DebtKind {
    External,
    Internal,
}

impl DebtKind {
    pub fn label(&self) -> &'static str {
        match self {
            DebtKind::External => "external",
            DebtKind::Internal => "internal",
        }
    }
}

/// A debt joined with a summary of its owning client, for listings.
#[derive(Debug, Clone)]
pub struct DebtWithClient {
    pub debt: Debt,
    pub client: Option<ClientSummary>,
}

#[derive(Debug, Clone)]
pub struct ClientSummary {
    pub id: Uuid,
    pub legal_name: String,
    pub doc_type: String,
    pub doc_number: String,
}

/// Filter predicates for debt listings. All supplied predicates are
/// combined with logical AND.
#[derive(Debug, Clone, Default)]
pub struct DebtFilters {
    pub kind: Option<DebtKind>,
    /// Case-insensitive substring match on the client's legal name.
    pub client: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Outstanding totals and counts per debt kind.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DebtSummary {
    pub external_outstanding: f64,
    pub internal_outstanding: f64,
    pub external_count: usize,
    pub internal_count: usize,
}
