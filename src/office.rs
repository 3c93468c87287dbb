use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AgendaCategory, AgendaEvent, Article, CashMovement, Client, Debt, EmployeeExpense,
    ExpenseCategory, Module, ModulePermission, Note, OperationalBatch, Payment, SaleOrder,
    TreasuryAccount, User, Variant,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// The whole back-office state: one aggregate holding every table the
/// services operate on. Persisted as a single JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackOffice {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub permissions: Vec<ModulePermission>,
    #[serde(default)]
    pub treasury_accounts: Vec<TreasuryAccount>,
    #[serde(default)]
    pub batches: Vec<OperationalBatch>,
    #[serde(default)]
    pub movements: Vec<CashMovement>,
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub sales: Vec<SaleOrder>,
    #[serde(default)]
    pub expenses: Vec<EmployeeExpense>,
    #[serde(default)]
    pub expense_categories: Vec<ExpenseCategory>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub events: Vec<AgendaEvent>,
    #[serde(default)]
    pub agenda_categories: Vec<AgendaCategory>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "BackOffice::schema_version_default")]
    pub schema_version: u8,
}

impl BackOffice {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            clients: Vec::new(),
            users: Vec::new(),
            modules: Vec::new(),
            permissions: Vec::new(),
            treasury_accounts: Vec::new(),
            batches: Vec::new(),
            movements: Vec::new(),
            debts: Vec::new(),
            payments: Vec::new(),
            articles: Vec::new(),
            variants: Vec::new(),
            sales: Vec::new(),
            expenses: Vec::new(),
            expense_categories: Vec::new(),
            notes: Vec::new(),
            events: Vec::new(),
            agenda_categories: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_client(&mut self, client: Client) -> Uuid {
        let id = client.id;
        self.clients.push(client);
        self.touch();
        id
    }

    pub fn add_user(&mut self, user: User) -> Uuid {
        let id = user.id;
        self.users.push(user);
        self.touch();
        id
    }

    pub fn add_treasury_account(&mut self, account: TreasuryAccount) -> Uuid {
        let id = account.id;
        self.treasury_accounts.push(account);
        self.touch();
        id
    }

    pub fn add_debt(&mut self, debt: Debt) -> Uuid {
        let id = debt.id;
        self.debts.push(debt);
        self.touch();
        id
    }

    pub fn client(&self, id: Uuid) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn treasury_account(&self, id: Uuid) -> Option<&TreasuryAccount> {
        self.treasury_accounts.iter().find(|acc| acc.id == id)
    }

    pub fn debt(&self, id: Uuid) -> Option<&Debt> {
        self.debts.iter().find(|debt| debt.id == id)
    }

    pub fn debt_mut(&mut self, id: Uuid) -> Option<&mut Debt> {
        self.debts.iter_mut().find(|debt| debt.id == id)
    }

    pub fn article(&self, id: Uuid) -> Option<&Article> {
        self.articles.iter().find(|article| article.id == id)
    }

    pub fn note(&self, id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn note_mut(&mut self, id: Uuid) -> Option<&mut Note> {
        self.notes.iter_mut().find(|note| note.id == id)
    }

    pub fn event(&self, id: Uuid) -> Option<&AgendaEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn event_mut(&mut self, id: Uuid) -> Option<&mut AgendaEvent> {
        self.events.iter_mut().find(|event| event.id == id)
    }

    pub fn module(&self, id: Uuid) -> Option<&Module> {
        self.modules.iter().find(|module| module.id == id)
    }

    pub fn expense_category(&self, id: Uuid) -> Option<&ExpenseCategory> {
        self.expense_categories.iter().find(|cat| cat.id == id)
    }

    /// Payments recorded against one debt.
    pub fn payments_for_debt(&self, debt_id: Uuid) -> Vec<&Payment> {
        self.payments
            .iter()
            .filter(|payment| payment.debt_id == debt_id)
            .collect()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
