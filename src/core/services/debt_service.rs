//! CRUD and filtered queries over debts.

use uuid::Uuid;

use crate::domain::debt::ClientSummary;
use crate::domain::{Debt, DebtFilters, DebtKind, DebtSummary, DebtWithClient, TreasuryAccount};
use crate::office::BackOffice;

use super::{ServiceError, ServiceResult};

pub struct DebtService;

impl DebtService {
    pub fn create(office: &mut BackOffice, debt: Debt) -> ServiceResult<Uuid> {
        if debt.total <= 0.0 {
            return Err(ServiceError::Invalid(
                "Debt total must be greater than 0".into(),
            ));
        }
        match debt.kind {
            DebtKind::External => {
                let client_id = debt.client_id.ok_or_else(|| {
                    ServiceError::Invalid("External debts require a client".into())
                })?;
                if office.client(client_id).is_none() {
                    return Err(ServiceError::NotFound { entity: "client" });
                }
            }
            DebtKind::Internal => {
                if debt.client_id.is_some() {
                    return Err(ServiceError::Invalid(
                        "Internal debts cannot reference a client".into(),
                    ));
                }
            }
        }
        Ok(office.add_debt(debt))
    }

    /// Administrative edit. Unconstrained by the payment invariants on
    /// purpose; the processor is the only guarded path.
    pub fn update<F>(office: &mut BackOffice, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Debt),
    {
        let debt = office
            .debt_mut(id)
            .ok_or(ServiceError::NotFound { entity: "debt" })?;
        mutator(debt);
        debt.updated_at = chrono::Utc::now();
        office.touch();
        Ok(())
    }

    /// Administrative delete, separate from the payment flow.
    pub fn delete(office: &mut BackOffice, id: Uuid) -> ServiceResult<Debt> {
        let index = office
            .debts
            .iter()
            .position(|debt| debt.id == id)
            .ok_or(ServiceError::NotFound { entity: "debt" })?;
        let removed = office.debts.remove(index);
        office.touch();
        Ok(removed)
    }

    pub fn get(office: &BackOffice, id: Uuid) -> ServiceResult<DebtWithClient> {
        let debt = office
            .debt(id)
            .ok_or(ServiceError::NotFound { entity: "debt" })?;
        Ok(Self::join_client(office, debt))
    }

    /// Debts matching all supplied filter predicates, newest first.
    pub fn list(office: &BackOffice, filters: &DebtFilters) -> Vec<DebtWithClient> {
        let needle = filters
            .client
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut rows: Vec<DebtWithClient> = office
            .debts
            .iter()
            .filter(|debt| filters.kind.map_or(true, |kind| debt.kind == kind))
            .filter(|debt| filters.date_from.map_or(true, |from| debt.date >= from))
            .filter(|debt| filters.date_to.map_or(true, |to| debt.date <= to))
            .map(|debt| Self::join_client(office, debt))
            .filter(|row| match (&needle, &row.client) {
                (None, _) => true,
                (Some(needle), Some(client)) => {
                    client.legal_name.to_lowercase().contains(needle)
                }
                (Some(_), None) => false,
            })
            .collect();
        rows.sort_by(|a, b| b.debt.created_at.cmp(&a.debt.created_at));
        rows
    }

    /// Outstanding totals and counts per kind.
    pub fn summary(office: &BackOffice) -> DebtSummary {
        let mut summary = DebtSummary::default();
        for debt in &office.debts {
            match debt.kind {
                DebtKind::External => {
                    summary.external_outstanding += debt.balance;
                    summary.external_count += 1;
                }
                DebtKind::Internal => {
                    summary.internal_outstanding += debt.balance;
                    summary.internal_count += 1;
                }
            }
        }
        summary
    }

    /// Active treasury accounts payments may settle against, clearing
    /// accounts excluded, ordered by description.
    pub fn payable_accounts(office: &BackOffice) -> Vec<&TreasuryAccount> {
        let mut accounts: Vec<&TreasuryAccount> = office
            .treasury_accounts
            .iter()
            .filter(|account| account.active && !account.is_clearing)
            .collect();
        accounts.sort_by(|a, b| a.description.cmp(&b.description));
        accounts
    }

    fn join_client(office: &BackOffice, debt: &Debt) -> DebtWithClient {
        let client = debt
            .client_id
            .and_then(|id| office.client(id))
            .map(|client| ClientSummary {
                id: client.id,
                legal_name: client.legal_name.clone(),
                doc_type: client.doc_type.clone(),
                doc_number: client.doc_number.clone(),
            });
        DebtWithClient {
            debt: debt.clone(),
            client,
        }
    }
}
