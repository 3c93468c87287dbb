//! The debt payment processor.
//!
//! A payment is three independent writes: the payment row, the cash
//! movement tied to the open batch, and the debt balance update. The store
//! offers no multi-write transaction, so a failure between writes leaves a
//! detectable (not auto-repaired) inconsistency; `verify_debt_balance` is
//! the reconciliation check for that state. Retrying after a mid-sequence
//! failure duplicates the payment row — the operation is not idempotent.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::ledger::PaymentLedger;
use crate::domain::{CashMovement, DebtKind, Payment};
use crate::office::BackOffice;

use super::{ServiceError, ServiceResult};

/// Sub-cent slack for the reconciliation check. The incremental balance
/// updates and the derived sum round in different orders, so the drift
/// grows with the number of payments; anything below a millionth of a
/// currency unit is noise, not a missed write.
const BALANCE_TOLERANCE: f64 = 1e-6;

pub struct PaymentService;

impl PaymentService {
    /// Processes a payment against an external (client-owed) debt and
    /// returns the new payment's identifier.
    pub fn process_external<S: PaymentLedger>(
        store: &mut S,
        debt_id: Uuid,
        amount: f64,
        treasury_account_id: Uuid,
        payment_date: NaiveDate,
        description: Option<String>,
    ) -> ServiceResult<Uuid> {
        let (client_id, balance) =
            Self::validate(store, debt_id, amount, DebtKind::External)?;
        let batch_id = store.open_batch().ok_or(ServiceError::NoOpenBatch)?;

        let payment = Payment::new(
            debt_id,
            client_id,
            amount,
            payment_date,
            treasury_account_id,
            description,
        );
        let payment_id = payment.id;
        store.insert_payment(payment)?;
        store.insert_movement(CashMovement::ingress(batch_id, treasury_account_id, amount))?;
        store.set_debt_balance(debt_id, (balance - amount).max(0.0))?;

        tracing::debug!(%debt_id, amount, "external debt payment recorded");
        Ok(payment_id)
    }

    /// Processes a payment against an internal (business-owed) debt. On top
    /// of the treasury debit, the movement books the expense category and
    /// the acting user.
    #[allow(clippy::too_many_arguments)]
    pub fn process_internal<S: PaymentLedger>(
        store: &mut S,
        debt_id: Uuid,
        amount: f64,
        treasury_account_id: Uuid,
        expense_category_id: Uuid,
        payment_date: NaiveDate,
        description: Option<String>,
        acting_user_id: Uuid,
    ) -> ServiceResult<Uuid> {
        let (_, balance) = Self::validate(store, debt_id, amount, DebtKind::Internal)?;
        let batch_id = store.open_batch().ok_or(ServiceError::NoOpenBatch)?;

        let payment = Payment::new(
            debt_id,
            None,
            amount,
            payment_date,
            treasury_account_id,
            description,
        );
        let payment_id = payment.id;
        store.insert_payment(payment)?;

        let mut movement = CashMovement::ingress(batch_id, treasury_account_id, amount);
        movement.expense_category_id = Some(expense_category_id);
        movement.recorded_by = Some(acting_user_id);
        store.insert_movement(movement)?;

        store.set_debt_balance(debt_id, (balance - amount).max(0.0))?;

        tracing::debug!(%debt_id, amount, "internal debt payment recorded");
        Ok(payment_id)
    }

    /// Precondition checks, in order, failing fast on the first violation.
    /// Returns the debt's client and current balance for the write phase.
    fn validate<S: PaymentLedger>(
        store: &S,
        debt_id: Uuid,
        amount: f64,
        expected: DebtKind,
    ) -> ServiceResult<(Option<Uuid>, f64)> {
        let debt = store
            .find_debt(debt_id)
            .ok_or(ServiceError::NotFound { entity: "debt" })?;
        if debt.kind != expected {
            return Err(ServiceError::InvalidKind {
                expected: expected.label(),
                actual: debt.kind.label(),
            });
        }
        if amount <= 0.0 {
            return Err(ServiceError::InvalidAmount(amount));
        }
        if amount > debt.balance {
            return Err(ServiceError::ExceedsBalance {
                requested: amount,
                balance: debt.balance,
            });
        }
        Ok((debt.client_id, debt.balance))
    }

    /// Payments newest first, the order the payment listings render in.
    pub fn list(office: &BackOffice) -> Vec<&Payment> {
        let mut payments: Vec<&Payment> = office.payments.iter().collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        payments
    }

    pub fn total_paid(office: &BackOffice, debt_id: Uuid) -> f64 {
        office
            .payments_for_debt(debt_id)
            .iter()
            .map(|payment| payment.amount)
            .sum()
    }

    /// Reconciliation check: the stored balance must equal
    /// `total - sum(payments)`. A mid-sequence write failure leaves these
    /// out of step, which this surfaces as `LedgerInconsistency`.
    pub fn verify_debt_balance(office: &BackOffice, debt_id: Uuid) -> ServiceResult<()> {
        let debt = office
            .debt(debt_id)
            .ok_or(ServiceError::NotFound { entity: "debt" })?;
        let derived = debt.total - Self::total_paid(office, debt_id);
        if (debt.balance - derived).abs() > BALANCE_TOLERANCE {
            return Err(ServiceError::LedgerInconsistency {
                debt_id,
                stored: debt.balance,
                derived,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Debt, MovementKind, OperationalBatch, TreasuryAccount};
    use chrono::NaiveDate;

    fn office_with_open_batch() -> (BackOffice, Uuid) {
        let mut office = BackOffice::new("Test");
        office.batches.push(OperationalBatch::open_now());
        let account = office.add_treasury_account(TreasuryAccount::new("Cash"));
        (office, account)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn external_payment_writes_all_three_rows() {
        let (mut office, account) = office_with_open_batch();
        let client = office.add_client(crate::domain::Client::new("ACME", "CUIT", "30-1"));
        let debt_id = office.add_debt(Debt::new(
            DebtKind::External,
            Some(client),
            1000.0,
            date(),
        ));

        PaymentService::process_external(&mut office, debt_id, 300.0, account, date(), None)
            .expect("payment succeeds");

        assert_eq!(office.debt(debt_id).unwrap().balance, 700.0);
        assert_eq!(office.payments.len(), 1);
        assert_eq!(office.payments[0].client_id, Some(client));
        assert_eq!(office.movements.len(), 1);
        assert_eq!(office.movements[0].kind, MovementKind::Ingress);
        assert_eq!(office.movements[0].amount, 300.0);
        assert_eq!(office.movements[0].treasury_account_id, account);
        PaymentService::verify_debt_balance(&office, debt_id).expect("ledger consistent");
    }

    #[test]
    fn rejects_unknown_debt() {
        let (mut office, account) = office_with_open_batch();
        let err = PaymentService::process_external(
            &mut office,
            Uuid::new_v4(),
            10.0,
            account,
            date(),
            None,
        )
        .expect_err("unknown debt must fail");
        assert!(matches!(err, ServiceError::NotFound { entity: "debt" }));
    }

    #[test]
    fn rejects_wrong_kind_for_each_entry_point() {
        let (mut office, account) = office_with_open_batch();
        let internal = office.add_debt(Debt::new(DebtKind::Internal, None, 500.0, date()));
        let external = office.add_debt(Debt::new(DebtKind::External, None, 500.0, date()));

        let err =
            PaymentService::process_external(&mut office, internal, 10.0, account, date(), None)
                .expect_err("internal debt via external path");
        assert!(matches!(err, ServiceError::InvalidKind { .. }));

        let err = PaymentService::process_internal(
            &mut office,
            external,
            10.0,
            account,
            Uuid::new_v4(),
            date(),
            None,
            Uuid::new_v4(),
        )
        .expect_err("external debt via internal path");
        assert!(matches!(err, ServiceError::InvalidKind { .. }));
    }

    #[test]
    fn rejects_non_positive_amounts_for_both_kinds() {
        let (mut office, account) = office_with_open_batch();
        let debt_id = office.add_debt(Debt::new(DebtKind::External, None, 100.0, date()));
        for amount in [0.0, -25.0] {
            let err = PaymentService::process_external(
                &mut office,
                debt_id,
                amount,
                account,
                date(),
                None,
            )
            .expect_err("non-positive amount must fail");
            assert!(matches!(err, ServiceError::InvalidAmount(_)));
        }
        assert!(office.payments.is_empty());
    }

    #[test]
    fn rejects_amount_over_balance() {
        let (mut office, account) = office_with_open_batch();
        let debt_id = office.add_debt(Debt::new(DebtKind::External, None, 100.0, date()));
        let err =
            PaymentService::process_external(&mut office, debt_id, 100.01, account, date(), None)
                .expect_err("overpayment must fail");
        assert!(matches!(
            err,
            ServiceError::ExceedsBalance { balance, .. } if balance == 100.0
        ));
    }

    #[test]
    fn no_open_batch_means_zero_writes() {
        let mut office = BackOffice::new("Test");
        let account = office.add_treasury_account(TreasuryAccount::new("Cash"));
        let debt_id = office.add_debt(Debt::new(DebtKind::External, None, 100.0, date()));

        let err = PaymentService::process_external(&mut office, debt_id, 50.0, account, date(), None)
            .expect_err("closed till must fail");
        assert!(matches!(err, ServiceError::NoOpenBatch));
        assert!(office.payments.is_empty());
        assert!(office.movements.is_empty());
        assert_eq!(office.debt(debt_id).unwrap().balance, 100.0);
    }

    #[test]
    fn internal_payment_books_expense_category() {
        let (mut office, account) = office_with_open_batch();
        let category = crate::domain::ExpenseCategory::new("Rent");
        let category_id = category.id;
        office.expense_categories.push(category);
        let user_id = office.add_user(crate::domain::User::new(
            "Ana",
            "ana@example.com",
            crate::domain::Role::Admin,
        ));
        let debt_id = office.add_debt(Debt::new(DebtKind::Internal, None, 900.0, date()));

        PaymentService::process_internal(
            &mut office,
            debt_id,
            400.0,
            account,
            category_id,
            date(),
            Some("rent installment".into()),
            user_id,
        )
        .expect("internal payment succeeds");

        assert_eq!(office.debt(debt_id).unwrap().balance, 500.0);
        let movement = &office.movements[0];
        assert_eq!(movement.expense_category_id, Some(category_id));
        assert_eq!(movement.recorded_by, Some(user_id));
        assert_eq!(movement.kind, MovementKind::Ingress);
    }

    #[test]
    fn verify_tolerates_float_drift_over_long_payment_runs() {
        let (mut office, account) = office_with_open_batch();
        let client = office.add_client(crate::domain::Client::new("ACME", "CUIT", "30-1"));
        let debt_id = office.add_debt(Debt::new(
            DebtKind::External,
            Some(client),
            1_000_000.0,
            date(),
        ));

        // Thousands of uneven amounts make the incremental balance and the
        // derived sum round in different orders.
        for i in 0..10_000u32 {
            let amount = 0.01 + f64::from(i % 997) * 0.017;
            PaymentService::process_external(&mut office, debt_id, amount, account, date(), None)
                .expect("valid payment");
        }

        PaymentService::verify_debt_balance(&office, debt_id)
            .expect("drift within tolerance is not an inconsistency");
    }

    #[test]
    fn repeated_calls_are_not_idempotent() {
        let (mut office, account) = office_with_open_batch();
        let debt_id = office.add_debt(Debt::new(DebtKind::External, None, 1000.0, date()));

        for _ in 0..2 {
            PaymentService::process_external(&mut office, debt_id, 200.0, account, date(), None)
                .unwrap();
        }

        assert_eq!(office.payments.len(), 2);
        assert_eq!(office.debt(debt_id).unwrap().balance, 600.0);
    }
}
