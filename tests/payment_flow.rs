use backoffice_core::{
    core::services::{BatchService, PaymentService, ServiceError},
    core::{PaymentLedger, StoreWriteError},
    domain::{
        CashMovement, Client, Debt, DebtKind, MovementKind, Payment, TreasuryAccount,
    },
    office::BackOffice,
};
use chrono::NaiveDate;
use uuid::Uuid;

fn pay_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

fn office_with_open_batch() -> (BackOffice, Uuid) {
    let mut office = BackOffice::new("Till");
    let account = office.add_treasury_account(TreasuryAccount::new("Cash"));
    BatchService::open(&mut office).unwrap();
    (office, account)
}

fn external_debt(office: &mut BackOffice, total: f64) -> Uuid {
    let client = office.add_client(Client::new("Maria Duarte", "DNI", "30111222"));
    office.add_debt(Debt::new(DebtKind::External, Some(client), total, pay_date()))
}

#[test]
fn full_payoff_scenario() {
    let (mut office, account) = office_with_open_batch();
    let debt = external_debt(&mut office, 1000.0);

    PaymentService::process_external(&mut office, debt, 300.0, account, pay_date(), None)
        .expect("first payment");
    assert_eq!(office.debt(debt).unwrap().balance, 700.0);
    assert_eq!(office.payments_for_debt(debt).len(), 1);
    let ingress: Vec<&CashMovement> = office
        .movements
        .iter()
        .filter(|m| m.kind == MovementKind::Ingress)
        .collect();
    assert_eq!(ingress.len(), 1);
    assert_eq!(ingress[0].amount, 300.0);

    PaymentService::process_external(&mut office, debt, 700.0, account, pay_date(), None)
        .expect("second payment");
    assert_eq!(office.debt(debt).unwrap().balance, 0.0);
    assert!(office.debt(debt).unwrap().is_settled());

    let err = PaymentService::process_external(&mut office, debt, 1.0, account, pay_date(), None)
        .expect_err("settled debt takes no more payments");
    assert!(matches!(err, ServiceError::ExceedsBalance { .. }));
    assert_eq!(office.payments_for_debt(debt).len(), 2);
    assert_eq!(office.movements.len(), 2);

    PaymentService::verify_debt_balance(&office, debt).expect("books reconcile");
}

#[test]
fn no_open_batch_means_zero_writes() {
    let mut office = BackOffice::new("Till");
    let account = office.add_treasury_account(TreasuryAccount::new("Cash"));
    let debt = external_debt(&mut office, 500.0);

    let err = PaymentService::process_external(&mut office, debt, 100.0, account, pay_date(), None)
        .expect_err("no batch open");
    assert!(matches!(err, ServiceError::NoOpenBatch));
    assert!(office.payments.is_empty());
    assert!(office.movements.is_empty());
    assert_eq!(office.debt(debt).unwrap().balance, 500.0);
}

/// Store double that can reject individual row writes, exposing the gap
/// between the three ledger writes.
struct FlakyLedger {
    inner: BackOffice,
    fail_movements: bool,
    fail_balance: bool,
}

impl FlakyLedger {
    fn new(inner: BackOffice) -> Self {
        Self {
            inner,
            fail_movements: false,
            fail_balance: false,
        }
    }
}

impl PaymentLedger for FlakyLedger {
    fn find_debt(&self, id: Uuid) -> Option<&Debt> {
        self.inner.find_debt(id)
    }

    fn open_batch(&self) -> Option<Uuid> {
        self.inner.open_batch()
    }

    fn insert_payment(&mut self, payment: Payment) -> Result<(), StoreWriteError> {
        self.inner.insert_payment(payment)
    }

    fn insert_movement(&mut self, movement: CashMovement) -> Result<(), StoreWriteError> {
        if self.fail_movements {
            return Err(StoreWriteError("movement insert rejected".into()));
        }
        self.inner.insert_movement(movement)
    }

    fn set_debt_balance(&mut self, debt_id: Uuid, balance: f64) -> Result<(), StoreWriteError> {
        if self.fail_balance {
            return Err(StoreWriteError("balance update rejected".into()));
        }
        self.inner.set_debt_balance(debt_id, balance)
    }
}

#[test]
fn failed_movement_write_leaves_a_detectable_partial_state() {
    let (mut office, account) = office_with_open_batch();
    let debt = external_debt(&mut office, 1000.0);
    let mut store = FlakyLedger::new(office);
    store.fail_movements = true;

    let err = PaymentService::process_external(&mut store, debt, 300.0, account, pay_date(), None)
        .expect_err("movement write fails");
    assert!(matches!(err, ServiceError::StoreWrite(_)));

    // The payment row landed before the failure; nothing rolls it back.
    assert_eq!(store.inner.payments_for_debt(debt).len(), 1);
    assert!(store.inner.movements.is_empty());
    assert_eq!(store.inner.debt(debt).unwrap().balance, 1000.0);

    // Reconciliation flags the gap between stored and derived balances.
    let err = PaymentService::verify_debt_balance(&store.inner, debt)
        .expect_err("partial write detected");
    assert!(matches!(err, ServiceError::LedgerInconsistency { .. }));
}

#[test]
fn failed_balance_write_keeps_payment_and_movement() {
    let (mut office, account) = office_with_open_batch();
    let debt = external_debt(&mut office, 1000.0);
    let mut store = FlakyLedger::new(office);
    store.fail_balance = true;

    PaymentService::process_external(&mut store, debt, 300.0, account, pay_date(), None)
        .expect_err("balance write fails");
    assert_eq!(store.inner.payments_for_debt(debt).len(), 1);
    assert_eq!(store.inner.movements.len(), 1);
    assert_eq!(store.inner.debt(debt).unwrap().balance, 1000.0);
}

#[test]
fn repeated_identical_payments_both_apply() {
    let (mut office, account) = office_with_open_batch();
    let debt = external_debt(&mut office, 1000.0);

    for _ in 0..2 {
        PaymentService::process_external(&mut office, debt, 200.0, account, pay_date(), None)
            .expect("payment");
    }
    assert_eq!(office.payments_for_debt(debt).len(), 2);
    assert_eq!(office.debt(debt).unwrap().balance, 600.0);
    PaymentService::verify_debt_balance(&office, debt).expect("still consistent");
}

#[test]
fn internal_payment_books_the_expense_side() {
    let mut office = BackOffice::new("Till");
    let account = office.add_treasury_account(TreasuryAccount::new("Cash"));
    BatchService::open(&mut office).unwrap();
    let debt = office.add_debt(Debt::new(DebtKind::Internal, None, 400.0, pay_date()));
    let category = backoffice_core::domain::ExpenseCategory::new("Supplier restock");
    let category_id = category.id;
    office.expense_categories.push(category);
    let clerk = Uuid::new_v4();

    PaymentService::process_internal(
        &mut office,
        debt,
        150.0,
        account,
        category_id,
        pay_date(),
        Some("restock".into()),
        clerk,
    )
    .expect("internal payment");

    let movement = &office.movements[0];
    assert_eq!(movement.expense_category_id, Some(category_id));
    assert_eq!(movement.recorded_by, Some(clerk));
    assert_eq!(office.debt(debt).unwrap().balance, 250.0);
}

#[test]
fn kind_mismatch_is_rejected_before_any_write() {
    let (mut office, account) = office_with_open_batch();
    let debt = external_debt(&mut office, 500.0);
    let category = Uuid::new_v4();

    let err = PaymentService::process_internal(
        &mut office,
        debt,
        100.0,
        account,
        category,
        pay_date(),
        None,
        Uuid::new_v4(),
    )
    .expect_err("external debt through the internal entry point");
    assert!(matches!(err, ServiceError::InvalidKind { .. }));
    assert!(office.payments.is_empty());
    assert!(office.movements.is_empty());
}
