use backoffice_core::{
    core::OfficeManager,
    domain::{Client, Debt, DebtKind, TreasuryAccount},
    office::{BackOffice, CURRENT_SCHEMA_VERSION},
    storage::{JsonStore, StorageBackend},
};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn populated_office() -> BackOffice {
    let mut office = BackOffice::new("Main Street");
    let client = office.add_client(Client::new("Maria Duarte", "DNI", "30111222"));
    office.add_treasury_account(TreasuryAccount::new("Cash"));
    office.add_debt(Debt::new(
        DebtKind::External,
        Some(client),
        750.0,
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    ));
    office
}

#[test]
fn named_roundtrip_preserves_collections() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(Some(temp.path().to_path_buf()), None).unwrap();

    let office = populated_office();
    store.save_named(&office, "main-street").unwrap();

    let report = store.load_named("main-street").unwrap();
    assert_eq!(report.office.name, "Main Street");
    assert_eq!(report.office.clients.len(), 1);
    assert_eq!(report.office.debts.len(), 1);
    assert_eq!(report.office.debts[0].balance, 750.0);
    assert_eq!(report.schema_version, CURRENT_SCHEMA_VERSION);
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    path.with_extension("tmp")
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(Some(temp.path().to_path_buf()), None).unwrap();

    let mut office = populated_office();
    let path = store.save_named(&office, "reliable").expect("initial save");
    let original = fs::read_to_string(&path).expect("read original file");

    // A directory squatting on the staging path forces the write to fail.
    fs::create_dir_all(tmp_path_for(&path)).unwrap();

    office.add_treasury_account(TreasuryAccount::new("Card"));
    let result = store.save_to_path(&office, &path);
    assert!(result.is_err(), "staged write should fail");

    let current = fs::read_to_string(&path).expect("read after failure");
    assert_eq!(original, current, "original file must survive a failed save");
}

#[test]
fn backups_rotate_and_restore() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(Some(temp.path().to_path_buf()), Some(2)).unwrap();

    let mut office = populated_office();
    store.save_named(&office, "main").unwrap();
    let backup = store.backup_named("main", Some("before close")).unwrap();

    // Overwrite the live office, then restore the snapshot.
    office.clients.clear();
    store.save_named(&office, "main").unwrap();
    assert!(store.load_named("main").unwrap().office.clients.is_empty());

    store.restore_backup("main", &backup).unwrap();
    assert_eq!(store.load_named("main").unwrap().office.clients.len(), 1);

    // Retention keeps only the newest two backups.
    store.backup_named("main", None).unwrap();
    store.backup_named("main", None).unwrap();
    store.backup_named("main", None).unwrap();
    assert_eq!(store.list_backups("main").unwrap().len(), 2);
}

#[test]
fn manager_rejects_snapshots_from_a_newer_schema() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(Some(temp.path().to_path_buf()), None).unwrap();
    let mut manager = OfficeManager::new(Box::new(store));

    let mut office = populated_office();
    office.schema_version = CURRENT_SCHEMA_VERSION + 1;
    let path = temp.path().join("future.json");
    fs::write(&path, serde_json::to_string(&office).unwrap()).unwrap();

    assert!(manager.load_from_path(&path).is_err());
    assert!(manager.current.is_none());
}

#[test]
fn manager_tracks_last_opened_office() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(Some(temp.path().to_path_buf()), None).unwrap();
    let mut manager = OfficeManager::new(Box::new(store));

    manager.set_current(populated_office(), None, None);
    manager.save_as("main").unwrap();
    manager.record_last_opened(Some("main")).unwrap();

    assert_eq!(manager.last_opened().unwrap().as_deref(), Some("main"));
    assert_eq!(manager.list_offices().unwrap(), ["main"]);
}
