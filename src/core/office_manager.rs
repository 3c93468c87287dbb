use std::path::{Path, PathBuf};

use crate::errors::BackofficeError;
use crate::office::{BackOffice, CURRENT_SCHEMA_VERSION};
use crate::storage::{BackupInfo, LoadReport, StorageBackend};

/// Metadata describing the outcome of a load operation.
#[derive(Debug, Clone)]
pub struct LoadMetadata {
    pub path: PathBuf,
    pub name: Option<String>,
    pub schema_version: u8,
}

/// Facade that coordinates office state, persistence, and backups.
pub struct OfficeManager {
    pub current: Option<BackOffice>,
    current_name: Option<String>,
    current_path: Option<PathBuf>,
    storage: Box<dyn StorageBackend>,
}

impl OfficeManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: None,
            current_name: None,
            current_path: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn load(&mut self, name: &str) -> Result<LoadMetadata, BackofficeError> {
        let report = self.storage.load_named(name)?;
        self.ensure_schema_support(report.schema_version)?;
        Ok(self.apply_load(report))
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<LoadMetadata, BackofficeError> {
        let report = self.storage.load_from_path(path)?;
        self.ensure_schema_support(report.schema_version)?;
        Ok(self.apply_load(report))
    }

    /// Saves the current office to wherever it came from.
    pub fn save(&mut self) -> Result<PathBuf, BackofficeError> {
        let office = self
            .current
            .as_ref()
            .ok_or_else(|| BackofficeError::Storage("no office loaded".into()))?;
        if let Some(name) = self.current_name.clone() {
            let path = self.storage.save_named(office, &name)?;
            self.current_path = Some(path.clone());
            Ok(path)
        } else if let Some(path) = self.current_path.clone() {
            self.storage.save_to_path(office, &path)?;
            Ok(path)
        } else {
            Err(BackofficeError::Storage(
                "unable to determine save target for current office".into(),
            ))
        }
    }

    pub fn save_as(&mut self, name: &str) -> Result<PathBuf, BackofficeError> {
        let office = self
            .current
            .as_ref()
            .ok_or_else(|| BackofficeError::Storage("no office loaded".into()))?;
        let path = self.storage.save_named(office, name)?;
        self.current_name = Some(name.to_string());
        self.current_path = Some(path.clone());
        Ok(path)
    }

    pub fn backup(&self, note: Option<&str>) -> Result<PathBuf, BackofficeError> {
        let name = self
            .current_name
            .as_deref()
            .ok_or_else(|| BackofficeError::Storage("current office is unnamed".into()))?;
        self.storage.backup_named(name, note)
    }

    pub fn list_backups(&self, name: &str) -> Result<Vec<BackupInfo>, BackofficeError> {
        self.storage.list_backups(name)
    }

    pub fn restore_backup(&self, name: &str, backup: &Path) -> Result<PathBuf, BackofficeError> {
        self.storage.restore_backup(name, backup)
    }

    pub fn list_offices(&self) -> Result<Vec<String>, BackofficeError> {
        self.storage.list_offices()
    }

    pub fn last_opened(&self) -> Result<Option<String>, BackofficeError> {
        self.storage.last_office()
    }

    pub fn record_last_opened(&self, name: Option<&str>) -> Result<(), BackofficeError> {
        self.storage.record_last_office(name)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn set_current(&mut self, office: BackOffice, path: Option<PathBuf>, name: Option<String>) {
        self.current = Some(office);
        self.current_path = path;
        self.current_name = name;
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.current_name = None;
        self.current_path = None;
    }

    fn ensure_schema_support(&self, schema_version: u8) -> Result<(), BackofficeError> {
        if schema_version > CURRENT_SCHEMA_VERSION {
            return Err(BackofficeError::Storage(format!(
                "office schema v{} is newer than supported v{}",
                schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(())
    }

    fn apply_load(&mut self, report: LoadReport) -> LoadMetadata {
        let LoadReport {
            office,
            path,
            name,
            schema_version,
        } = report;
        self.current = Some(office);
        self.current_path = Some(path.clone());
        self.current_name = name.clone();
        LoadMetadata {
            path,
            name,
            schema_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStore;
    use std::fs;
    use tempfile::tempdir;

    fn manager(dir: &Path) -> OfficeManager {
        let store = JsonStore::new(Some(dir.to_path_buf()), Some(3)).unwrap();
        OfficeManager::new(Box::new(store))
    }

    #[test]
    fn save_and_load_named_roundtrip() {
        let temp = tempdir().unwrap();
        let mut manager = manager(temp.path());

        manager.set_current(BackOffice::new("Demo"), None, None);
        let path = manager.save_as("demo-office").expect("save office");
        assert!(path.exists());

        manager.clear();
        let metadata = manager.load("demo-office").expect("load office");
        assert_eq!(metadata.name.as_deref(), Some("demo-office"));
        assert!(manager.current.is_some());
        assert!(manager.current_path().is_some());
    }

    #[test]
    fn rejects_future_schema_versions() {
        let temp = tempdir().unwrap();
        let mut manager = manager(temp.path());

        let path = temp.path().join("future.json");
        let mut office = BackOffice::new("Future");
        office.schema_version = CURRENT_SCHEMA_VERSION + 5;
        fs::write(&path, serde_json::to_string(&office).unwrap()).unwrap();

        let err = manager
            .load_from_path(&path)
            .expect_err("load future schema should fail");
        match err {
            BackofficeError::Storage(message) => {
                assert!(message.contains("newer"), "unexpected error: {message}");
            }
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn last_opened_follows_explicit_recording() {
        let temp = tempdir().unwrap();
        let mut manager = manager(temp.path());
        manager.set_current(BackOffice::new("Demo"), None, None);
        manager.save_as("demo").unwrap();
        manager.record_last_opened(Some("demo")).unwrap();
        assert_eq!(manager.last_opened().unwrap().as_deref(), Some("demo"));
    }
}
