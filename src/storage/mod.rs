//! Persistence for office snapshots.
//!
//! Offices are stored as pretty-printed JSON under the application data
//! directory, one file per named office, with timestamped backups kept
//! alongside. All writes stage to a temporary file and rename into place.

pub mod json_backend;

use std::path::{Path, PathBuf};

use crate::errors::BackofficeError;
use crate::office::BackOffice;

pub use json_backend::JsonStore;

/// Metadata about a single backup file.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Outcome of loading an office snapshot.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub office: BackOffice,
    pub path: PathBuf,
    pub name: Option<String>,
    pub schema_version: u8,
}

/// Trait that abstracts interaction with the persistence layer.
pub trait StorageBackend: Send + Sync {
    fn load_named(&self, name: &str) -> Result<LoadReport, BackofficeError>;
    fn load_from_path(&self, path: &Path) -> Result<LoadReport, BackofficeError>;
    fn save_named(&self, office: &BackOffice, name: &str) -> Result<PathBuf, BackofficeError>;
    fn save_to_path(&self, office: &BackOffice, path: &Path) -> Result<(), BackofficeError>;
    fn office_path(&self, name: &str) -> PathBuf;
    fn list_offices(&self) -> Result<Vec<String>, BackofficeError>;
    fn last_office(&self) -> Result<Option<String>, BackofficeError>;
    fn record_last_office(&self, name: Option<&str>) -> Result<(), BackofficeError>;
    fn backup_named(&self, name: &str, note: Option<&str>) -> Result<PathBuf, BackofficeError>;
    fn list_backups(&self, name: &str) -> Result<Vec<BackupInfo>, BackofficeError>;
    fn restore_backup(&self, name: &str, backup: &Path) -> Result<PathBuf, BackofficeError>;
}
