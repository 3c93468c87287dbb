//! JSON-on-disk implementation of [`StorageBackend`].

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::errors::BackofficeError;
use crate::office::BackOffice;
use crate::utils::default_app_dir;

use super::{BackupInfo, LoadReport, StorageBackend};

const OFFICE_DIR: &str = "offices";
const BACKUP_DIR: &str = "backups";
const LAST_OFFICE_FILE: &str = "last_office";
const DEFAULT_MAX_BACKUPS: usize = 10;

/// Stores offices under `<root>/offices/<name>.json`, backups under
/// `<root>/backups/<name>/`, and the last-opened marker at
/// `<root>/last_office`.
pub struct JsonStore {
    root: PathBuf,
    max_backups: usize,
}

impl JsonStore {
    /// Opens (creating directories if needed) a store rooted at `root`, or
    /// at the default application directory when `root` is `None`.
    pub fn new(root: Option<PathBuf>, max_backups: Option<usize>) -> Result<Self, BackofficeError> {
        let root = match root {
            Some(root) => root,
            None => default_app_dir()?,
        };
        fs::create_dir_all(root.join(OFFICE_DIR))?;
        fs::create_dir_all(root.join(BACKUP_DIR))?;
        Ok(Self {
            root,
            max_backups: max_backups.unwrap_or(DEFAULT_MAX_BACKUPS),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.root.join(BACKUP_DIR).join(sanitize(name))
    }

    fn write_atomic(&self, office: &BackOffice, path: &Path) -> Result<(), BackofficeError> {
        let tmp = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(office)?;
        fs::write(&tmp, json)?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    fn read_office(&self, path: &Path) -> Result<BackOffice, BackofficeError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Drops the oldest backups beyond the retention limit.
    fn prune_backups(&self, name: &str) -> Result<(), BackofficeError> {
        let mut backups = self.list_backups(name)?;
        while backups.len() > self.max_backups {
            let oldest = backups.remove(0);
            fs::remove_file(&oldest.path)?;
        }
        Ok(())
    }
}

impl StorageBackend for JsonStore {
    fn load_named(&self, name: &str) -> Result<LoadReport, BackofficeError> {
        let path = self.office_path(name);
        if !path.exists() {
            return Err(BackofficeError::Storage(format!(
                "office `{name}` does not exist"
            )));
        }
        let office = self.read_office(&path)?;
        let schema_version = office.schema_version;
        Ok(LoadReport {
            office,
            path,
            name: Some(name.to_string()),
            schema_version,
        })
    }

    fn load_from_path(&self, path: &Path) -> Result<LoadReport, BackofficeError> {
        let office = self.read_office(path)?;
        let schema_version = office.schema_version;
        Ok(LoadReport {
            office,
            path: path.to_path_buf(),
            name: None,
            schema_version,
        })
    }

    fn save_named(&self, office: &BackOffice, name: &str) -> Result<PathBuf, BackofficeError> {
        if sanitize(name).is_empty() {
            return Err(BackofficeError::Storage("office name is empty".into()));
        }
        let path = self.office_path(name);
        self.write_atomic(office, &path)?;
        Ok(path)
    }

    fn save_to_path(&self, office: &BackOffice, path: &Path) -> Result<(), BackofficeError> {
        self.write_atomic(office, path)
    }

    fn office_path(&self, name: &str) -> PathBuf {
        self.root
            .join(OFFICE_DIR)
            .join(format!("{}.json", sanitize(name)))
    }

    fn list_offices(&self) -> Result<Vec<String>, BackofficeError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.root.join(OFFICE_DIR))? {
            let entry = entry?;
            let file_name = entry.file_name();
            if let Some(name) = file_name.to_str().and_then(|n| n.strip_suffix(".json")) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn last_office(&self) -> Result<Option<String>, BackofficeError> {
        let marker = self.root.join(LAST_OFFICE_FILE);
        if !marker.exists() {
            return Ok(None);
        }
        let name = fs::read_to_string(marker)?;
        let name = name.trim();
        if name.is_empty() {
            Ok(None)
        } else {
            Ok(Some(name.to_string()))
        }
    }

    fn record_last_office(&self, name: Option<&str>) -> Result<(), BackofficeError> {
        let marker = self.root.join(LAST_OFFICE_FILE);
        match name {
            Some(name) => fs::write(marker, name)?,
            None => {
                if marker.exists() {
                    fs::remove_file(marker)?;
                }
            }
        }
        Ok(())
    }

    fn backup_named(&self, name: &str, note: Option<&str>) -> Result<PathBuf, BackofficeError> {
        let source = self.office_path(name);
        if !source.exists() {
            return Err(BackofficeError::Storage(format!(
                "office `{name}` does not exist"
            )));
        }
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;

        let stamp = Utc::now().format("%Y%m%dT%H%M%S");
        let stem = match note.map(slugify).filter(|slug| !slug.is_empty()) {
            Some(slug) => format!("{}_{stamp}_{slug}", sanitize(name)),
            None => format!("{}_{stamp}", sanitize(name)),
        };
        // Same-second backups get a sequence suffix instead of overwriting.
        let mut target = dir.join(format!("{stem}.json"));
        let mut seq = 1;
        while target.exists() {
            seq += 1;
            target = dir.join(format!("{stem}_{seq}.json"));
        }
        fs::copy(&source, &target)?;
        self.prune_backups(name)?;
        Ok(target)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<BackupInfo>, BackofficeError> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut backups = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let created_at = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            backups.push(BackupInfo {
                path,
                file_name,
                created_at,
            });
        }
        // File names embed the timestamp, so lexical order is creation order.
        backups.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(backups)
    }

    fn restore_backup(&self, name: &str, backup: &Path) -> Result<PathBuf, BackofficeError> {
        if !backup.exists() {
            return Err(BackofficeError::Storage(format!(
                "backup `{}` does not exist",
                backup.display()
            )));
        }
        // Validate before overwriting the live file.
        self.read_office(backup)?;
        let target = self.office_path(name);
        fs::copy(backup, &target)?;
        Ok(target)
    }
}

/// Lowercases and maps anything outside `[a-z0-9]` to `_` for file names.
fn sanitize(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Note slugs use hyphens so they read apart from the sanitized name.
fn slugify(note: &str) -> String {
    note.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
