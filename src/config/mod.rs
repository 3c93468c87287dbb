use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::BackofficeError;
use crate::utils::default_app_dir;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_office: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "es-AR".into(),
            currency: "ARS".into(),
            last_opened_office: None,
        }
    }
}

/// Loads and saves the application configuration file under the app
/// directory. A missing file yields the defaults.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BackofficeError> {
        Ok(Self::from_base(default_app_dir()?))
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Self {
        Self {
            path: base.join(CONFIG_FILE),
        }
    }

    pub fn load(&self) -> Result<Config, BackofficeError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), BackofficeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
