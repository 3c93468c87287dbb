use std::path::PathBuf;
use std::sync::Once;

use crate::errors::BackofficeError;

/// Environment variable that overrides the application data directory.
pub const HOME_ENV: &str = "BACKOFFICE_HOME";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("backoffice_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Resolves the application data directory: `$BACKOFFICE_HOME` when set,
/// otherwise `~/.backoffice_core`.
pub fn default_app_dir() -> Result<PathBuf, BackofficeError> {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".backoffice_core"))
        .ok_or_else(|| BackofficeError::Storage("unable to resolve home directory".into()))
}
