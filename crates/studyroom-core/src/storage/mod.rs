mod config;
pub mod database;
pub mod kv;

pub use config::{Config, DisplayConfig, LoggingConfig, StorageConfig, StudyConfig};
pub use database::{Database, StudyKind, StudySessionRecord, StudyStats};
pub use kv::{load_versioned, save_versioned, KeyValueStore, MemoryStore, PAYLOAD_VERSION};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory, creating it if needed.
///
/// `STUDYROOM_DATA_DIR` wins when set. Otherwise `~/.config/studyroom/`, or
/// `~/.config/studyroom-dev/` with `STUDYROOM_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("STUDYROOM_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYROOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studyroom-dev")
            } else {
                base_dir.join("studyroom")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
