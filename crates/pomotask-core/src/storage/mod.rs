//! Durable key-value storage.
//!
//! Every persisted value is a JSON blob under a named key. Readers always
//! get a value back: an absent key or a malformed blob falls back to the
//! caller's default. Writers are fire-and-forget.

mod config;
pub mod database;
mod memory;

pub use config::{Settings, SettingsStore, Theme, TimerSettings, TimerSettingsPatch};
pub use database::Database;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

use crate::error::StorageError;

/// Key holding the settings blob.
pub const SETTINGS_KEY: &str = "pomodoro-settings";
/// Key holding the ordered task collection.
pub const TASKS_KEY: &str = "pomodoro-tasks";
/// Key holding the per-day completed work session counts.
pub const STATS_KEY: &str = "pomodoro-stats";

/// A named, durable slot store.
///
/// Implementations deal in raw JSON text; use [`read`] and [`write`] for
/// typed access.
pub trait DurableStore {
    /// Raw JSON stored under `key`, or `None` if the key was never written.
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read `key` as `T`, falling back to `default` when the key is absent,
/// unreadable or holds malformed JSON.
pub fn read<T: DeserializeOwned>(store: &dyn DurableStore, key: &str, default: T) -> T {
    let raw = match store.get_raw(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return default,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value, using default");
            return default;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "malformed stored value, using default");
            default
        }
    }
}

/// Serialize `value` and store it under `key`.
///
/// Failures are logged and swallowed; the in-memory state stays
/// authoritative for the rest of the process.
pub fn write<T: Serialize + ?Sized>(store: &dyn DurableStore, key: &str, value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to serialize value");
            return;
        }
    };
    if let Err(e) = store.set_raw(key, &json) {
        tracing::warn!(key, error = %e, "failed to persist value");
    }
}

/// Returns the data directory, creating it if needed.
///
/// `POMOTASK_DATA_DIR` wins when set. Otherwise `~/.config/pomotask/`, or
/// `~/.config/pomotask-dev/` when `POMOTASK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("POMOTASK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOTASK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomotask-dev")
            } else {
                base_dir.join("pomotask")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}
