//! Persisted user settings.
//!
//! Stored as JSON under [`SETTINGS_KEY`](super::SETTINGS_KEY):
//!
//! ```json
//! { "theme": "tomato", "timer": { "workDuration": 25, "breakDuration": 5, "autoStartBreak": true } }
//! ```
//!
//! Values can be read and written by dot-separated key, e.g.
//! `timer.workDuration`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use super::{read, write, DurableStore, SETTINGS_KEY};
use crate::error::{ConfigError, CoreError, ValidationError};

/// Visual theme variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Tomato,
    Mint,
    Midnight,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Tomato, Theme::Mint, Theme::Midnight];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Tomato => "tomato",
            Theme::Mint => "mint",
            Theme::Midnight => "midnight",
        }
    }

    /// Whether the theme renders on a dark background.
    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Midnight)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "theme".into(),
                message: format!("expected one of tomato, mint, midnight; got '{s}'"),
            })
    }
}

/// Timer durations and behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    /// Work session length in minutes.
    #[serde(default = "default_work_duration")]
    pub work_duration: u32,
    /// Break length in minutes.
    #[serde(default = "default_break_duration")]
    pub break_duration: u32,
    /// Roll straight into the break when a work session ends.
    #[serde(default = "default_true")]
    pub auto_start_break: bool,
}

/// Partial update for [`TimerSettings`]; `None` leaves a field as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSettingsPatch {
    pub work_duration: Option<u32>,
    pub break_duration: Option<u32>,
    pub auto_start_break: Option<bool>,
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub timer: TimerSettings,
}

fn default_work_duration() -> u32 {
    25
}
fn default_break_duration() -> u32 {
    5
}
fn default_true() -> bool {
    true
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration: default_work_duration(),
            break_duration: default_break_duration(),
            auto_start_break: true,
        }
    }
}

impl TimerSettings {
    pub fn work_secs(&self) -> u32 {
        self.work_duration.saturating_mul(60)
    }

    pub fn break_secs(&self) -> u32 {
        self.break_duration.saturating_mul(60)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.work_duration == 0 {
            return Err(ValidationError::InvalidValue {
                field: "timer.workDuration".into(),
                message: "must be a positive number of minutes".into(),
            });
        }
        if self.break_duration == 0 {
            return Err(ValidationError::InvalidValue {
                field: "timer.breakDuration".into(),
                message: "must be a positive number of minutes".into(),
            });
        }
        Ok(())
    }

    fn apply(&self, patch: TimerSettingsPatch) -> Self {
        Self {
            work_duration: patch.work_duration.unwrap_or(self.work_duration),
            break_duration: patch.break_duration.unwrap_or(self.break_duration),
            auto_start_break: patch.auto_start_break.unwrap_or(self.auto_start_break),
        }
    }
}

impl Settings {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot set a whole section".into()));
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Get a setting as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Return a copy with `key` set to `value`.
    fn with_value(&self, key: &str, value: &str) -> Result<Self, CoreError> {
        let mut json = serde_json::to_value(self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Settings = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.timer.validate()?;
        Ok(updated)
    }

    /// Replace zero durations (corrupted data) with defaults.
    fn sanitized(mut self) -> Self {
        if self.timer.validate().is_err() {
            tracing::warn!(timer = ?self.timer, "stored timer settings invalid, using defaults");
            self.timer = TimerSettings::default();
        }
        self
    }
}

/// Owns the live [`Settings`] and persists every change.
pub struct SettingsStore {
    store: Rc<dyn DurableStore>,
    settings: Settings,
}

impl SettingsStore {
    /// Load settings from `store`, falling back to defaults.
    pub fn load(store: Rc<dyn DurableStore>) -> Self {
        let settings = read(store.as_ref(), SETTINGS_KEY, Settings::default()).sanitized();
        Self { store, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    pub fn timer(&self) -> TimerSettings {
        self.settings.timer
    }

    pub fn update_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        self.persist();
    }

    /// Merge `patch` into the timer settings.
    ///
    /// # Errors
    /// Returns a validation error, leaving settings unchanged, if a duration
    /// would become zero.
    pub fn update_timer_settings(&mut self, patch: TimerSettingsPatch) -> Result<(), ValidationError> {
        let timer = self.settings.timer.apply(patch);
        timer.validate()?;
        self.settings.timer = timer;
        self.persist();
        Ok(())
    }

    /// Get a setting by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        self.settings.get(key)
    }

    /// Set a setting by dot-separated key.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value doesn't parse or
    /// validate.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.settings = self.settings.with_value(key, value)?;
        self.persist();
        Ok(())
    }

    /// Restore defaults.
    pub fn reset(&mut self) {
        self.settings = Settings::default();
        self.persist();
    }

    fn persist(&self) {
        write(self.store.as_ref(), SETTINGS_KEY, &self.settings);
    }
}
