//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a settings
//! file may set any subset of fields; the rest keep their defaults.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// File name used when no database path is configured.
pub const DEFAULT_DATABASE_NAME: &str = "miniko.db";

/// Timestamp format written for new entries (e.g. `2024/01/31, 18:05`).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y/%m/%d, %H:%M";

/// Root settings type.
///
/// ```json
/// {
///   "database": { "path": "/home/me/journal/miniko.db" },
///   "journal": { "timestampFormat": "%Y-%m-%d %H:%M" },
///   "logging": { "level": "debug", "json": true }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinikoSettings {
    /// Where the journal lives.
    pub database: DatabaseSettings,
    /// How entries are stamped.
    pub journal: JournalSettings,
    /// Diagnostic output.
    pub logging: LoggingSettings,
}

impl MinikoSettings {
    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        self.journal.validate()
    }
}

/// Database location.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Explicit database file. When unset, `miniko.db` next to the
    /// executable is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl DatabaseSettings {
    /// The configured path, or the default beside the running executable.
    ///
    /// Falls back to the working directory when the executable location
    /// cannot be determined.
    pub fn resolve_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_DATABASE_NAME)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_NAME))
    }
}

/// Entry stamping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JournalSettings {
    /// `chrono` strftime format for creation and completion times.
    pub timestamp_format: String,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl JournalSettings {
    fn validate(&self) -> Result<()> {
        if self.timestamp_format.trim().is_empty() {
            return Err(SettingsError::InvalidValue {
                key: "journal.timestampFormat",
                reason: "must not be empty".to_string(),
            });
        }
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(SettingsError::InvalidValue {
                key: "journal.timestampFormat",
                reason: format!("{:?} is not a valid strftime format", self.timestamp_format),
            });
        }
        Ok(())
    }
}

/// Log output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default filter directive. `RUST_LOG` takes precedence.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}
