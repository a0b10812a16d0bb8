//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`MinikoSettings::default()`]
//! 2. If the settings file exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//! 4. Validate
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::MinikoSettings;

/// Resolve the path to the settings file (`~/.miniko/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".miniko").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<MinikoSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. Invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<MinikoSettings> {
    let mut settings = read_settings_file(path)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<MinikoSettings> {
    let malformed = |source| SettingsError::Malformed {
        path: path.to_path_buf(),
        source,
    };
    let defaults = serde_json::to_value(MinikoSettings::default()).map_err(malformed)?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let user: Value = serde_json::from_str(&content).map_err(malformed)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    serde_json::from_value(merged).map_err(malformed)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `MINIKO_*` environment overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut MinikoSettings) {
    apply_overrides_from(settings, |name| std::env::var(name).ok());
}

/// Apply overrides using `lookup` in place of the process environment.
///
/// Empty values are ignored. Invalid booleans are ignored with a warning.
pub fn apply_overrides_from<F>(settings: &mut MinikoSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read_string = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read_string("MINIKO_DB_PATH") {
        settings.database.path = Some(PathBuf::from(v));
    }
    if let Some(v) = read_string("MINIKO_TIMESTAMP_FORMAT") {
        settings.journal.timestamp_format = v;
    }
    if let Some(v) = read_string("MINIKO_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read_string("MINIKO_LOG_JSON") {
        match parse_bool(&v) {
            Some(b) => settings.logging.json = b,
            None => {
                tracing::warn!(
                    key = "MINIKO_LOG_JSON",
                    value = %v,
                    "invalid boolean env var, ignoring"
                );
            }
        }
    }
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn deep_merge_objects_recursively() {
        let target = json!({"a": {"x": 1, "y": 2}, "b": 3});
        let source = json!({"a": {"y": 20, "z": 30}});
        let merged = deep_merge(target, source);
        assert_eq!(merged, json!({"a": {"x": 1, "y": 20, "z": 30}, "b": 3}));
    }

    #[test]
    fn deep_merge_skips_nulls_and_replaces_primitives() {
        let target = json!({"a": 1, "b": [1, 2]});
        let source = json!({"a": null, "b": [3]});
        let merged = deep_merge(target, source);
        assert_eq!(merged, json!({"a": 1, "b": [3]}));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = read_settings_file(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, MinikoSettings::default());
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"database": {"path": "/srv/miniko.db"}, "logging": {"level": "debug"}}"#,
        )
        .unwrap();

        let settings = read_settings_file(&path).unwrap();
        assert_eq!(settings.database.path, Some(PathBuf::from("/srv/miniko.db")));
        assert_eq!(settings.logging.level, "debug");
        assert!(!settings.logging.json);
        assert_eq!(settings.journal.timestamp_format, "%Y/%m/%d, %H:%M");
    }

    #[test]
    fn invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            read_settings_file(&path),
            Err(SettingsError::Malformed { .. })
        ));
    }

    #[test]
    fn invalid_format_in_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"journal": {"timestampFormat": ""}}"#).unwrap();

        let mut settings = read_settings_file(&path).unwrap();
        apply_overrides_from(&mut settings, env(&[]));
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidValue {
                key: "journal.timestampFormat",
                ..
            })
        ));
    }

    #[test]
    fn env_overrides_win() {
        let mut settings = MinikoSettings::default();
        apply_overrides_from(
            &mut settings,
            env(&[
                ("MINIKO_DB_PATH", "/tmp/j.db"),
                ("MINIKO_TIMESTAMP_FORMAT", "%F %R"),
                ("MINIKO_LOG_LEVEL", "miniko_store=debug"),
                ("MINIKO_LOG_JSON", "yes"),
            ]),
        );
        assert_eq!(settings.database.path, Some(PathBuf::from("/tmp/j.db")));
        assert_eq!(settings.journal.timestamp_format, "%F %R");
        assert_eq!(settings.logging.level, "miniko_store=debug");
        assert!(settings.logging.json);
    }

    #[test]
    fn empty_and_invalid_env_values_are_ignored() {
        let mut settings = MinikoSettings::default();
        apply_overrides_from(
            &mut settings,
            env(&[("MINIKO_DB_PATH", ""), ("MINIKO_LOG_JSON", "maybe")]),
        );
        assert!(settings.database.path.is_none());
        assert!(!settings.logging.json);
    }

    #[test]
    fn parse_bool_values() {
        for v in ["true", "1", "YES", "On"] {
            assert_eq!(parse_bool(v), Some(true), "{v}");
        }
        for v in ["false", "0", "no", "OFF"] {
            assert_eq!(parse_bool(v), Some(false), "{v}");
        }
        assert_eq!(parse_bool("perhaps"), None);
    }

    #[test]
    fn settings_path_under_home_dir() {
        let path = settings_path();
        assert!(path.ends_with(".miniko/settings.json"));
    }
}
