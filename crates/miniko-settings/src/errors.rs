//! Errors raised while loading journal settings.

use std::path::PathBuf;

use thiserror::Error;

/// Why the journal's settings could not be used.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("cannot read settings file {}: {source}", .path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not JSON, or its values have the wrong types.
    #[error("malformed settings in {}: {source}", .path.display())]
    Malformed {
        /// File the bad JSON came from.
        path: PathBuf,
        /// Parser or type error.
        #[source]
        source: serde_json::Error,
    },

    /// A setting parsed but cannot be used, e.g. an unusable timestamp format.
    #[error("invalid setting {key}: {reason}")]
    InvalidValue {
        /// Dotted JSON key of the setting, e.g. `journal.timestampFormat`.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_names_the_file() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = SettingsError::Malformed {
            path: PathBuf::from("/home/me/.miniko/settings.json"),
            source,
        };
        let text = err.to_string();
        assert!(text.starts_with("malformed settings in /home/me/.miniko/settings.json"));
    }

    #[test]
    fn invalid_value_names_the_key() {
        let err = SettingsError::InvalidValue {
            key: "journal.timestampFormat",
            reason: "must not be empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid setting journal.timestampFormat: must not be empty"
        );
    }

    #[test]
    fn read_keeps_io_source() {
        let err = SettingsError::Read {
            path: PathBuf::from("settings.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "denied");
    }
}
