//! Opaque timestamp text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pre-formatted timestamp as stored in the journal.
///
/// The store keeps timestamps as opaque text. Formatting is the caller's
/// job, which keeps files written by older builds (or other tools) readable
/// regardless of the format they used.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Wrap already formatted text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The stored text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
