//! SQL DDL for the journal database.
//!
//! Column names and the `Y`/`N` flag encoding are shared with journal files
//! written by earlier releases, so they must not change. `AUTOINCREMENT`
//! keeps deleted ids from being handed out again; files created without it
//! are still opened as-is.

/// The only table.
pub const TABLE: &str = "todo_items";

/// Idempotent table creation.
pub const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS todo_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task TEXT,
    is_done TEXT,
    created TEXT,
    done TEXT
);
";

/// Applied on every connection.
pub const PRAGMAS: &str = r"
PRAGMA busy_timeout = 5000;
";

/// Default file name for the journal database.
pub const DATABASE_NAME: &str = "miniko.db";
