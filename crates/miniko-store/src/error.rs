//! Store error type.

/// Errors surfaced by the store. A missing task is not an error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database could not be opened, read or written.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The directory holding the database could not be created.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row does not describe a valid task.
    #[error("corrupt row in {table}.{column}: {detail}")]
    CorruptRow {
        /// Table the row was read from.
        table: &'static str,
        /// Offending column.
        column: &'static str,
        /// What was wrong with the value.
        detail: String,
    },
}
