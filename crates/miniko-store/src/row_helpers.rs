//! Column accessors that map read failures to [`StoreError::CorruptRow`].

use crate::error::StoreError;

/// Get a column value from a row, returning `CorruptRow` on failure.
///
/// Use `Option<T>` for nullable columns.
pub fn get<T: rusqlite::types::FromSql>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    row.get(idx).map_err(|e| StoreError::CorruptRow {
        table,
        column,
        detail: e.to_string(),
    })
}
