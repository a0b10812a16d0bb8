//! Scoped access to the journal database.
//!
//! A [`Session`] owns one `SQLite` connection. [`Session::scope`] opens a
//! session, runs a closure inside a transaction and closes the connection
//! again:
//!
//! - closure returns `Ok` → commit
//! - closure returns `Err` → rollback, error returned unchanged
//! - closure panics → the transaction guard rolls back while unwinding
//!
//! Nothing written inside a failed scope is visible afterwards.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, Transaction};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::schema;

/// One bounded unit of access to the database file.
pub struct Session {
    conn: Connection,
    path: PathBuf,
}

impl Session {
    /// Open a connection to the database at `path`, creating the file if
    /// it does not exist.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(schema::PRAGMAS)?;
        debug!(path = %path.display(), "session opened");
        Ok(Self {
            conn,
            path: path.to_owned(),
        })
    }

    /// Run `f` in a single transaction on a fresh connection to `path`.
    ///
    /// The connection is closed before this returns, on every path.
    pub fn scope<F, T>(path: &Path, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, StoreError>,
    {
        let mut session = Self::open(path)?;
        let result = session.run(f);
        let closed = session.close();
        let value = result?;
        closed?;
        Ok(value)
    }

    /// Run `f` in a transaction on this session's connection.
    pub fn run<F, T>(&mut self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, StoreError>,
    {
        let tx = self.conn.transaction()?;
        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                debug!(path = %self.path.display(), "session committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(error = %rollback_err, "rollback failed");
                }
                debug!(path = %self.path.display(), error = %err, "session rolled back");
                Err(err)
            }
        }
    }

    /// Location of the database this session is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the connection, reporting any error `SQLite` raises on close.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::from(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    fn setup() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.db");
        Session::scope(&path, |tx| {
            tx.execute_batch(schema::CREATE_TABLES)?;
            Ok(())
        })
        .unwrap();
        (dir, path)
    }

    fn insert(tx: &Transaction<'_>, task: &str) -> Result<(), StoreError> {
        let _ = tx.execute(
            "INSERT INTO todo_items (task, is_done, created) VALUES (?1, 'N', 'now')",
            [task],
        )?;
        Ok(())
    }

    fn count(path: &Path) -> i64 {
        let conn = Connection::open(path).unwrap();
        conn.query_row("SELECT COUNT(*) FROM todo_items", [], |row| row.get(0))
            .unwrap()
    }

    /// An exclusive lock can only be taken when no other connection holds a
    /// transaction open on the file.
    fn assert_unlocked(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch("PRAGMA busy_timeout = 0; BEGIN EXCLUSIVE; COMMIT;")
            .unwrap();
    }

    #[test]
    fn open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.db");
        let session = Session::open(&path).unwrap();
        assert_eq!(session.path(), path);
        session.close().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn ok_scope_commits() {
        let (_dir, path) = setup();
        Session::scope(&path, |tx| insert(tx, "kept")).unwrap();
        assert_eq!(count(&path), 1);
        assert_unlocked(&path);
    }

    #[test]
    fn err_scope_rolls_back_and_propagates() {
        let (_dir, path) = setup();
        let result: Result<(), StoreError> = Session::scope(&path, |tx| {
            insert(tx, "first")?;
            insert(tx, "second")?;
            Err(StoreError::CorruptRow {
                table: "todo_items",
                column: "task",
                detail: "forced".into(),
            })
        });

        assert!(matches!(result, Err(StoreError::CorruptRow { detail, .. }) if detail == "forced"));
        assert_eq!(count(&path), 0);
        assert_unlocked(&path);
    }

    #[test]
    fn sql_error_rolls_back_earlier_writes() {
        let (_dir, path) = setup();
        let result = Session::scope(&path, |tx| {
            insert(tx, "partial")?;
            let _ = tx.execute("INSERT INTO missing_table VALUES (1)", [])?;
            Ok(())
        });

        assert!(matches!(result, Err(StoreError::Database(_))));
        assert_eq!(count(&path), 0);
    }

    #[test]
    fn panic_in_scope_rolls_back() {
        let (_dir, path) = setup();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            Session::scope(&path, |tx| -> Result<(), StoreError> {
                insert(tx, "doomed")?;
                panic!("boom");
            })
        }));

        assert!(outcome.is_err());
        assert_eq!(count(&path), 0);
        assert_unlocked(&path);
    }

    #[test]
    fn run_reuses_one_connection() {
        let (_dir, path) = setup();
        let mut session = Session::open(&path).unwrap();
        session.run(|tx| insert(tx, "a")).unwrap();
        let failed: Result<(), StoreError> = session.run(|tx| {
            insert(tx, "b")?;
            Err(StoreError::Io(std::io::Error::other("stop")))
        });
        assert!(failed.is_err());
        session.run(|tx| insert(tx, "c")).unwrap();
        session.close().unwrap();

        assert_eq!(count(&path), 2);
    }

    #[test]
    fn open_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir.db");
        let result = Session::scope(&path, |_| Ok(()));
        assert!(matches!(result, Err(StoreError::Database(_))));
    }
}
