//! Task persistence: the journal operations on top of [`Session`].

use std::path::{Path, PathBuf};

use miniko_core::{OpenTask, Task, TaskId, TaskListing, TaskStatus, Timestamp};
use rusqlite::params;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;
use crate::row_helpers;
use crate::schema::{self, TABLE};
use crate::session::Session;

const SELECT_COLUMNS: &str = "SELECT id, task, is_done, created, done FROM todo_items";

/// Task persistence over a single `SQLite` file.
///
/// Holds only the file path; each operation opens its own [`Session`].
#[derive(Clone, Debug)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Prepare the database at `path` and return a store bound to it.
    ///
    /// Creates the parent directory and the file when missing. Safe to call
    /// on every startup: existing rows are left untouched.
    pub fn initialize(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        Session::scope(&path, |tx| {
            tx.execute_batch(schema::CREATE_TABLES)?;
            Ok(())
        })?;

        info!(path = %path.display(), "task store initialized");
        Ok(Self { path })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a new open task and return its store-assigned id.
    ///
    /// The description is stored as given; rejecting empty text is up to
    /// the caller.
    #[instrument(skip_all, fields(created_at = %created_at))]
    pub fn create_task(
        &self,
        description: &str,
        created_at: &Timestamp,
    ) -> Result<TaskId, StoreError> {
        let id = Session::scope(&self.path, |tx| {
            let _ = tx.execute(
                "INSERT INTO todo_items (task, is_done, created) VALUES (?1, ?2, ?3)",
                params![description, TaskStatus::Open.as_sql(), created_at.as_str()],
            )?;
            Ok(TaskId::new(tx.last_insert_rowid()))
        })?;

        debug!(task_id = %id, "task created");
        Ok(id)
    }

    /// All tasks, split into open and done, each in creation order.
    ///
    /// A row that cannot be read as a task is logged and left out, so one
    /// bad row does not hide the rest of the journal. It can still be
    /// removed with [`TaskStore::delete_task`].
    #[instrument(skip_all)]
    pub fn list_tasks(&self) -> Result<TaskListing, StoreError> {
        let (listing, skipped) = Session::scope(&self.path, |tx| {
            let mut stmt = tx.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
            let mut rows = stmt.query([])?;
            let mut listing = TaskListing::default();
            let mut skipped = 0_usize;
            while let Some(row) = rows.next()? {
                match row_to_task(row) {
                    Ok(task) => listing.push(task),
                    Err(err @ StoreError::CorruptRow { .. }) => {
                        warn!(error = %err, "skipping unreadable task row");
                        skipped += 1;
                    }
                    Err(err) => return Err(err),
                }
            }
            Ok((listing, skipped))
        })?;

        debug!(
            open = listing.open.len(),
            done = listing.done.len(),
            skipped,
            "tasks listed"
        );
        Ok(listing)
    }

    /// Look up a single task.
    #[instrument(skip_all, fields(task_id = %id))]
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        Session::scope(&self.path, |tx| {
            let mut stmt = tx.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            let mut rows = stmt.query([id.get()])?;
            let task = rows.next()?.map(row_to_task).transpose()?;
            Ok(task)
        })
    }

    /// Mark an open task done at `completed_at`.
    ///
    /// Unknown ids and tasks that are already done are left unchanged
    /// without error; a done task keeps its first completion time.
    #[instrument(skip_all, fields(task_id = %id, completed_at = %completed_at))]
    pub fn complete_task(
        &self,
        id: TaskId,
        completed_at: &Timestamp,
    ) -> Result<TaskId, StoreError> {
        let rows = Session::scope(&self.path, |tx| {
            Ok(tx.execute(
                "UPDATE todo_items SET is_done = ?1, done = ?2 WHERE id = ?3 AND is_done = ?4",
                params![
                    TaskStatus::Done.as_sql(),
                    completed_at.as_str(),
                    id.get(),
                    TaskStatus::Open.as_sql(),
                ],
            )?)
        })?;

        debug!(rows, "task completed");
        Ok(id)
    }

    /// Permanently remove a task in either state. Unknown ids are a no-op.
    #[instrument(skip_all, fields(task_id = %id))]
    pub fn delete_task(&self, id: TaskId) -> Result<TaskId, StoreError> {
        let rows = Session::scope(&self.path, |tx| {
            Ok(tx.execute("DELETE FROM todo_items WHERE id = ?1", [id.get()])?)
        })?;

        debug!(rows, "task deleted");
        Ok(id)
    }
}

fn row_to_task(row: &rusqlite::Row<'_>) -> Result<Task, StoreError> {
    let id: i64 = row_helpers::get(row, 0, TABLE, "id")?;
    let description: String = row_helpers::get(row, 1, TABLE, "task")?;
    let flag: String = row_helpers::get(row, 2, TABLE, "is_done")?;
    let created: String = row_helpers::get(row, 3, TABLE, "created")?;
    let done: Option<String> = row_helpers::get(row, 4, TABLE, "done")?;

    let open = OpenTask {
        id: TaskId::new(id),
        description,
        created_at: Timestamp::new(created),
    };

    // Anything other than the open flag counts as done.
    let status = TaskStatus::from_sql(&flag).unwrap_or_else(|unknown| {
        warn!(task_id = id, error = %unknown, "treating unknown status flag as done");
        TaskStatus::Done
    });

    match status {
        TaskStatus::Open => Ok(Task::Open(open)),
        TaskStatus::Done => {
            let completed = done.ok_or_else(|| StoreError::CorruptRow {
                table: TABLE,
                column: "done",
                detail: format!("task {id} is done but has no completion time"),
            })?;
            Ok(Task::Done(open.complete(Timestamp::new(completed))))
        }
    }
}
