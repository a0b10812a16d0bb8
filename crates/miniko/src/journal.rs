//! The journal front-end service.
//!
//! Sits between user input and [`TaskStore`]: rejects blank entries and
//! stamps creation and completion times from a [`Clock`].

use miniko_core::{OpenTask, Task, TaskId, TaskListing, Timestamp};
use miniko_store::{StoreError, TaskStore};
use tracing::{info, warn};

/// Source of timestamps for new and completed entries.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Local wall-clock time in a fixed `chrono` format.
#[derive(Clone, Debug)]
pub struct SystemClock {
    format: String,
}

impl SystemClock {
    /// `format` must be a valid strftime string; settings validation
    /// guarantees this for configured formats.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(chrono::Local::now().format(&self.format).to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("task description must not be empty")]
    EmptyDescription,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What [`Journal::delete`] removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removed {
    /// A readable task, as it was just before deletion.
    Task(Task),
    /// A row that could not be read as a task; only its id is known.
    Unreadable(TaskId),
}

pub struct Journal<C> {
    store: TaskStore,
    clock: C,
}

impl<C: Clock> Journal<C> {
    pub fn new(store: TaskStore, clock: C) -> Self {
        Self { store, clock }
    }

    /// Record a new entry. Surrounding whitespace is trimmed; text that is
    /// blank after trimming is rejected before touching the store.
    pub fn add(&self, text: &str) -> Result<OpenTask, JournalError> {
        let description = text.trim();
        if description.is_empty() {
            return Err(JournalError::EmptyDescription);
        }

        let created_at = self.clock.now();
        let id = self.store.create_task(description, &created_at)?;
        info!(task_id = %id, "task added");

        Ok(OpenTask {
            id,
            description: description.to_string(),
            created_at,
        })
    }

    /// Mark `id` done now. Returns the task as stored afterwards, or `None`
    /// when no such task exists. An already finished task comes back with
    /// its original completion time.
    pub fn complete(&self, id: TaskId) -> Result<Option<Task>, JournalError> {
        let completed_at = self.clock.now();
        let _ = self.store.complete_task(id, &completed_at)?;
        Ok(self.store.get_task(id)?)
    }

    /// Delete `id`, returning what was removed.
    ///
    /// A row too damaged to read is still deleted, so a bad entry can
    /// always be cleared from the journal.
    pub fn delete(&self, id: TaskId) -> Result<Option<Removed>, JournalError> {
        let existing = match self.store.get_task(id) {
            Ok(task) => task.map(Removed::Task),
            Err(err @ StoreError::CorruptRow { .. }) => {
                warn!(task_id = %id, error = %err, "deleting unreadable task row");
                Some(Removed::Unreadable(id))
            }
            Err(err) => return Err(err.into()),
        };
        let _ = self.store.delete_task(id)?;
        if existing.is_some() {
            info!(task_id = %id, "task deleted");
        }
        Ok(existing)
    }

    pub fn listing(&self) -> Result<TaskListing, JournalError> {
        Ok(self.store.list_tasks()?)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Hands out preset timestamps in order, repeating the last one.
    pub struct FixedClock {
        ticks: RefCell<VecDeque<&'static str>>,
        last: RefCell<&'static str>,
    }

    impl FixedClock {
        pub fn new(ticks: &[&'static str]) -> Self {
            Self {
                ticks: RefCell::new(ticks.iter().copied().collect()),
                last: RefCell::new("1970/01/01, 00:00"),
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            if let Some(tick) = self.ticks.borrow_mut().pop_front() {
                *self.last.borrow_mut() = tick;
            }
            Timestamp::new(*self.last.borrow())
        }
    }

    pub fn journal(ticks: &[&'static str]) -> (tempfile::TempDir, Journal<FixedClock>) {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::initialize(dir.path().join("miniko.db")).unwrap();
        (dir, Journal::new(store, FixedClock::new(ticks)))
    }

    /// Run raw SQL against the journal's file, bypassing the store.
    pub fn insert_raw<C>(journal: &Journal<C>, sql: &str) {
        miniko_store::Session::scope(journal.store.path(), |tx| {
            tx.execute_batch(sql)?;
            Ok(())
        })
        .unwrap();
    }
}
