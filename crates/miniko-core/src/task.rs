//! Task lifecycle types.
//!
//! ```text
//! Open ──complete──▶ Done
//!   │                  │
//!   └──delete──▶ (removed) ◀──delete──┘
//! ```
//!
//! There is no transition from `Done` back to `Open`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::TaskId;
use crate::timestamp::Timestamp;

/// Lifecycle state of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Recorded but not finished.
    Open,
    /// Finished; carries a completion timestamp.
    Done,
}

/// A status flag that is neither `Y` nor `N`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task status flag: {0:?}")]
pub struct UnknownStatus(pub String);

impl TaskStatus {
    /// The `is_done` column value for this status.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Open => "N",
            Self::Done => "Y",
        }
    }

    /// Parse an `is_done` column value.
    pub fn from_sql(flag: &str) -> Result<Self, UnknownStatus> {
        match flag {
            "N" => Ok(Self::Open),
            "Y" => Ok(Self::Done),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// A task that has not been completed yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTask {
    /// Store-assigned id.
    pub id: TaskId,
    /// Entry text, fixed at creation.
    pub description: String,
    /// When the entry was recorded.
    pub created_at: Timestamp,
}

impl OpenTask {
    /// Finish this task. The id, description and creation time carry over.
    pub fn complete(self, completed_at: Timestamp) -> DoneTask {
        DoneTask {
            id: self.id,
            description: self.description,
            created_at: self.created_at,
            completed_at,
        }
    }
}

/// A completed task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoneTask {
    /// Store-assigned id.
    pub id: TaskId,
    /// Entry text, fixed at creation.
    pub description: String,
    /// When the entry was recorded.
    pub created_at: Timestamp,
    /// When the entry was marked done.
    pub completed_at: Timestamp,
}

/// Either state of a task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Task {
    /// Not finished yet.
    Open(OpenTask),
    /// Finished.
    Done(DoneTask),
}

impl Task {
    /// Store-assigned id.
    pub fn id(&self) -> TaskId {
        match self {
            Self::Open(t) => t.id,
            Self::Done(t) => t.id,
        }
    }

    /// Entry text.
    pub fn description(&self) -> &str {
        match self {
            Self::Open(t) => &t.description,
            Self::Done(t) => &t.description,
        }
    }

    /// Creation time.
    pub fn created_at(&self) -> &Timestamp {
        match self {
            Self::Open(t) => &t.created_at,
            Self::Done(t) => &t.created_at,
        }
    }

    /// Completion time; `None` for open tasks.
    pub fn completed_at(&self) -> Option<&Timestamp> {
        match self {
            Self::Open(_) => None,
            Self::Done(t) => Some(&t.completed_at),
        }
    }

    /// Which lifecycle state this task is in.
    pub fn status(&self) -> TaskStatus {
        match self {
            Self::Open(_) => TaskStatus::Open,
            Self::Done(_) => TaskStatus::Done,
        }
    }
}

impl From<OpenTask> for Task {
    fn from(task: OpenTask) -> Self {
        Self::Open(task)
    }
}

impl From<DoneTask> for Task {
    fn from(task: DoneTask) -> Self {
        Self::Done(task)
    }
}

/// All tasks in the journal, split by status.
///
/// Each list keeps store order (creation order).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListing {
    /// Tasks still to do.
    pub open: Vec<OpenTask>,
    /// Finished tasks.
    pub done: Vec<DoneTask>,
}

impl TaskListing {
    /// Route a task into the list matching its status.
    pub fn push(&mut self, task: Task) {
        match task {
            Task::Open(t) => self.open.push(t),
            Task::Done(t) => self.done.push(t),
        }
    }

    /// Whether both lists are empty.
    pub fn is_empty(&self) -> bool {
        self.open.is_empty() && self.done.is_empty()
    }

    /// Total number of tasks.
    pub fn len(&self) -> usize {
        self.open.len() + self.done.len()
    }

    /// Whether `id` appears in either list.
    pub fn contains(&self, id: TaskId) -> bool {
        self.open.iter().any(|t| t.id == id) || self.done.iter().any(|t| t.id == id)
    }
}
