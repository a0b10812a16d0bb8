//! # miniko-core
//!
//! Domain types for the miniko task journal.
//!
//! A task is either open or done. The two states are modelled as separate
//! structs ([`OpenTask`], [`DoneTask`]) so a completion timestamp can only
//! exist on a finished task.

#![deny(unsafe_code)]

pub mod ids;
pub mod task;
pub mod timestamp;

pub use ids::TaskId;
pub use task::{DoneTask, OpenTask, Task, TaskListing, TaskStatus, UnknownStatus};
pub use timestamp::Timestamp;
