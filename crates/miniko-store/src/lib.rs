//! # miniko-store
//!
//! `SQLite` persistence for the task journal.
//!
//! Every [`TaskStore`] operation runs inside its own [`Session`]: a fresh
//! connection and transaction that commits when the operation succeeds,
//! rolls back when it fails, and is closed before control returns.

#![deny(unsafe_code)]

pub mod error;
pub mod row_helpers;
pub mod schema;
pub mod session;
pub mod task_store;

pub use error::StoreError;
pub use session::Session;
pub use task_store::TaskStore;
