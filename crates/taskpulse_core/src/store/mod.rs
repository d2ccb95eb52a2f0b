//! Task store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define the per-account task collection API consumed by form and view.
//! - Define the push-based snapshot subscription channel.
//!
//! # Invariants
//! - Every operation is scoped to an explicit [`Session`]; there is no
//!   ambient account lookup.
//! - Subscriptions always deliver the complete current set, never a diff.
//! - An absent session surfaces as `StoreError::Unauthenticated` before any
//!   mutating call is made; `subscribe` degrades to one empty push instead.

use crate::db::DbError;
use crate::model::task::{TaskDraft, TaskId, TaskRecord};
use crate::session::Session;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

mod sqlite;

pub use sqlite::SqliteTaskStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Snapshot consumer registered through [`TaskStore::subscribe`].
///
/// Receives the full current task set of the subscribed account, ordered by
/// `created_at` descending.
pub type SnapshotCallback = Box<dyn FnMut(Vec<TaskRecord>) + Send>;

/// Store error taxonomy for task persistence and subscription operations.
#[derive(Debug)]
pub enum StoreError {
    /// No authenticated session; the shell should route back to login.
    Unauthenticated,
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "user not authenticated; please login again"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unauthenticated | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Per-account task collection with a push-based change channel.
///
/// # Contract
/// - `create_task` assigns `id` and `created_at` and stores `completed=false`.
/// - Every successful mutation pushes a fresh full snapshot to all listeners
///   registered for the affected account.
/// - `subscribe` without a session logs an error, delivers one empty set and
///   returns an inert handle instead of failing.
pub trait TaskStore {
    fn create_task(&self, session: &Session, draft: &TaskDraft) -> StoreResult<TaskId>;

    /// Field-level completion patch. Writing the current value again is
    /// observably a no-op but still issues a write and pushes a snapshot.
    fn set_completed(&self, session: &Session, id: TaskId, completed: bool) -> StoreResult<()>;

    /// Permanent delete; confirmation prompts are a presentation concern.
    fn delete_task(&self, session: &Session, id: TaskId) -> StoreResult<()>;

    /// Full current set, ordered by `created_at` descending (id ascending
    /// tie-break).
    fn snapshot(&self, session: &Session) -> StoreResult<Vec<TaskRecord>>;

    /// Registers a snapshot listener scoped to the session's account.
    ///
    /// The current set is pushed immediately, then again after every change.
    /// The listener stays registered until the returned handle is dropped or
    /// explicitly unsubscribed.
    fn subscribe(&self, session: Option<&Session>, on_snapshot: SnapshotCallback) -> Subscription;
}

/// Disposable handle for an active snapshot listener.
///
/// Dropping the handle tears the listener down, so scoping it to the owning
/// view guarantees release when the view or session ends.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle with nothing to release, returned for unauthenticated
    /// subscribe attempts.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    /// Whether this handle still holds a live listener registration.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Explicit teardown; equivalent to dropping the handle.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
