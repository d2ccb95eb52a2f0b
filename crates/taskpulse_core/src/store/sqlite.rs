//! SQLite-backed task store.
//!
//! # Responsibility
//! - Persist per-account task rows and answer full-set snapshot queries.
//! - Fan pushed snapshots out to the registered listeners of an account.
//!
//! # Invariants
//! - Mutations touch only rows of the session's account.
//! - Listeners are notified after the write commits, never before.
//! - Snapshot callbacks run without the registry lock held, so a callback
//!   may drop or unsubscribe any handle on this store.
//! - Read paths reject corrupt rows instead of masking them, except for
//!   unrecognized priority labels which degrade to `Low`.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::task::{Priority, TaskDraft, TaskId, TaskRecord};
use crate::session::Session;
use crate::store::{
    SnapshotCallback, StoreError, StoreResult, Subscription, TaskStore,
};
use chrono::{DateTime, TimeZone, Utc};
use log::{error, info, warn};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    description,
    deadline_ms,
    priority,
    category,
    completed,
    created_at_ms
FROM tasks";

/// SQLite implementation of [`TaskStore`].
///
/// Cheap to clone; clones share one connection and one listener registry, so
/// the form controller and the list view can each own a handle.
#[derive(Clone)]
pub struct SqliteTaskStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    conn: Mutex<Connection>,
    listeners: Mutex<ListenerRegistry>,
    next_listener_id: AtomicU64,
}

#[derive(Default)]
struct ListenerRegistry {
    entries: Vec<ListenerEntry>,
    /// Ids cancelled while their entry was out of the registry for a
    /// delivery batch; consumed when the batch re-inserts survivors.
    cancelled: Vec<u64>,
}

struct ListenerEntry {
    id: u64,
    account_id: String,
    on_snapshot: SnapshotCallback,
}

impl SqliteTaskStore {
    /// Wraps an already-bootstrapped connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                conn: Mutex::new(conn),
                listeners: Mutex::new(ListenerRegistry::default()),
                next_listener_id: AtomicU64::new(1),
            }),
        }
    }

    /// Opens (or creates) the store database at `path` and runs migrations.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens an in-memory store, used by tests and previews.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn snapshot_for(&self, account_id: &str) -> StoreResult<Vec<TaskRecord>> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE account_id = ?1
             ORDER BY created_at_ms DESC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([account_id])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    /// Pushes a fresh snapshot to every listener of `account_id`.
    ///
    /// A failing snapshot query degrades to an empty set so the subscription
    /// channel itself never errors out. Matching listeners are taken out of
    /// the registry before their callbacks run, so a callback may drop or
    /// unsubscribe any handle on this store without re-entering the lock; an
    /// id cancelled while out for delivery is tombstoned and its entry is
    /// not re-inserted.
    fn notify(&self, account_id: &str) {
        let tasks = match self.snapshot_for(account_id) {
            Ok(tasks) => tasks,
            Err(err) => {
                error!("event=snapshot_push module=store status=error error={err}");
                Vec::new()
            }
        };

        let mut batch = {
            let mut registry = self.lock_listeners();
            let entries = std::mem::take(&mut registry.entries);
            let (batch, kept): (Vec<ListenerEntry>, Vec<ListenerEntry>) = entries
                .into_iter()
                .partition(|entry| entry.account_id == account_id);
            registry.entries = kept;
            batch
        };

        for entry in batch.iter_mut() {
            (entry.on_snapshot)(tasks.clone());
        }

        let mut registry = self.lock_listeners();
        for entry in batch {
            if let Some(position) = registry
                .cancelled
                .iter()
                .position(|&cancelled_id| cancelled_id == entry.id)
            {
                registry.cancelled.swap_remove(position);
            } else {
                registry.entries.push(entry);
            }
        }
    }

    fn lock_conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.inner.conn.lock().expect("store connection lock poisoned")
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, ListenerRegistry> {
        self.inner.listeners.lock().expect("store listener registry poisoned")
    }
}

impl TaskStore for SqliteTaskStore {
    fn create_task(&self, session: &Session, draft: &TaskDraft) -> StoreResult<TaskId> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        {
            let conn = self.lock_conn();
            conn.execute(
                "INSERT INTO tasks (
                    uuid,
                    account_id,
                    title,
                    description,
                    deadline_ms,
                    priority,
                    category,
                    completed,
                    created_at_ms
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8);",
                params![
                    id.to_string(),
                    session.account_id(),
                    draft.title.as_str(),
                    draft.description.as_deref(),
                    draft.deadline.map(|deadline| deadline.timestamp_millis()),
                    draft.priority.as_str(),
                    draft.category.as_deref(),
                    created_at.timestamp_millis(),
                ],
            )?;
        }

        info!(
            "event=task_create module=store status=ok account={} task={id}",
            session.account_id()
        );
        self.notify(session.account_id());
        Ok(id)
    }

    fn set_completed(&self, session: &Session, id: TaskId, completed: bool) -> StoreResult<()> {
        let changed = {
            let conn = self.lock_conn();
            conn.execute(
                "UPDATE tasks
                 SET completed = ?1
                 WHERE uuid = ?2 AND account_id = ?3;",
                params![
                    i64::from(completed),
                    id.to_string(),
                    session.account_id()
                ],
            )?
        };

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        info!(
            "event=task_toggle module=store status=ok account={} task={id} completed={completed}",
            session.account_id()
        );
        self.notify(session.account_id());
        Ok(())
    }

    fn delete_task(&self, session: &Session, id: TaskId) -> StoreResult<()> {
        let changed = {
            let conn = self.lock_conn();
            conn.execute(
                "DELETE FROM tasks WHERE uuid = ?1 AND account_id = ?2;",
                params![id.to_string(), session.account_id()],
            )?
        };

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        info!(
            "event=task_delete module=store status=ok account={} task={id}",
            session.account_id()
        );
        self.notify(session.account_id());
        Ok(())
    }

    fn snapshot(&self, session: &Session) -> StoreResult<Vec<TaskRecord>> {
        self.snapshot_for(session.account_id())
    }

    fn subscribe(
        &self,
        session: Option<&Session>,
        mut on_snapshot: SnapshotCallback,
    ) -> Subscription {
        let Some(session) = session else {
            error!("event=subscribe module=store status=error error=unauthenticated");
            on_snapshot(Vec::new());
            return Subscription::inert();
        };

        // Initial push happens before registration so the listener never
        // observes a change-notification ahead of its first full set.
        match self.snapshot_for(session.account_id()) {
            Ok(tasks) => on_snapshot(tasks),
            Err(err) => {
                error!("event=subscribe module=store status=error error={err}");
                on_snapshot(Vec::new());
            }
        }

        let listener_id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.lock_listeners().entries.push(ListenerEntry {
            id: listener_id,
            account_id: session.account_id().to_string(),
            on_snapshot,
        });
        info!(
            "event=subscribe module=store status=ok account={} listener={listener_id}",
            session.account_id()
        );

        let registry = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = registry.upgrade() {
                let mut registry = inner
                    .listeners
                    .lock()
                    .expect("store listener registry poisoned");
                let before = registry.entries.len();
                registry.entries.retain(|entry| entry.id != listener_id);
                if registry.entries.len() == before {
                    // Entry is out for a delivery batch; tombstone the id so
                    // the batch does not re-insert it.
                    registry.cancelled.push(listener_id);
                }
            }
        })
    }
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<TaskRecord> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in tasks.uuid"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = Priority::parse(&priority_text).unwrap_or_else(|| {
        // Rows written by older clients may carry labels this build does not
        // know; the list pipeline sorts those as Low, so read them as Low.
        warn!(
            "event=snapshot_row module=store status=degraded task={id} priority={priority_text}"
        );
        Priority::Low
    });

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    let deadline = row
        .get::<_, Option<i64>>("deadline_ms")?
        .map(|ms| instant_from_millis(ms, "tasks.deadline_ms"))
        .transpose()?;
    let created_at = instant_from_millis(row.get("created_at_ms")?, "tasks.created_at_ms")?;

    Ok(TaskRecord {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        deadline,
        priority,
        category: row.get("category")?,
        completed,
        created_at,
    })
}

fn instant_from_millis(ms: i64, column: &str) -> StoreResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single().ok_or_else(|| {
        StoreError::InvalidData(format!("invalid timestamp `{ms}` in {column}"))
    })
}
