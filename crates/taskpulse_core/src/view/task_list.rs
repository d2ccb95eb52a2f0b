//! Task list derivation and deadline bucketing.
//!
//! # Responsibility
//! - Turn the live full task set into the ordered list for display.
//! - Bucket deadlines into relative labels ("Today", "In 3 days", ...).
//!
//! # Invariants
//! - Sorting is stable; equal keys keep their snapshot order.
//! - Completed tasks sort after incomplete ones regardless of sort key.
//! - A missing deadline sorts last (treated as positive infinity).

use crate::model::task::TaskRecord;
use crate::session::Session;
use crate::store::{Subscription, TaskStore};
use chrono::{DateTime, Datelike, Utc};
use std::sync::{Arc, Mutex};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Completion filter applied before sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Completed,
    Pending,
}

/// Sort key applied within equal completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Deadline,
    Priority,
}

/// Derives the displayed list from a raw snapshot.
///
/// Filters by completion state, then stable-sorts with completion as the
/// primary key (incomplete first). Within equal completion state the
/// `Priority` key orders High, Medium, Low; the `Deadline` key orders
/// ascending with missing deadlines last.
pub fn derive_visible(
    tasks: &[TaskRecord],
    filter: TaskFilter,
    sort_key: SortKey,
) -> Vec<TaskRecord> {
    let mut visible: Vec<TaskRecord> = tasks
        .iter()
        .filter(|task| match filter {
            TaskFilter::All => true,
            TaskFilter::Completed => task.completed,
            TaskFilter::Pending => !task.completed,
        })
        .cloned()
        .collect();

    // sort_by_key is stable, which is part of the contract here.
    visible.sort_by_key(|task| sort_rank(task, sort_key));
    visible
}

fn sort_rank(task: &TaskRecord, sort_key: SortKey) -> (bool, i64) {
    let within = match sort_key {
        SortKey::Priority => i64::from(task.priority.rank()),
        SortKey::Deadline => task
            .deadline
            .map_or(i64::MAX, |deadline| deadline.timestamp_millis()),
    };
    (task.completed, within)
}

/// Relative label for an optional deadline; a missing deadline yields an
/// empty label, never an error.
pub fn deadline_label(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    deadline.map_or_else(String::new, |deadline| format_deadline_label(deadline, now))
}

/// Buckets a deadline by the whole-day ceiling of its distance from `now`.
///
/// Negative -> "Overdue", 0 -> "Today", 1 -> "Tomorrow", 2..=7 ->
/// "In N days", beyond that an abbreviated month/day, with the year added
/// only when it differs from `now`'s year.
pub fn format_deadline_label(deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = days_until_ceil(deadline, now);
    if days < 0 {
        "Overdue".to_string()
    } else if days == 0 {
        "Today".to_string()
    } else if days == 1 {
        "Tomorrow".to_string()
    } else if days <= 7 {
        format!("In {days} days")
    } else if deadline.year() != now.year() {
        deadline.format("%b %-d, %Y").to_string()
    } else {
        deadline.format("%b %-d").to_string()
    }
}

/// Whole-day ceiling of `deadline - now`, rounding toward positive infinity
/// so a deadline later today still counts as day 0, not day -1.
fn days_until_ceil(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (deadline - now).num_milliseconds();
    millis.div_euclid(MILLIS_PER_DAY) + i64::from(millis.rem_euclid(MILLIS_PER_DAY) > 0)
}

#[derive(Debug, Default)]
struct ListState {
    tasks: Vec<TaskRecord>,
    filter: TaskFilter,
    sort_key: SortKey,
}

/// View model deriving the visible list from the latest pushed snapshot.
///
/// Clones share state, so a clone can be moved into the store's snapshot
/// callback while the original stays with the view.
#[derive(Debug, Clone, Default)]
pub struct TaskListViewModel {
    state: Arc<Mutex<ListState>>,
}

impl TaskListViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires the store's push channel into this view model.
    ///
    /// The returned handle scopes the listener to the owning view; dropping
    /// it tears the subscription down. Subscribing without a session leaves
    /// the list empty (the store pushes one empty set and logs the error).
    pub fn attach<S: TaskStore>(&self, store: &S, session: Option<&Session>) -> Subscription {
        let receiver = self.clone();
        store.subscribe(session, Box::new(move |tasks| receiver.apply_snapshot(tasks)))
    }

    /// Replaces the in-memory set wholesale with a pushed snapshot.
    pub fn apply_snapshot(&self, tasks: Vec<TaskRecord>) {
        self.lock_state().tasks = tasks;
    }

    pub fn filter(&self) -> TaskFilter {
        self.lock_state().filter
    }

    pub fn set_filter(&self, filter: TaskFilter) {
        self.lock_state().filter = filter;
    }

    pub fn sort_key(&self) -> SortKey {
        self.lock_state().sort_key
    }

    pub fn set_sort_key(&self, sort_key: SortKey) {
        self.lock_state().sort_key = sort_key;
    }

    /// Ordered, filtered list for display, derived from the latest snapshot.
    pub fn visible_tasks(&self) -> Vec<TaskRecord> {
        let state = self.lock_state();
        derive_visible(&state.tasks, state.filter, state.sort_key)
    }

    /// Number of tasks under the active filter, shown in the list header.
    pub fn visible_count(&self) -> usize {
        self.visible_tasks().len()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ListState> {
        self.state.lock().expect("task list state lock poisoned")
    }
}
