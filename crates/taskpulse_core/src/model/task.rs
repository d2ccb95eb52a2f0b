//! Task domain model.
//!
//! # Responsibility
//! - Define `TaskRecord` as stored and pushed in snapshots.
//! - Define `TaskDraft` as assembled by the creation form.
//!
//! # Invariants
//! - `id` is stable and never reused within an account.
//! - `completed` starts `false` and changes only through the explicit toggle.
//! - `deadline`, once past, is never revalidated; it renders as "Overdue".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task, assigned by the store on creation.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Required urgency level of a task.
///
/// Ordering for display is High before Medium before Low; see [`Priority::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Sort rank within the task list: lower ranks sort earlier.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Display / wire label, matching the form's selection options.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Parses a persisted or user-selected priority label.
    ///
    /// Returns `None` for unrecognized labels; callers on the read path
    /// degrade those to [`Priority::Low`] rather than failing the snapshot.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }
}

/// Canonical task record, owned exclusively by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Store-assigned stable ID.
    pub id: TaskId,
    /// Non-empty title; enforced at the form boundary, not here.
    pub title: String,
    /// Optional free-form detail text.
    pub description: Option<String>,
    /// Optional due instant; strictly future at creation time only.
    pub deadline: Option<DateTime<Utc>>,
    pub priority: Priority,
    /// Optional label from a closed suggestion set; not enforced.
    pub category: Option<String>,
    /// Flipped only via the explicit completion toggle.
    pub completed: bool,
    /// Store-assigned creation instant; default list order and tie-break.
    pub created_at: DateTime<Utc>,
}

/// Pre-creation task shape produced by the form.
///
/// The store assigns `id` and `created_at` and initializes `completed` to
/// `false` when the draft is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub category: Option<String>,
}
