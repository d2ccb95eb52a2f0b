//! Core domain logic for TaskPulse.
//! This crate is the single source of truth for task-list business invariants.

pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod session;
pub mod store;
pub mod view;

pub use form::controller::{
    SubmitError, TaskForm, TaskFormController, ValidationError, CATEGORY_SUGGESTIONS,
};
pub use form::date_field::{format_keystrokes, parse_display, DISPLAY_PATTERN};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Priority, TaskDraft, TaskId, TaskRecord};
pub use session::Session;
pub use store::{
    SnapshotCallback, SqliteTaskStore, StoreError, StoreResult, Subscription, TaskStore,
};
pub use view::encouragement::{encouraging_message, ENCOURAGING_MESSAGES};
pub use view::task_list::{
    deadline_label, derive_visible, format_deadline_label, SortKey, TaskFilter, TaskListViewModel,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
