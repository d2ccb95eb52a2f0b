//! Task-creation form state and submission gate.
//!
//! # Responsibility
//! - Validate form fields and assemble a `TaskDraft`.
//! - Forward valid drafts to the store under an explicit session.
//!
//! # Invariants
//! - Validation runs title, then priority, then deadline; first failure wins.
//! - A draft only reaches the store after validation succeeds.
//! - Successful submission resets the transient form state to empty.

use crate::form::date_field::{parse_display, DISPLAY_PATTERN};
use crate::model::task::{Priority, TaskDraft, TaskId};
use crate::session::Session;
use crate::store::{StoreError, TaskStore};
use chrono::{DateTime, Utc};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Closed category suggestion set offered by the form; not enforced.
pub const CATEGORY_SUGGESTIONS: &[&str] = &[
    "Work",
    "Personal",
    "Shopping",
    "Health",
    "Education",
    "Other",
];

/// Per-field validation failure with a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    TitleRequired,
    PriorityRequired,
    /// Deadline text present but not a valid "dd mm yyyy" date.
    DeadlineFormat,
    /// Deadline parsed but is not strictly in the future.
    DeadlineNotFuture,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleRequired => write!(f, "Title is required"),
            Self::PriorityRequired => write!(f, "Priority is required"),
            Self::DeadlineFormat => {
                write!(f, "Invalid Deadline format. Please use: {DISPLAY_PATTERN}")
            }
            Self::DeadlineNotFuture => write!(f, "Deadline must be greater than today"),
        }
    }
}

impl Error for ValidationError {}

/// Submission failure: either a local validation error or a store failure.
#[derive(Debug)]
pub enum SubmitError {
    Validation(ValidationError),
    Store(StoreError),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SubmitError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for SubmitError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Transient field state of the task-creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    /// Raw display text kept in canonical "dd mm yyyy" form by the field.
    pub deadline_text: String,
    /// `None` until the user picks one of the three options.
    pub priority: Option<Priority>,
    pub category: String,
}

impl TaskForm {
    /// Validates the form against `now` and assembles a draft.
    ///
    /// An empty deadline text is the valid "no deadline" state; non-empty
    /// text must parse and be strictly later than `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<TaskDraft, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        let priority = self.priority.ok_or(ValidationError::PriorityRequired)?;

        let deadline = if self.deadline_text.trim().is_empty() {
            None
        } else {
            let parsed =
                parse_display(&self.deadline_text).ok_or(ValidationError::DeadlineFormat)?;
            if parsed <= now {
                return Err(ValidationError::DeadlineNotFuture);
            }
            Some(parsed)
        };

        Ok(TaskDraft {
            title: self.title.clone(),
            description: none_if_empty(&self.description),
            deadline,
            priority,
            category: none_if_empty(&self.category),
        })
    }
}

/// Controller gating creation of new tasks.
///
/// Owns the transient [`TaskForm`], a store handle and the (possibly absent)
/// session it was constructed with. The session is an explicit dependency so
/// the authentication requirement is visible in the interface.
#[derive(Debug)]
pub struct TaskFormController<S: TaskStore> {
    store: S,
    session: Option<Session>,
    pub form: TaskForm,
}

impl<S: TaskStore> TaskFormController<S> {
    pub fn new(store: S, session: Option<Session>) -> Self {
        Self {
            store,
            session,
            form: TaskForm::default(),
        }
    }

    /// Validates and submits the current form, evaluating the future-date
    /// rule against the wall clock.
    pub fn submit(&mut self) -> Result<TaskId, SubmitError> {
        self.submit_at(Utc::now())
    }

    /// Validates and submits the current form against an injected `now`.
    ///
    /// On success the form resets to empty; this is a UI-state contract, not
    /// a storage effect. Store failures surface exactly once and are never
    /// retried here.
    pub fn submit_at(&mut self, now: DateTime<Utc>) -> Result<TaskId, SubmitError> {
        let draft = self.form.validate(now)?;

        let Some(session) = self.session.as_ref() else {
            error!("event=task_submit module=form status=error error=unauthenticated");
            return Err(StoreError::Unauthenticated.into());
        };

        match self.store.create_task(session, &draft) {
            Ok(id) => {
                info!("event=task_submit module=form status=ok task={id}");
                self.form = TaskForm::default();
                Ok(id)
            }
            Err(err) => {
                error!("event=task_submit module=form status=error error={err}");
                Err(err.into())
            }
        }
    }
}

fn none_if_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
