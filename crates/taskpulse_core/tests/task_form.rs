use chrono::{DateTime, TimeZone, Utc};
use taskpulse_core::{
    Priority, Session, SqliteTaskStore, StoreError, SubmitError, TaskForm, TaskFormController,
    TaskStore, ValidationError,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
}

fn filled_form() -> TaskForm {
    TaskForm {
        title: "Buy milk".to_string(),
        priority: Some(Priority::High),
        ..TaskForm::default()
    }
}

#[test]
fn blank_title_is_rejected_first() {
    let form = TaskForm {
        title: "   ".to_string(),
        priority: None,
        ..TaskForm::default()
    };

    // Title and priority are both missing; title wins.
    let err = form.validate(fixed_now()).unwrap_err();
    assert_eq!(err, ValidationError::TitleRequired);
    assert_eq!(err.to_string(), "Title is required");
}

#[test]
fn missing_priority_is_rejected() {
    let form = TaskForm {
        title: "Buy milk".to_string(),
        ..TaskForm::default()
    };

    let err = form.validate(fixed_now()).unwrap_err();
    assert_eq!(err, ValidationError::PriorityRequired);
    assert_eq!(err.to_string(), "Priority is required");
}

#[test]
fn unparseable_deadline_text_is_a_format_error() {
    let mut form = filled_form();
    form.deadline_text = "31 04 2025".to_string();

    let err = form.validate(fixed_now()).unwrap_err();
    assert_eq!(err, ValidationError::DeadlineFormat);
    assert!(err.to_string().contains("dd mm yyyy"));
}

#[test]
fn past_deadline_is_a_distinct_future_error() {
    let mut form = filled_form();
    form.deadline_text = "01 01 2025".to_string();

    let err = form.validate(fixed_now()).unwrap_err();
    assert_eq!(err, ValidationError::DeadlineNotFuture);
    assert_ne!(
        err.to_string(),
        ValidationError::DeadlineFormat.to_string()
    );
}

#[test]
fn deadline_equal_to_now_is_blocked() {
    let mut form = filled_form();
    form.deadline_text = "01 06 2025".to_string();
    // Parsed deadlines anchor at noon; make "now" exactly that instant.
    let noon = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    let err = form.validate(noon).unwrap_err();
    assert_eq!(err, ValidationError::DeadlineNotFuture);

    let just_before = Utc.with_ymd_and_hms(2025, 6, 1, 11, 59, 59).unwrap();
    let draft = form.validate(just_before).expect("strictly future deadline");
    assert_eq!(draft.deadline, Some(noon));
}

#[test]
fn empty_deadline_text_means_no_deadline() {
    let draft = filled_form().validate(fixed_now()).expect("valid form");
    assert_eq!(draft.deadline, None);
    assert_eq!(draft.description, None);
    assert_eq!(draft.category, None);
}

#[test]
fn submit_requires_a_session() {
    let store = SqliteTaskStore::open_in_memory().unwrap();
    let mut controller = TaskFormController::new(store, None);
    controller.form = filled_form();

    let err = controller.submit_at(fixed_now()).unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Store(StoreError::Unauthenticated)
    ));
    // A failed submission keeps the user's input.
    assert_eq!(controller.form, filled_form());
}

#[test]
fn validation_failure_blocks_submission_before_any_store_call() {
    let store = SqliteTaskStore::open_in_memory().unwrap();
    let session = Session::new("account-1");
    let mut controller = TaskFormController::new(store.clone(), Some(session.clone()));
    controller.form.priority = Some(Priority::Low);

    let err = controller.submit_at(fixed_now()).unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::TitleRequired)
    ));
    assert!(store.snapshot(&session).unwrap().is_empty());
}

#[test]
fn successful_submit_persists_the_draft_and_resets_the_form() {
    let store = SqliteTaskStore::open_in_memory().unwrap();
    let session = Session::new("account-1");
    let mut controller = TaskFormController::new(store.clone(), Some(session.clone()));
    controller.form = TaskForm {
        title: "Plan trip".to_string(),
        description: "Book the hotel".to_string(),
        deadline_text: "15 08 2025".to_string(),
        priority: Some(Priority::Medium),
        category: "Personal".to_string(),
    };

    let id = controller.submit_at(fixed_now()).expect("valid submission");

    let tasks = store.snapshot(&session).unwrap();
    assert_eq!(tasks.len(), 1);
    let task = &tasks[0];
    assert_eq!(task.id, id);
    assert_eq!(task.title, "Plan trip");
    assert_eq!(task.description.as_deref(), Some("Book the hotel"));
    assert_eq!(
        task.deadline,
        Some(Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).unwrap())
    );
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.category.as_deref(), Some("Personal"));
    assert!(!task.completed);

    assert_eq!(controller.form, TaskForm::default());
}

#[test]
fn title_whitespace_is_validated_but_not_trimmed_away() {
    let form = TaskForm {
        title: "  Buy milk  ".to_string(),
        priority: Some(Priority::Low),
        ..TaskForm::default()
    };

    let draft = form.validate(fixed_now()).expect("non-blank title");
    assert_eq!(draft.title, "  Buy milk  ");
}
