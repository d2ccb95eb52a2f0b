//! Explicit authenticated-session context.
//!
//! # Responsibility
//! - Carry the account identity every store operation is scoped to.
//!
//! # Invariants
//! - There is no ambient "current user" lookup anywhere in core; callers
//!   that need authentication take a `Session` (or `Option<Session>`) in
//!   their interface.

/// Authenticated account context.
///
/// Constructed by the authentication layer after login and passed explicitly
/// into the form controller, the list subscription setup, and every store
/// call. An absent session (`Option::None`) is the unauthenticated state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    account_id: String,
}

impl Session {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
        }
    }

    /// Opaque account identifier that partitions the task collection.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}
