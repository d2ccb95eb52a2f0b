//! List presentation logic.
//!
//! # Responsibility
//! - Derive the ordered, filtered task list from the latest snapshot.
//! - Compute human-readable deadline labels.
//!
//! # Invariants
//! - Derivation is a pure function of (snapshot, filter, sort key).
//! - Every pushed snapshot replaces the in-memory set wholesale.

pub mod encouragement;
pub mod task_list;
