//! Domain model for per-account tasks.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, form and list view.
//! - Keep one shape for both persisted rows and pushed snapshots.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId` assigned at creation.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod task;
