//! Task-creation form logic.
//!
//! # Responsibility
//! - Normalize and validate the deadline text input.
//! - Gate task submission behind field validation and an explicit session.
//!
//! # Invariants
//! - Validation is fully local; an invalid form never reaches the store.

pub mod controller;
pub mod date_field;
