//! Domain model for habits and their per-date completion logs.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep request-shaped write models separate from stored records.
//!
//! # Invariants
//! - Every stored record is identified by a database-generated integer id.
//! - Hiding a habit is represented by the `is_active` flag, not hard delete.

pub mod habit;
pub mod habit_log;
