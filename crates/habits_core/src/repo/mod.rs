//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must validate models before persistence.
//! - Uniqueness and referential integrity are enforced by the schema, never
//!   checked-then-acted in application code.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateLog`,
//!   `HabitInUse`) in addition to DB transport errors.

pub mod habit_repo;
pub mod log_repo;
