//! Core domain logic for the habits tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::habit::{Habit, HabitId, HabitValidationError, NewHabit};
pub use model::habit_log::{HabitLog, HabitLogId, NewHabitLog};
pub use repo::habit_repo::{HabitRepository, RepoError, RepoResult, SqliteHabitRepository};
pub use repo::log_repo::{HabitLogRepository, SqliteHabitLogRepository};
pub use service::habit_service::HabitService;
pub use service::log_service::HabitLogService;

/// Application name reported by the liveness endpoint.
pub const APP_NAME: &str = "habits";

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "ok"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
