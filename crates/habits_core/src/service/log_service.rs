//! Habit-log use-case service.
//!
//! # Responsibility
//! - Provide completion-log entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Duplicate (habit, date) writes surface as `DuplicateLog` unchanged.
//! - Log list order is always `date DESC, id ASC`.

use crate::model::habit::HabitId;
use crate::model::habit_log::{HabitLog, HabitLogId, NewHabitLog};
use crate::repo::habit_repo::RepoResult;
use crate::repo::log_repo::HabitLogRepository;
use chrono::NaiveDate;

/// Use-case service wrapper for habit-log CRUD operations.
pub struct HabitLogService<R: HabitLogRepository> {
    repo: R,
}

impl<R: HabitLogRepository> HabitLogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new log through repository persistence.
    pub fn create_log(&self, new: &NewHabitLog) -> RepoResult<HabitLog> {
        self.repo.create_log(new)
    }

    /// Records a completion state for one habit on one calendar date.
    ///
    /// # Contract
    /// - Fails with `DuplicateLog` when a log already exists for the pair.
    /// - Fails with `MissingHabit` when the habit id is dangling.
    pub fn record_completion(
        &self,
        habit_id: HabitId,
        date: NaiveDate,
        done: bool,
    ) -> RepoResult<HabitLog> {
        let mut new = NewHabitLog::new(habit_id, date);
        new.done = done;
        self.repo.create_log(&new)
    }

    /// Gets one log by id.
    pub fn get_log(&self, id: HabitLogId) -> RepoResult<Option<HabitLog>> {
        self.repo.get_log(id)
    }

    /// Lists all logs, newest date first.
    pub fn list_logs(&self) -> RepoResult<Vec<HabitLog>> {
        self.repo.list_logs()
    }

    /// Updates an existing log by stable id.
    pub fn update_log(&self, id: HabitLogId, new: &NewHabitLog) -> RepoResult<()> {
        self.repo.update_log(id, new)
    }

    /// Removes one log unconditionally.
    pub fn delete_log(&self, id: HabitLogId) -> RepoResult<()> {
        self.repo.delete_log(id)
    }
}
