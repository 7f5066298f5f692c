//! Habit use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::habit::{Habit, HabitId, NewHabit};
use crate::repo::habit_repo::{HabitRepository, RepoError, RepoResult};

/// Use-case service wrapper for habit CRUD operations.
pub struct HabitService<R: HabitRepository> {
    repo: R,
}

impl<R: HabitRepository> HabitService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new habit through repository persistence.
    pub fn create_habit(&self, new: &NewHabit) -> RepoResult<Habit> {
        self.repo.create_habit(new)
    }

    /// Creates a habit from title/description input with default visibility.
    ///
    /// # Contract
    /// - `is_active` starts as `true`.
    /// - Returns the stored row with generated id and creation timestamp.
    pub fn add_habit(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> RepoResult<Habit> {
        let mut new = NewHabit::new(title);
        new.content = content.into();
        self.repo.create_habit(&new)
    }

    /// Gets one habit by id with optional inactive-row visibility.
    pub fn get_habit(&self, id: HabitId, active_only: bool) -> RepoResult<Option<Habit>> {
        self.repo.get_habit(id, active_only)
    }

    /// Lists habits, optionally restricted to active ones.
    pub fn list_habits(&self, active_only: bool) -> RepoResult<Vec<Habit>> {
        self.repo.list_habits(active_only)
    }

    /// Updates an existing habit by stable id.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update_habit(&self, habit: &Habit) -> RepoResult<()> {
        self.repo.update_habit(habit)
    }

    /// Hides a habit from default listings by clearing `is_active`.
    ///
    /// The row is kept; detail reads through the active-only filter report it
    /// as absent afterwards.
    pub fn deactivate_habit(&self, id: HabitId) -> RepoResult<Habit> {
        let mut habit = self
            .repo
            .get_habit(id, false)?
            .ok_or(RepoError::NotFound(id))?;
        habit.is_active = false;
        self.repo.update_habit(&habit)?;
        Ok(habit)
    }

    /// Hard-deletes a habit. Fails with `HabitInUse` while logs reference it.
    pub fn delete_habit(&self, id: HabitId) -> RepoResult<()> {
        self.repo.delete_habit(id)
    }
}
