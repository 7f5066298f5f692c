//! Habit completion-log domain model.
//!
//! # Invariants
//! - At most one log exists per (habit, date) pair.
//! - A log always references an existing habit.
//! - `habit_title` is a derived projection joined at read time, never stored.

use crate::model::habit::HabitId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable identifier for a habit-log row.
pub type HabitLogId = i64;

/// Read model for one per-date completion record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLog {
    /// Database-generated stable id.
    pub id: HabitLogId,
    /// Owning habit reference.
    pub habit_id: HabitId,
    /// Title of the referenced habit, derived by join at read time.
    pub habit_title: String,
    /// Calendar date this record applies to.
    pub date: NaiveDate,
    /// Whether the habit was completed on `date`.
    pub done: bool,
}

/// Write-side shape for creating or rewriting a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewHabitLog {
    pub habit_id: HabitId,
    pub date: NaiveDate,
    pub done: bool,
}

impl NewHabitLog {
    /// Creates a draft with the default `done = false`.
    pub fn new(habit_id: HabitId, date: NaiveDate) -> Self {
        Self {
            habit_id,
            date,
            done: false,
        }
    }
}
