//! Habit domain model.
//!
//! # Responsibility
//! - Define the canonical habit record and its write-side shape.
//! - Own the single structural validation rule (non-empty title).
//!
//! # Invariants
//! - `id` is database-generated and never reused for another habit.
//! - `created_at` is set once at insert time and never changes.
//! - `is_active` is the source of truth for default-listing visibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a habit row.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type HabitId = i64;

/// A named recurring activity the user wants to track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Database-generated stable id.
    pub id: HabitId,
    /// Short display name. Must be non-empty after trimming.
    pub title: String,
    /// Free-text description. Defaults to empty.
    pub content: String,
    /// Visibility flag used instead of hard delete for hiding habits.
    pub is_active: bool,
    /// Creation timestamp, immutable after insert.
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Validates the mutable fields of this record.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        validate_title(&self.title)
    }
}

/// Write-side shape for creating a habit. The id and creation timestamp are
/// generated by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub title: String,
    pub content: String,
    pub is_active: bool,
}

impl NewHabit {
    /// Creates a draft with default content and active visibility.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: String::new(),
            is_active: true,
        }
    }

    pub fn validate(&self) -> Result<(), HabitValidationError> {
        validate_title(&self.title)
    }
}

/// Structural validation failure for habit writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitValidationError {
    /// `title` is empty or whitespace-only.
    EmptyTitle,
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "habit title must not be empty"),
        }
    }
}

impl Error for HabitValidationError {}

pub(crate) fn validate_title(title: &str) -> Result<(), HabitValidationError> {
    if title.trim().is_empty() {
        return Err(HabitValidationError::EmptyTitle);
    }
    Ok(())
}
