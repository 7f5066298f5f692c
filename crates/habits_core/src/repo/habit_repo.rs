//! Habit repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `habits` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate the model before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `delete_habit` relies on the RESTRICT foreign key; dependent logs make
//!   the delete fail with `HabitInUse`.

use crate::db::DbError;
use crate::model::habit::{Habit, HabitId, HabitValidationError, NewHabit};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const HABIT_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    is_active,
    created_at
FROM habits";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for habit and habit-log persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(HabitValidationError),
    Db(DbError),
    NotFound(i64),
    /// A log already exists for this (habit, date) pair.
    DuplicateLog { habit_id: HabitId, date: NaiveDate },
    /// A log write referenced a habit id that does not exist.
    MissingHabit(HabitId),
    /// The habit is still referenced by at least one log.
    HabitInUse(HabitId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::DuplicateLog { habit_id, date } => {
                write!(f, "log already exists for habit {habit_id} on {date}")
            }
            Self::MissingHabit(id) => write!(f, "habit not found: {id}"),
            Self::HabitInUse(id) => {
                write!(f, "habit {id} is referenced by completion logs")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HabitValidationError> for RepoError {
    fn from(value: HabitValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for habit CRUD operations.
pub trait HabitRepository {
    /// Inserts one habit and returns the stored row with generated id and
    /// creation timestamp.
    fn create_habit(&self, new: &NewHabit) -> RepoResult<Habit>;
    /// Gets one habit by id. `active_only` applies the visibility filter, so
    /// an inactive habit reads back as absent.
    fn get_habit(&self, id: HabitId, active_only: bool) -> RepoResult<Option<Habit>>;
    /// Lists habits, optionally restricted to `is_active = true`.
    fn list_habits(&self, active_only: bool) -> RepoResult<Vec<Habit>>;
    /// Rewrites title/content/is_active. `created_at` never changes.
    fn update_habit(&self, habit: &Habit) -> RepoResult<()>;
    /// Hard-deletes one habit. Fails with `HabitInUse` while logs reference it.
    fn delete_habit(&self, id: HabitId) -> RepoResult<()>;
}

/// SQLite-backed habit repository.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create_habit(&self, new: &NewHabit) -> RepoResult<Habit> {
        new.validate()?;

        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO habits (title, content, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                new.title.as_str(),
                new.content.as_str(),
                bool_to_int(new.is_active),
                created_at.to_rfc3339(),
            ],
        )?;

        Ok(Habit {
            id: self.conn.last_insert_rowid(),
            title: new.title.clone(),
            content: new.content.clone(),
            is_active: new.is_active,
            created_at,
        })
    }

    fn get_habit(&self, id: HabitId, active_only: bool) -> RepoResult<Option<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL}
             WHERE id = ?1
               AND (?2 = 0 OR is_active = 1);"
        ))?;

        let mut rows = stmt.query(params![id, bool_to_int(active_only)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_habit_row(row)?));
        }

        Ok(None)
    }

    fn list_habits(&self, active_only: bool) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL}
             WHERE (?1 = 0 OR is_active = 1)
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query(params![bool_to_int(active_only)])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }

        Ok(habits)
    }

    fn update_habit(&self, habit: &Habit) -> RepoResult<()> {
        habit.validate()?;

        let changed = self.conn.execute(
            "UPDATE habits
             SET
                title = ?1,
                content = ?2,
                is_active = ?3
             WHERE id = ?4;",
            params![
                habit.title.as_str(),
                habit.content.as_str(),
                bool_to_int(habit.is_active),
                habit.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(habit.id));
        }

        Ok(())
    }

    fn delete_habit(&self, id: HabitId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1;", [id])
            .map_err(|err| match err {
                rusqlite::Error::SqliteFailure(code, _)
                    if code.code == ErrorCode::ConstraintViolation =>
                {
                    RepoError::HabitInUse(id)
                }
                other => other.into(),
            })?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

pub(crate) fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let created_at_text: String = row.get("created_at")?;
    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_at_text)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{created_at_text}` in habits.created_at"
            ))
        })?;

    let habit = Habit {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        is_active: int_to_bool(row.get("is_active")?, "habits.is_active")?,
        created_at,
    };
    habit.validate()?;
    Ok(habit)
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
