//! Habit-log repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `habit_logs` joined with the owning habit title.
//! - Map SQLite constraint failures to semantic errors.
//!
//! # Invariants
//! - (habit_id, date) uniqueness comes from the schema's unique index; the
//!   repository never pre-checks before inserting.
//! - A dangling habit reference is rejected by the foreign key.
//! - List order is `date DESC, id ASC`.

use crate::model::habit_log::{HabitLog, HabitLogId, NewHabitLog};
use crate::repo::habit_repo::{bool_to_int, int_to_bool, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const LOG_SELECT_SQL: &str = "SELECT
    habit_logs.id AS id,
    habit_logs.habit_id AS habit_id,
    habits.title AS habit_title,
    habit_logs.date AS date,
    habit_logs.done AS done
FROM habit_logs
INNER JOIN habits ON habits.id = habit_logs.habit_id";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository interface for habit-log CRUD operations.
pub trait HabitLogRepository {
    /// Inserts one log and returns the stored row including the derived
    /// habit title.
    fn create_log(&self, new: &NewHabitLog) -> RepoResult<HabitLog>;
    /// Gets one log by id.
    fn get_log(&self, id: HabitLogId) -> RepoResult<Option<HabitLog>>;
    /// Lists all logs, newest date first.
    fn list_logs(&self) -> RepoResult<Vec<HabitLog>>;
    /// Rewrites habit reference, date and done flag for one log.
    fn update_log(&self, id: HabitLogId, new: &NewHabitLog) -> RepoResult<()>;
    /// Unconditionally removes one log.
    fn delete_log(&self, id: HabitLogId) -> RepoResult<()>;
}

/// SQLite-backed habit-log repository.
pub struct SqliteHabitLogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitLogRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl HabitLogRepository for SqliteHabitLogRepository<'_> {
    fn create_log(&self, new: &NewHabitLog) -> RepoResult<HabitLog> {
        self.conn
            .execute(
                "INSERT INTO habit_logs (habit_id, date, done)
                 VALUES (?1, ?2, ?3);",
                params![
                    new.habit_id,
                    new.date.format(DATE_FORMAT).to_string(),
                    bool_to_int(new.done),
                ],
            )
            .map_err(|err| map_log_constraint(err, new))?;

        let id = self.conn.last_insert_rowid();
        self.get_log(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("log row {id} missing immediately after insert"))
        })
    }

    fn get_log(&self, id: HabitLogId) -> RepoResult<Option<HabitLog>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LOG_SELECT_SQL} WHERE habit_logs.id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_log_row(row)?));
        }

        Ok(None)
    }

    fn list_logs(&self) -> RepoResult<Vec<HabitLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LOG_SELECT_SQL} ORDER BY habit_logs.date DESC, habit_logs.id ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut logs = Vec::new();
        while let Some(row) = rows.next()? {
            logs.push(parse_log_row(row)?);
        }

        Ok(logs)
    }

    fn update_log(&self, id: HabitLogId, new: &NewHabitLog) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE habit_logs
                 SET
                    habit_id = ?1,
                    date = ?2,
                    done = ?3
                 WHERE id = ?4;",
                params![
                    new.habit_id,
                    new.date.format(DATE_FORMAT).to_string(),
                    bool_to_int(new.done),
                    id,
                ],
            )
            .map_err(|err| map_log_constraint(err, new))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_log(&self, id: HabitLogId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM habit_logs WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn map_log_constraint(err: rusqlite::Error, new: &NewHabitLog) -> RepoError {
    if let rusqlite::Error::SqliteFailure(code, _) = &err {
        match code.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
                return RepoError::DuplicateLog {
                    habit_id: new.habit_id,
                    date: new.date,
                };
            }
            rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
            | rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER => {
                return RepoError::MissingHabit(new.habit_id);
            }
            _ => {}
        }
    }
    err.into()
}

fn parse_log_row(row: &Row<'_>) -> RepoResult<HabitLog> {
    let date_text: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date value `{date_text}` in habit_logs.date"))
    })?;

    Ok(HabitLog {
        id: row.get("id")?,
        habit_id: row.get("habit_id")?,
        habit_title: row.get("habit_title")?,
        date,
        done: int_to_bool(row.get("done")?, "habit_logs.done")?,
    })
}
