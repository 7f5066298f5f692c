//! Explicit request-body validation.
//!
//! Each parser walks a JSON object field by field and accumulates a
//! field-keyed error map, so a single response reports every bad field.
//! Unknown fields are ignored. PUT parsers require the full field set while
//! PATCH parsers merge over the stored record; fields with model defaults
//! stay optional on both paths.

use crate::api::error::{ApiError, FieldErrors};
use chrono::NaiveDate;
use habits_core::{Habit, HabitId, HabitLog, NewHabit, NewHabitLog};
use serde_json::{Map, Value};

const MSG_REQUIRED: &str = "This field is required.";
const MSG_NOT_NULL: &str = "This field may not be null.";
const MSG_NOT_BLANK: &str = "This field may not be blank.";
const MSG_NOT_STRING: &str = "Not a valid string.";
const MSG_NOT_BOOL: &str = "Must be a valid boolean.";
const MSG_BAD_DATE: &str =
    "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accumulates per-field problems while pulling typed values out of a JSON
/// object body.
struct BodyValidator {
    fields: Map<String, Value>,
    errors: FieldErrors,
}

impl BodyValidator {
    fn new(body: Value) -> Result<Self, ApiError> {
        match body {
            Value::Object(fields) => Ok(Self {
                fields,
                errors: FieldErrors::new(),
            }),
            _ => Err(ApiError::non_field("Invalid data. Expected a dictionary.")),
        }
    }

    fn push_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    fn string(&mut self, field: &str, required: bool, allow_blank: bool) -> Option<String> {
        match self.fields.remove(field) {
            None => {
                if required {
                    self.push_error(field, MSG_REQUIRED);
                }
                None
            }
            Some(Value::Null) => {
                self.push_error(field, MSG_NOT_NULL);
                None
            }
            Some(Value::String(value)) => {
                if !allow_blank && value.trim().is_empty() {
                    self.push_error(field, MSG_NOT_BLANK);
                    return None;
                }
                Some(value)
            }
            Some(_) => {
                self.push_error(field, MSG_NOT_STRING);
                None
            }
        }
    }

    fn boolean(&mut self, field: &str) -> Option<bool> {
        match self.fields.remove(field) {
            None => None,
            Some(Value::Null) => {
                self.push_error(field, MSG_NOT_NULL);
                None
            }
            Some(Value::Bool(value)) => Some(value),
            Some(_) => {
                self.push_error(field, MSG_NOT_BOOL);
                None
            }
        }
    }

    fn date(&mut self, field: &str, required: bool) -> Option<NaiveDate> {
        match self.fields.remove(field) {
            None => {
                if required {
                    self.push_error(field, MSG_REQUIRED);
                }
                None
            }
            Some(Value::Null) => {
                self.push_error(field, MSG_NOT_NULL);
                None
            }
            Some(Value::String(value)) => {
                match NaiveDate::parse_from_str(&value, DATE_FORMAT) {
                    Ok(date) => Some(date),
                    Err(_) => {
                        self.push_error(field, MSG_BAD_DATE);
                        None
                    }
                }
            }
            Some(_) => {
                self.push_error(field, MSG_BAD_DATE);
                None
            }
        }
    }

    fn pk(&mut self, field: &str, required: bool) -> Option<HabitId> {
        match self.fields.remove(field) {
            None => {
                if required {
                    self.push_error(field, MSG_REQUIRED);
                }
                None
            }
            Some(Value::Null) => {
                self.push_error(field, MSG_NOT_NULL);
                None
            }
            Some(Value::Number(value)) => match value.as_i64() {
                Some(id) => Some(id),
                None => {
                    self.push_error(
                        field,
                        "Incorrect type. Expected pk value, received number.",
                    );
                    None
                }
            },
            Some(Value::String(value)) => match value.parse::<HabitId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    self.push_error(field, "Incorrect type. Expected pk value, received str.");
                    None
                }
            },
            Some(other) => {
                self.push_error(
                    field,
                    format!(
                        "Incorrect type. Expected pk value, received {}.",
                        json_type_name(&other)
                    ),
                );
                None
            }
        }
    }

    fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

pub(crate) fn habit_create(body: Value) -> Result<NewHabit, ApiError> {
    let mut validator = BodyValidator::new(body)?;
    let title = validator.string("title", true, false);
    let content = validator.string("content", false, true);
    let is_active = validator.boolean("is_active");
    validator.finish()?;

    Ok(NewHabit {
        title: title.ok_or_else(|| ApiError::internal("validated title missing"))?,
        content: content.unwrap_or_default(),
        is_active: is_active.unwrap_or(true),
    })
}

pub(crate) fn habit_update(body: Value, existing: &Habit) -> Result<Habit, ApiError> {
    let mut validator = BodyValidator::new(body)?;
    let title = validator.string("title", true, false);
    let content = validator.string("content", false, true);
    let is_active = validator.boolean("is_active");
    validator.finish()?;

    Ok(Habit {
        id: existing.id,
        title: title.ok_or_else(|| ApiError::internal("validated title missing"))?,
        content: content.unwrap_or_else(|| existing.content.clone()),
        is_active: is_active.unwrap_or(existing.is_active),
        created_at: existing.created_at,
    })
}

pub(crate) fn habit_partial_update(body: Value, existing: &Habit) -> Result<Habit, ApiError> {
    let mut validator = BodyValidator::new(body)?;
    let title = validator.string("title", false, false);
    let content = validator.string("content", false, true);
    let is_active = validator.boolean("is_active");
    validator.finish()?;

    Ok(Habit {
        id: existing.id,
        title: title.unwrap_or_else(|| existing.title.clone()),
        content: content.unwrap_or_else(|| existing.content.clone()),
        is_active: is_active.unwrap_or(existing.is_active),
        created_at: existing.created_at,
    })
}

pub(crate) fn log_create(body: Value) -> Result<NewHabitLog, ApiError> {
    let mut validator = BodyValidator::new(body)?;
    let habit_id = validator.pk("habit", true);
    let date = validator.date("date", true);
    let done = validator.boolean("done");
    validator.finish()?;

    Ok(NewHabitLog {
        habit_id: habit_id.ok_or_else(|| ApiError::internal("validated habit pk missing"))?,
        date: date.ok_or_else(|| ApiError::internal("validated date missing"))?,
        done: done.unwrap_or(false),
    })
}

pub(crate) fn log_update(body: Value, existing: &HabitLog) -> Result<NewHabitLog, ApiError> {
    let mut validator = BodyValidator::new(body)?;
    let habit_id = validator.pk("habit", true);
    let date = validator.date("date", true);
    let done = validator.boolean("done");
    validator.finish()?;

    Ok(NewHabitLog {
        habit_id: habit_id.ok_or_else(|| ApiError::internal("validated habit pk missing"))?,
        date: date.ok_or_else(|| ApiError::internal("validated date missing"))?,
        done: done.unwrap_or(existing.done),
    })
}

pub(crate) fn log_partial_update(body: Value, existing: &HabitLog) -> Result<NewHabitLog, ApiError> {
    let mut validator = BodyValidator::new(body)?;
    let habit_id = validator.pk("habit", false);
    let date = validator.date("date", false);
    let done = validator.boolean("done");
    validator.finish()?;

    Ok(NewHabitLog {
        habit_id: habit_id.unwrap_or(existing.habit_id),
        date: date.unwrap_or(existing.date),
        done: done.unwrap_or(existing.done),
    })
}
