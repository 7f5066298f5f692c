//! HTTP handlers, one explicit function per (method, resource) pair.
//!
//! # Invariants
//! - Habit detail reads go through the active-only filter, so an inactive
//!   habit answers 404 on GET/PUT/PATCH/DELETE even though the row exists.
//! - `habit_title` on log responses is joined at read time, never stored.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use habits_core::{
    Habit, HabitId, HabitLog, HabitLogId, HabitLogService, HabitService,
    SqliteHabitLogRepository, SqliteHabitRepository,
};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};

use super::error::{ApiError, ApiResult};
use super::validate;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection for shared handler access.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    fn lock(&self) -> ApiResult<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| ApiError::internal("database lock poisoned"))
    }
}

/// Liveness response payload.
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
    pub app: &'static str,
}

/// Habit resource representation.
#[derive(Debug, Serialize)]
pub struct HabitResponse {
    pub id: HabitId,
    pub title: String,
    pub content: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Habit> for HabitResponse {
    fn from(value: Habit) -> Self {
        Self {
            id: value.id,
            title: value.title,
            content: value.content,
            is_active: value.is_active,
            created_at: value.created_at,
        }
    }
}

/// Habit-log resource representation. The owning habit is exposed as
/// `habit` to match the public interface.
#[derive(Debug, Serialize)]
pub struct HabitLogResponse {
    pub id: HabitLogId,
    pub habit: HabitId,
    pub habit_title: String,
    pub date: NaiveDate,
    pub done: bool,
}

impl From<HabitLog> for HabitLogResponse {
    fn from(value: HabitLog) -> Self {
        Self {
            id: value.id,
            habit: value.habit_id,
            habit_title: value.habit_title,
            date: value.date,
            done: value.done,
        }
    }
}

/// Liveness handler - static payload, no side effects.
pub async fn ping() -> impl IntoResponse {
    Json(PingResponse {
        message: habits_core::ping(),
        app: habits_core::APP_NAME,
    })
}

pub async fn list_habits(State(state): State<AppState>) -> ApiResult<Json<Vec<HabitResponse>>> {
    let conn = state.lock()?;
    let service = HabitService::new(SqliteHabitRepository::new(&conn));

    let habits = service.list_habits(true)?;
    Ok(Json(habits.into_iter().map(Into::into).collect()))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<HabitResponse>)> {
    let new = validate::habit_create(body)?;

    let conn = state.lock()?;
    let service = HabitService::new(SqliteHabitRepository::new(&conn));
    let created = service.create_habit(&new)?;

    log::info!(
        "event=habit_created module=api status=ok habit_id={}",
        created.id
    );
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn get_habit(
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
) -> ApiResult<Json<HabitResponse>> {
    let conn = state.lock()?;
    let service = HabitService::new(SqliteHabitRepository::new(&conn));

    let habit = service.get_habit(id, true)?.ok_or(ApiError::NotFound)?;
    Ok(Json(habit.into()))
}

pub async fn put_habit(
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
    Json(body): Json<Value>,
) -> ApiResult<Json<HabitResponse>> {
    let conn = state.lock()?;
    let service = HabitService::new(SqliteHabitRepository::new(&conn));

    let existing = service.get_habit(id, true)?.ok_or(ApiError::NotFound)?;
    let updated = validate::habit_update(body, &existing)?;
    service.update_habit(&updated)?;
    Ok(Json(updated.into()))
}

pub async fn patch_habit(
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
    Json(body): Json<Value>,
) -> ApiResult<Json<HabitResponse>> {
    let conn = state.lock()?;
    let service = HabitService::new(SqliteHabitRepository::new(&conn));

    let existing = service.get_habit(id, true)?.ok_or(ApiError::NotFound)?;
    let updated = validate::habit_partial_update(body, &existing)?;
    service.update_habit(&updated)?;
    Ok(Json(updated.into()))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<HabitId>,
) -> ApiResult<StatusCode> {
    let conn = state.lock()?;
    let service = HabitService::new(SqliteHabitRepository::new(&conn));

    // Visibility rule: an inactive habit is absent for the API even on delete.
    service.get_habit(id, true)?.ok_or(ApiError::NotFound)?;
    service.delete_habit(id)?;

    log::info!("event=habit_deleted module=api status=ok habit_id={id}");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_logs(State(state): State<AppState>) -> ApiResult<Json<Vec<HabitLogResponse>>> {
    let conn = state.lock()?;
    let service = HabitLogService::new(SqliteHabitLogRepository::new(&conn));

    let logs = service.list_logs()?;
    Ok(Json(logs.into_iter().map(Into::into).collect()))
}

pub async fn create_log(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<HabitLogResponse>)> {
    let new = validate::log_create(body)?;

    let conn = state.lock()?;
    let service = HabitLogService::new(SqliteHabitLogRepository::new(&conn));
    let created = service.create_log(&new)?;

    log::info!(
        "event=log_created module=api status=ok log_id={} habit_id={} date={}",
        created.id,
        created.habit_id,
        created.date
    );
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn get_log(
    State(state): State<AppState>,
    Path(id): Path<HabitLogId>,
) -> ApiResult<Json<HabitLogResponse>> {
    let conn = state.lock()?;
    let service = HabitLogService::new(SqliteHabitLogRepository::new(&conn));

    let log = service.get_log(id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(log.into()))
}

pub async fn put_log(
    State(state): State<AppState>,
    Path(id): Path<HabitLogId>,
    Json(body): Json<Value>,
) -> ApiResult<Json<HabitLogResponse>> {
    let conn = state.lock()?;
    let service = HabitLogService::new(SqliteHabitLogRepository::new(&conn));

    let existing = service.get_log(id)?.ok_or(ApiError::NotFound)?;
    let new = validate::log_update(body, &existing)?;
    service.update_log(id, &new)?;
    reload_log(&service, id)
}

pub async fn patch_log(
    State(state): State<AppState>,
    Path(id): Path<HabitLogId>,
    Json(body): Json<Value>,
) -> ApiResult<Json<HabitLogResponse>> {
    let conn = state.lock()?;
    let service = HabitLogService::new(SqliteHabitLogRepository::new(&conn));

    let existing = service.get_log(id)?.ok_or(ApiError::NotFound)?;
    let new = validate::log_partial_update(body, &existing)?;
    service.update_log(id, &new)?;
    reload_log(&service, id)
}

pub async fn delete_log(
    State(state): State<AppState>,
    Path(id): Path<HabitLogId>,
) -> ApiResult<StatusCode> {
    let conn = state.lock()?;
    let service = HabitLogService::new(SqliteHabitLogRepository::new(&conn));

    service.delete_log(id)?;
    log::info!("event=log_deleted module=api status=ok log_id={id}");
    Ok(StatusCode::NO_CONTENT)
}

// The habit title may have changed with the write, so reread the joined row.
fn reload_log<R: habits_core::HabitLogRepository>(
    service: &HabitLogService<R>,
    id: HabitLogId,
) -> ApiResult<Json<HabitLogResponse>> {
    let log = service
        .get_log(id)?
        .ok_or_else(|| ApiError::internal(format!("log {id} missing after update")))?;
    Ok(Json(log.into()))
}
