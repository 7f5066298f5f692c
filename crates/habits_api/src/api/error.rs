//! API error taxonomy and HTTP status mapping.
//!
//! Validation failures carry a field-keyed error map and map to 400.
//! Referential-integrity failures on habit delete map to 409 instead of
//! escaping as a 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use habits_core::{HabitValidationError, RepoError};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Field name -> list of human-readable problems with that field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Error key used for problems that are not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed validation; maps to 400 with the field error map
    /// as the response body.
    #[error("request validation failed")]
    Validation(FieldErrors),

    /// Unknown id, or an id hidden by the active-only visibility filter.
    #[error("not found")]
    NotFound,

    /// Referential-integrity conflict (habit still referenced by logs).
    #[error("{0}")]
    Conflict(String),

    /// Unexpected persistence or state failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Builds a single-field validation error.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        Self::Validation(errors)
    }

    /// Builds a validation error not attached to one field.
    pub fn non_field(message: impl Into<String>) -> Self {
        Self::field(NON_FIELD_ERRORS, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(HabitValidationError::EmptyTitle) => {
                Self::field("title", "This field may not be blank.")
            }
            RepoError::NotFound(_) => Self::NotFound,
            RepoError::DuplicateLog { .. } => {
                Self::non_field("The fields habit, date must make a unique set.")
            }
            RepoError::MissingHabit(id) => Self::field(
                "habit",
                format!("Invalid pk \"{id}\" - object does not exist."),
            ),
            RepoError::HabitInUse(id) => Self::Conflict(format!(
                "Cannot delete habit {id} because completion logs still reference it."
            )),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(fields) => {
                (StatusCode::BAD_REQUEST, Json(json!(fields))).into_response()
            }
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({"detail": "Not found."})),
            )
                .into_response(),
            Self::Conflict(detail) => {
                (StatusCode::CONFLICT, Json(json!({"detail": detail}))).into_response()
            }
            Self::Internal(detail) => {
                log::error!("event=request_failed module=api status=error detail={detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "Internal server error."})),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn repo_errors_map_to_expected_api_errors() {
        let duplicate = RepoError::DuplicateLog {
            habit_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert!(matches!(ApiError::from(duplicate), ApiError::Validation(_)));

        assert!(matches!(
            ApiError::from(RepoError::NotFound(9)),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from(RepoError::HabitInUse(1)),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(RepoError::MissingHabit(3)),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn field_error_carries_field_key() {
        match ApiError::field("title", "This field is required.") {
            ApiError::Validation(fields) => {
                assert_eq!(
                    fields.get("title"),
                    Some(&vec!["This field is required.".to_string()])
                );
            }
            other => panic!("unexpected variant: {other}"),
        }
    }
}
