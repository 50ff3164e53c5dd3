use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::DatabaseError;
use crate::scheduling::ScheduleError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    Schedule(#[from] ScheduleError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthenticated,
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(DatabaseError::Sqlx(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Schedule(err) => match err {
                ScheduleError::Configuration(_)
                | ScheduleError::InvalidFormat(_)
                | ScheduleError::InvalidRange
                | ScheduleError::SlotMisalignment { .. }
                | ScheduleError::RoleMismatch(_)
                | ScheduleError::InactivePeriod(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
                ScheduleError::ScheduleConflict { .. } => {
                    (StatusCode::CONFLICT, "Resource conflict")
                }
                ScheduleError::NotFound(_) => (StatusCode::NOT_FOUND, "Resource not found"),
                ScheduleError::Permission => (StatusCode::FORBIDDEN, "Access denied"),
            },
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation error"),
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AppError::Database(err) => {
                tracing::error!("storage failure: {err}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": {
                            "message": "An internal server error occurred",
                        }
                    })),
                )
                    .into_response();
            }
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "details": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
