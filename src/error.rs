use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

/// Schedule rule violations raised while validating a flight write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedulingError {
    #[error("Arrival must be after departure")]
    InvalidTimeOrder,
    #[error("A flight with this airplane and schedule already exists")]
    DuplicateSchedule,
    #[error("Airplane is already scheduled for another flight in this time window")]
    ScheduleOverlap,
}

/// Reasons a flight refuses a new reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("Flight is full")]
    FlightFull,
    #[error("Schedule conflict detected")]
    ScheduleConflict,
    #[error("Could not assign a unique reservation code, please retry")]
    CodeCollision,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error(transparent)]
    Admission(#[from] AdmissionError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Scheduling(_) => StatusCode::BAD_REQUEST,
            AppError::Admission(AdmissionError::CodeCollision) => StatusCode::CONFLICT,
            AppError::Admission(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Scheduling(e) => e.to_string(),
            AppError::Admission(e) => e.to_string(),
            AppError::Internal(_) | AppError::Database(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Internal(_) | AppError::Database(_) => {
                tracing::error!(error = %self, "Request failed")
            }
            _ => tracing::warn!(status = %status, error = %self, "Request rejected"),
        }

        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}
