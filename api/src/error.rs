//! Error type shared by every handler; always rendered as `{"error": "<message>"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use vet_clinic_service::sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing required fields, malformed dates or an unreadable body.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate email. Reported as 400, like every other rejected payload.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_))
                | Some(SqlErr::ForeignKeyConstraintViolation(_)) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Message sent to the client. Storage details are logged, never returned.
    fn message(&self) -> String {
        match self {
            ApiError::Database(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => "El registro ya existe".to_owned(),
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    "El registro hace referencia a datos inexistentes".to_owned()
                }
                _ => "Error interno del servidor".to_owned(),
            },
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ApiError::Database(err) = &self {
            error!(%status, error = %err, "storage failure");
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
