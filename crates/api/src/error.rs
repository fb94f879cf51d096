//! Handler errors and their JSON rendering.
//!
//! Every failure leaves the API as `{ "error": <message>, "code": <CODE> }`.
//! Internal details are logged and replaced with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pathway_core::error::CoreError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed request outside JSON validation, e.g. a broken multipart
    /// body.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl ErrorBody {
    fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }

    fn internal() -> Self {
        Self::new("INTERNAL_ERROR", "An internal error occurred")
    }
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Core(err) => core_status_and_body(err),
            AppError::Database(err) => sqlx_status_and_body(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new("BAD_REQUEST", msg)),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

fn core_status_and_body(err: &CoreError) -> (StatusCode, ErrorBody) {
    let (status, message) = match err {
        CoreError::NotFound { entity, id } => {
            (StatusCode::NOT_FOUND, format!("{entity} with id {id} not found"))
        }
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Domain invariant violated");
            return (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal());
        }
    };
    (status, ErrorBody::new(err.code(), message))
}

/// `RowNotFound` is a 404. A unique violation on one of our `uq_*`
/// constraints is a 409, which covers racing duplicate signups and
/// shortlist inserts. Anything else is a 500.
fn sqlx_status_and_body(err: &sqlx::Error) -> (StatusCode, ErrorBody) {
    const UNIQUE_VIOLATION: &str = "23505";

    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("NOT_FOUND", "Resource not found"),
        ),
        sqlx::Error::Database(db_err)
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint().is_some_and(|c| c.starts_with("uq_")) =>
        {
            let constraint = db_err.constraint().unwrap_or_default();
            (StatusCode::CONFLICT, ErrorBody::new("CONFLICT", conflict_message(constraint)))
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::internal())
        }
    }
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_users_email" => "Email already registered".to_string(),
        "uq_shortlisted_universities_user_university" => "University already in shortlist".to_string(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_statuses() {
        let cases = [
            (CoreError::not_found("University", 7), StatusCode::NOT_FOUND),
            (CoreError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (CoreError::Conflict("x".into()), StatusCode::CONFLICT),
            (CoreError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (CoreError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn internal_messages_are_not_leaked() {
        let (_, body) = AppError::InternalError("pool exhausted".into()).status_and_body();
        assert_eq!(body.error, "An internal error occurred");
        assert_eq!(body.code, "INTERNAL_ERROR");
    }

    #[test]
    fn row_not_found_is_404() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn known_constraints_get_friendly_messages() {
        assert_eq!(conflict_message("uq_users_email"), "Email already registered");
        assert!(conflict_message("uq_other").contains("uq_other"));
    }
}
