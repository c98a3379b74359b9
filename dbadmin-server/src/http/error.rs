//! API error types with IntoResponse
//!
//! Errors are converted to JSON `{error, message}` bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use dbadmin_core::CoreError;

use crate::db::repos::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request (400)
    Validation(ValidationError),

    /// Input that does not fit the table: bad value, unknown column,
    /// missing key (400)
    Invalid(CoreError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Database refused the write (422, message passed through)
    Rejected { message: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::Invalid(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", resource, id)
                }),
            ),
            Self::Rejected { message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "rejected",
                    "message": message
                }),
            ),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::UnknownReport { id } => Self::NotFound { resource: "report", id },
            CoreError::RowNotFound { label, .. } => Self::NotFound { resource: "row", id: label },
            other => Self::Invalid(other),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Rejected { message } => Self::Rejected { message },
            DbError::Core(core) => Self::from(core),
            DbError::Sqlx(_) => Self::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::Empty { field: "table name" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_value_is_400() {
        let err: ApiError = DbError::Core(CoreError::invalid_value("id", "integer", "abc", "not an integer")).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err: ApiError = DbError::NotFound {
            resource: "table",
            id: "Equipamento".into(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err: ApiError = CoreError::UnknownReport { id: "x".into() }.into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejected_write_is_422_with_message() {
        let err: ApiError = DbError::Rejected {
            message: "null value in column \"nome\" violates not-null constraint".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"], "rejected");
        assert!(body["message"].as_str().unwrap().contains("not-null"));
    }

    #[tokio::test]
    async fn driver_errors_are_generic_500() {
        let err: ApiError = DbError::Sqlx(sqlx::Error::PoolTimedOut).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], "an internal error occurred");
    }
}
