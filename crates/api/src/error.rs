use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use formcheck_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `formcheck_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, errors) = match self {
            // --- CoreError variants ---
            AppError::Core(CoreError::InvalidInput(bag)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                bag.summary(),
                Some(bag),
            ),
            AppError::Core(CoreError::Rules(err)) => {
                tracing::error!(error = %err, "Invalid rule declaration");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
        };

        let body = match errors {
            Some(errors) => json!({
                "error": message,
                "code": code,
                "errors": errors,
            }),
            None => json!({
                "error": message,
                "code": code,
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}
