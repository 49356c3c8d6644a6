//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests call `IntoResponse` directly on `AppError` values; no server
//! is involved.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use formcheck_api::error::AppError;
use formcheck_core::error::CoreError;
use formcheck_core::validation::parser::parse_rules;
use formcheck_core::validation::ErrorBag;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::InvalidInput maps to 400 with the error bag
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_input_returns_400_with_errors() {
    let mut bag = ErrorBag::new();
    bag.add("username", "The username field is required.");
    let err = AppError::Core(CoreError::InvalidInput(bag));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "The username field is required.");
    assert_eq!(
        json["errors"],
        serde_json::json!({ "username": ["The username field is required."] })
    );
}

// ---------------------------------------------------------------------------
// Test: rule declaration errors are internal and do not leak details
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rule_errors_return_500_with_sanitized_message() {
    let parse_error = parse_rules("required|bogus").unwrap_err();
    let err = AppError::from(CoreError::from(parse_error));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
    assert!(json.get("errors").is_none());
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_returns_400() {
    let err = AppError::BadRequest("Request body must be a JSON object".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Request body must be a JSON object");
}

// ---------------------------------------------------------------------------
// Test: CoreError converts into AppError::Core
// ---------------------------------------------------------------------------

#[test]
fn core_error_converts_via_from() {
    let err: AppError = CoreError::InvalidInput(ErrorBag::new()).into();
    assert_matches!(err, AppError::Core(CoreError::InvalidInput(_)));
}
