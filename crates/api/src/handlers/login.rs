//! Handler for `POST /login`.

use axum::extract::State;
use axum::Json;
use formcheck_core::types::Record;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub message: &'static str,
}

/// POST /login
///
/// Validate submitted credentials. Returns 200 with the username when both
/// fields are present, 400 with the error bag otherwise.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<Value>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let Value::Object(record) = input else {
        return Err(AppError::BadRequest(
            "Request body must be a JSON object".into(),
        ));
    };

    let valid: Record = state.forms.login.validate_or_error(&record)?;

    let username = match valid.get("username") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    tracing::info!(%username, "Login accepted");

    Ok(Json(DataResponse {
        data: LoginResponse {
            username,
            message: "Login success",
        },
    }))
}
