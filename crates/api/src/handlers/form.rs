//! Handlers for the HTML login form at `/form`.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use formcheck_core::types::record_from_pairs;
use formcheck_core::validation::Outcome;
use serde::Deserialize;
use uuid::Uuid;

use crate::flash::Flash;
use crate::state::AppState;
use crate::views;

/// Query parameters for `GET /form`.
#[derive(Debug, Deserialize)]
pub struct ShowFormParams {
    /// Id of the flash left by a failed submission.
    pub flash: Option<Uuid>,
}

/// GET /form
///
/// Render the login form, including errors and old input from the previous
/// failed submission when a flash id is given.
pub async fn show_form(
    State(state): State<AppState>,
    Query(params): Query<ShowFormParams>,
) -> Html<String> {
    let flash = match params.flash {
        Some(id) => state.flash.take(&id).await,
        None => None,
    };
    Html(views::render_form(flash.as_ref()))
}

/// POST /form
///
/// Validate the submitted form. On success render the success page; on
/// failure flash the errors and redirect back to the form with 302.
pub async fn submit_form(
    State(state): State<AppState>,
    Form(input): Form<HashMap<String, String>>,
) -> Response {
    let record = record_from_pairs(input.clone());

    match state.forms.form.validate(&record) {
        Outcome::Valid(valid) => {
            let username = valid
                .get("username")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            tracing::info!(%username, "Form submission accepted");
            Html(views::render_success(username)).into_response()
        }
        Outcome::Invalid(errors) => {
            let id = state.flash.put(Flash::new(errors, &input)).await;
            (
                StatusCode::FOUND,
                [(header::LOCATION, format!("/form?flash={id}"))],
            )
                .into_response()
        }
    }
}
