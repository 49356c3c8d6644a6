pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /login                                           validate credentials (POST, JSON)
/// /form                                            login form (GET), submit (POST, url-encoded)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login::login))
        .route(
            "/form",
            get(handlers::form::show_form).post(handlers::form::submit_form),
        )
}
