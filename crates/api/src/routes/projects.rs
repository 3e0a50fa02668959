//! Route definitions for the `/projects` resource.

use axum::routing::{get, options, post};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// Each path also answers `OPTIONS` so preflights never hit a 405.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/save", post(projects::save).options(projects::preflight))
        .route("/list", get(projects::list).options(projects::preflight))
        .route("/get", get(projects::get).options(projects::preflight))
        .route("/{*rest}", options(projects::preflight))
}
