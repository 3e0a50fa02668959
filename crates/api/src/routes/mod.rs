pub mod health;
pub mod projects;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /projects/save      POST     save a project
/// /projects/list      GET      list the caller's projects
/// /projects/get       GET      fetch one project (?id=)
/// /projects/*         OPTIONS  preflight
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/projects", projects::router())
}
