pub mod auth;
pub mod counsellor;
pub mod documents;
pub mod health;
pub mod profile;
pub mod tasks;
pub mod universities;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /health                                  service health
///
/// /auth/signup | /auth/login               public
/// /auth/me                                 current user
///
/// /profile                                 get, partial update
/// /profile/onboarding/complete             finish onboarding
/// /profile/strength | /profile/dashboard   summaries
///
/// /universities                            fit-annotated catalog
/// /universities/recommendations            budget/country filtered
/// /universities/shortlist[/{id}[/status]]  shortlist lifecycle
/// /universities/lock | /universities/unlock
/// /universities/{id}
///
/// /tasks[/{id}[/complete|/uncomplete]]
/// /documents[/upload|/{id}]
/// /counsellor/chat | /voice-onboarding | /action/* | /history
/// ```
///
/// Everything except `/health`, signup and login requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/auth", auth::router())
        .nest("/profile", profile::router())
        .nest("/universities", universities::router())
        .nest("/tasks", tasks::router())
        .nest("/documents", documents::router())
        .nest("/counsellor", counsellor::router())
}
