//! Route definitions for the `/documents` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// GET    /          -> list
/// POST   /upload    -> upload (multipart)
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(documents::list))
        .route("/upload", post(documents::upload))
        .route("/{id}", delete(documents::delete))
}
