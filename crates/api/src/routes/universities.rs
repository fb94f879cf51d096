//! Route definitions for the university catalog and the shortlist.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{shortlist, universities};
use crate::state::AppState;

/// Routes mounted at `/universities`.
///
/// ```text
/// GET    /                        -> list (fit-annotated, filterable)
/// GET    /recommendations         -> recommendations
/// GET    /shortlist               -> shortlist::list
/// POST   /shortlist               -> shortlist::add
/// DELETE /shortlist/{id}          -> shortlist::remove (id = university id)
/// PUT    /shortlist/{id}/status   -> shortlist::update_status (id = entry id)
/// POST   /lock                    -> shortlist::lock
/// POST   /unlock                  -> shortlist::unlock
/// GET    /{id}                    -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(universities::list))
        .route("/recommendations", get(universities::recommendations))
        .route("/shortlist", get(shortlist::list).post(shortlist::add))
        .route("/shortlist/{id}", delete(shortlist::remove))
        .route("/shortlist/{id}/status", put(shortlist::update_status))
        .route("/lock", post(shortlist::lock))
        .route("/unlock", post(shortlist::unlock))
        .route("/{id}", get(universities::get_by_id))
}
