use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok`, or `degraded` when Postgres does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// `llm` when a text generator is configured, otherwise `fallback`.
    pub counsellor: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let db_healthy = match pathway_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health probe could not reach the database");
            false
        }
    };

    Json(HealthReport {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        counsellor: if state.counsellor.has_generator() {
            "llm"
        } else {
            "fallback"
        },
    })
}

/// `GET /health`. Mounted at the root and again under `/api`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
