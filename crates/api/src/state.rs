use std::sync::Arc;

use pathway_llm::Counsellor;

use crate::config::ServerConfig;
use crate::storage::DocumentStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pathway_db::DbPool,
    /// Server configuration (JWT secret, upload limits).
    pub config: Arc<ServerConfig>,
    /// Chat and voice onboarding service, built once at startup.
    pub counsellor: Arc<Counsellor>,
    /// On-disk store for uploaded documents.
    pub documents: Arc<DocumentStore>,
}
