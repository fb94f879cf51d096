use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::PgPool;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use pathway_api::config::ServerConfig;
use pathway_api::router::build_app_router;
use pathway_api::state::AppState;
use pathway_api::storage::DocumentStore;
use pathway_llm::Counsellor;

const DEFAULT_LOG_FILTER: &str = "pathway_api=debug,pathway_llm=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let pool = connect_database().await;
    let counsellor = build_counsellor(&config);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        counsellor: Arc::new(counsellor),
        documents: Arc::new(DocumentStore::new(config.upload_dir.clone())),
    };
    let app = build_app_router(state, &config);

    let ip = config.host.parse().expect("HOST must be an IP address");
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tracing::info!(%addr, upload_dir = %config.upload_dir.display(), "Pathway API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}

/// `RUST_LOG` wins over the built-in filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, probe, and migrate. The university catalog is seeded by the
/// migrations, so a fresh database is usable immediately.
async fn connect_database() -> PgPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = pathway_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    pathway_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    pathway_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready");
    pool
}

fn build_counsellor(config: &ServerConfig) -> Counsellor {
    let counsellor =
        Counsellor::from_config(&config.llm).expect("Failed to build text generation client");
    if counsellor.has_generator() {
        tracing::info!(model = %config.llm.model, "Counsellor replies use the text generation service");
    } else {
        tracing::warn!("No LLM API key configured; counsellor replies use the built-in fallback");
    }
    counsellor
}

async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Shutting down, draining in-flight requests");
}
