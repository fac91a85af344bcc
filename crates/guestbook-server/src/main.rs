//! Guestbook Server
//!
//! HTTP API for guestbook entries, backed by PostgreSQL with a Redis
//! cache-aside layer for the recent-entries view and an advisory stats
//! counter.

mod handlers;
mod metrics;
mod services;
mod storage;

use anyhow::{Context, Result};
use axum::{
    http::HeaderName,
    routing::{get, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use guestbook_core::{EntryStore, SnapshotCache};
use services::{monitor, EntryService, StatsLedger};
use storage::{Database, OfflineCache, RedisCache};

/// Application state shared across handlers and the background monitor
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntryStore>,
    pub cache: Arc<dyn SnapshotCache>,
    pub entries: Arc<EntryService>,
    pub stats: Arc<StatsLedger>,
    pub metrics: PrometheusHandle,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Guestbook Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = load_config();
    info!("Config loaded: bind={}", config.bind_address);

    let metrics_handle = metrics::install()?;

    // Initialize PostgreSQL (waits for the database to come up)
    let db = Arc::new(
        Database::connect(&config.database_url, config.db_max_connections)
            .await
            .context("Failed to initialize database")?,
    );
    let store: Arc<dyn EntryStore> = db;

    // Initialize Redis; the service runs from the store alone if the cache
    // is unreachable.
    let cache: Arc<dyn SnapshotCache> = match RedisCache::connect(&config.redis_url).await {
        Ok(cache) => {
            info!("Connected to Redis");
            Arc::new(cache)
        }
        Err(e) => {
            warn!("Redis unavailable, continuing without cache: {}", e);
            Arc::new(OfflineCache)
        }
    };

    // Initialize services
    let ledger = Arc::new(StatsLedger::new(cache.clone()));
    let entries = Arc::new(EntryService::new(
        store.clone(),
        cache.clone(),
        ledger.clone(),
    ));

    // Start the background health monitor; it runs until process exit.
    let _monitor = monitor::spawn(store.clone(), cache.clone());

    let state = AppState {
        store,
        cache,
        entries,
        stats: ledger,
        metrics: metrics_handle,
    };

    // Build router
    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .nest("/api", api_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers([HeaderName::from_static("x-cache")]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/entries",
            get(handlers::entries::list).post(handlers::entries::create),
        )
        .route(
            "/entries/:id",
            put(handlers::entries::update).delete(handlers::entries::delete),
        )
        .route("/stats", get(handlers::stats::stats))
}

#[derive(Debug, Clone)]
struct Config {
    bind_address: String,
    database_url: String,
    db_max_connections: u32,
    redis_url: String,
}

fn load_config() -> Config {
    let db_host = env_or("DB_HOST", "localhost");
    let db_port = env_or("DB_PORT", "5432");
    let db_user = env_or("DB_USER", "guestbook");
    let db_password = env_or("DB_PASSWORD", "password");
    let db_name = env_or("DB_NAME", "guestbook");
    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        db_user, db_password, db_host, db_port, db_name
    );

    let db_max_connections = env_or("DB_MAX_CONNECTIONS", "5").parse().unwrap_or(5);

    let redis_host = env_or("REDIS_HOST", "localhost");
    let redis_port = env_or("REDIS_PORT", "6379");
    let redis_password = env_or("REDIS_PASSWORD", "");
    let redis_url = if redis_password.is_empty() {
        format!("redis://{}:{}", redis_host, redis_port)
    } else {
        format!("redis://:{}@{}:{}", redis_password, redis_host, redis_port)
    };

    let port = env_or("PORT", "8080");

    Config {
        bind_address: format!("0.0.0.0:{}", port),
        database_url,
        db_max_connections,
        redis_url,
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
