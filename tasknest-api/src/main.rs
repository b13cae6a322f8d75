//! # TaskNest API Server
//!
//! Multi-user task manager over HTTP. Users register, log in for a bearer
//! token and manage their own tasks.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - Registration, login and profile endpoints
//! - Per-user task CRUD with ownership enforcement
//! - A Redis read-through cache in front of PostgreSQL
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tasknest-api
//! ```

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tasknest_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use tasknest_shared::cache::redis::{sanitize_url, RedisCache};
use tasknest_shared::cache::TaskCache;
use tasknest_shared::db::{
    migrations::{ensure_database_exists, run_migrations},
    pool::{close_pool, create_pool, DatabaseConfig},
};
use tasknest_shared::store::postgres::{PgTaskStore, PgUserStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    tracing::info!(
        "TaskNest API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    ensure_database_exists(&config.database.url)
        .await
        .context("Failed to ensure database exists")?;

    let pool = create_pool(
        DatabaseConfig::new(config.database.url.clone())
            .with_max_connections(config.database.max_connections),
    )
    .await
    .context("Failed to connect to database")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let redis_url = sanitize_url(&config.redis.url);
    let redis = RedisCache::connect(config.redis.clone())
        .await
        .with_context(|| format!("Failed to connect to Redis at {}", redis_url))?;

    let cache = TaskCache::with_ttl(
        Arc::new(redis),
        Duration::from_secs(config.cache.ttl_secs),
    );

    let bind_address = config.bind_address();
    let state = AppState::new(
        config,
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(PgTaskStore::new(pool.clone())),
        cache,
    )?;

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    close_pool(pool).await;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tasknest_api=debug,tasknest_shared=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
