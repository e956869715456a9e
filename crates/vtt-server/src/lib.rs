//! HTTP server for Spieltisch sessions.
//!
//! Exposes the session gateway over axum:
//!
//! - `GET /session/{id}` reads a session
//! - `POST /session/{id}` applies an `{action, payload}` envelope
//! - `DELETE /session/{id}?requesterId=...` deletes (owner only)
//! - `POST /session` provisions a new session
//! - `GET /health` reports liveness

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;

use std::sync::Arc;

use vtt_session::{JsonDirStore, MemoryStore, SessionGateway, SessionStore};

pub use config::{ConfigError, ServerConfig, StoreKind};
pub use error::{ApiError, ErrorBody};
pub use logging::init_logging;
pub use routes::{AppState, build_router};

/// Build the store and gateway described by `config`.
pub async fn build_gateway(config: &ServerConfig) -> anyhow::Result<SessionGateway> {
    let store: Arc<dyn SessionStore> = match config.store {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::Dir => Arc::new(JsonDirStore::open(&config.data_dir).await?),
    };
    Ok(match config.seed {
        Some(seed) => SessionGateway::with_seed(store, seed),
        None => SessionGateway::new(store),
    })
}

/// Serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let gateway = build_gateway(&config).await?;
    let router = build_router(AppState::new(gateway), &config.cors_origins);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(store = ?config.store, "listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
