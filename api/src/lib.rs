//! HTTP surface for the Gale review bot.
//!
//! One webhook endpoint plus liveness/capability probes. All collaborators
//! (credential strategy, tenant resolver, model client) are constructed once
//! at startup, held in [`AppState`] and injected into handlers by reference —
//! there is no package-level mutable registry.

use std::{env, error::Error, sync::Arc};

mod core;
mod routes;

pub use crate::core::app_state::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::info;

use crate::routes::{
    health_route::{health, root},
    webhook::webhook_route::handle_webhook,
};

/// Builds the application state and serves until Ctrl+C.
pub async fn start() -> Result<(), Box<dyn Error>> {
    let state = Arc::new(AppState::from_env()?);

    let addr = env::var("API_ADDRESS").unwrap_or_else(|_| {
        let port = env::var("PORT").unwrap_or_else(|_| "8080".into());
        format!("0.0.0.0:{port}")
    });

    let app = Router::new()
        .route("/webhook", post(handle_webhook))
        .route("/health", get(health))
        .route("/", get(root))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "starting server");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
