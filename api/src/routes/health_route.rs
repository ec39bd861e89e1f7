//! Liveness and capability endpoints. Static text, no collaborators.

use axum::response::IntoResponse;

/// GET /health — liveness probe.
pub async fn health() -> impl IntoResponse {
    "Gale AI Code Review Bot is running!"
}

/// GET / — capability description.
pub async fn root() -> impl IntoResponse {
    "Gale AI Code Review Bot\nEndpoints:\n- POST /webhook (GitHub webhooks)\n- GET /health (health check)"
}
