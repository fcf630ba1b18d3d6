//! REST API for computing production plans.
//!
//! Provides one endpoint:
//! - `POST /productionplan`: takes a request payload, returns the plan

mod handlers;
mod types;

use std::net::SocketAddr;

use axum::Router;
use axum::routing::post;
use tracing::info;

pub use types::ErrorResponse;

/// Builds the axum router with all API routes.
///
/// Handlers hold no state; every request is dispatched independently.
pub fn router() -> Router {
    Router::new().route("/productionplan", post(handlers::production_plan))
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server fails while running.
pub async fn serve(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, router()).await
}
