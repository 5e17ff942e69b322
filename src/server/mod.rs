//! HTTP/JSON request layer.
//!
//! A thin axum boundary over the bench core: handlers translate JSON
//! payloads into core operations and [`error::ApiError`] maps failures onto
//! client-visible statuses. The layer holds no state of its own beyond the
//! shared [`Bench`].

pub mod error;
pub mod handlers;
pub mod models;

use crate::bench::Bench;
use crate::error::BenchResult;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The bench core.
    pub bench: Arc<Bench>,
}

/// Assemble the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/scan", post(handlers::scan))
        .route("/api/set_alias", post(handlers::set_alias))
        .route("/api/commands_for_alias", get(handlers::commands_for_alias))
        .route("/api/run", post(handlers::run))
        .route("/api/custom", post(handlers::custom))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> BenchResult<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
