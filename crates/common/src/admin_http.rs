//! Lightweight admin HTTP server
//!
//! Exposes `/healthz` and `/metrics` endpoints, with metrics provided by caller.

use axum::http::StatusCode;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Renders the metrics body; supplied by whichever crate owns the registry.
pub type MetricsFn = fn() -> (StatusCode, String);

async fn healthz() -> &'static str {
    "OK"
}

/// Router with the admin endpoints.
pub fn admin_router(metrics_fn: MetricsFn) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(move || async move { metrics_fn() }))
}

/// Serve the admin endpoints on an already bound listener in a background task.
pub fn spawn_admin_server(listener: TcpListener, metrics_fn: MetricsFn) -> JoinHandle<()> {
    tokio::spawn(async move {
        match listener.local_addr() {
            Ok(addr) => info!(%addr, "admin server listening"),
            Err(e) => error!(error = %e, "admin listener has no local address"),
        }
        if let Err(e) = axum::serve(listener, admin_router(metrics_fn)).await {
            error!(error = %e, "admin server stopped");
        }
    })
}
