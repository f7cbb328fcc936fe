use std::sync::Arc;

use axum::{Json, Router};
use client::RpcClient;
use common::types::Health;
use service::role::{InMemoryRoleStore, RoleHandler};
use service::user::{InMemoryUserStore, UserHandler};
use service::{RoleService, UserService};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Services a router dispatches to: local handlers or a remote RPC client.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserService>,
    pub roles: Arc<dyn RoleService>,
}

impl AppState {
    /// Fresh, empty in-memory stores fronted by their handlers.
    pub fn in_memory() -> Self {
        let users = UserHandler::new(Arc::new(InMemoryUserStore::new()));
        let roles = RoleHandler::new(Arc::new(InMemoryRoleStore::new()));
        Self { users: Arc::new(users), roles: Arc::new(roles) }
    }

    /// Forward every call to an RPC endpoint.
    pub fn remote(client: RpcClient) -> Self {
        let client = Arc::new(client);
        Self { users: client.clone(), roles: client }
    }
}

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Request/response tracing shared by both transports.
pub fn with_tracing(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new()
                    .level(Level::INFO)
                    .include_headers(false),
            )
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .include_headers(false),
            )
            // 5xx responses are logged at ERROR
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
