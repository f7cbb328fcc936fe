//! HTTP/JSON gateway: REST-style routes over the same service traits the
//! RPC surface uses. Wired either to local handlers or to an RPC client.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use models::messages::{
    AddRoleRequest, AddRoleResponse, AddUserRequest, AddUserResponse, FindRoleRequest,
    FindRoleResponse, FindRolesRequest, FindRolesResponse, FindUserRequest, FindUserResponse,
    FindUsersRequest, FindUsersResponse,
};
use models::{Role, User};
use tower_http::cors::CorsLayer;

use crate::errors::{decode_body, RpcError};
use crate::observability::observe;
use crate::routes::{self, AppState};

const TRANSPORT: &str = "gateway";

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/v1/users", get(find_users).post(add_user))
        .route("/v1/users/:id", get(find_user))
        .route("/v1/roles", get(find_roles).post(add_role))
        .route("/v1/roles/:name", get(find_role))
        .route("/health", get(routes::health))
        .with_state(state)
        .layer(CorsLayer::very_permissive());
    routes::with_tracing(api)
}

async fn add_user(
    State(state): State<AppState>,
    payload: Result<Json<User>, JsonRejection>,
) -> Result<Json<AddUserResponse>, RpcError> {
    let res = observe(TRANSPORT, "AddUser", async {
        let user = decode_body(payload)?;
        state.users.add_user(AddUserRequest { user }).await
    })
    .await?;
    Ok(Json(res))
}

async fn find_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FindUserResponse>, RpcError> {
    let res = observe(TRANSPORT, "FindUser", state.users.find_user(FindUserRequest { id })).await?;
    Ok(Json(res))
}

async fn find_users(State(state): State<AppState>) -> Result<Json<FindUsersResponse>, RpcError> {
    let res = observe(TRANSPORT, "FindUsers", state.users.find_users(FindUsersRequest {})).await?;
    Ok(Json(res))
}

async fn add_role(
    State(state): State<AppState>,
    payload: Result<Json<Role>, JsonRejection>,
) -> Result<Json<AddRoleResponse>, RpcError> {
    let res = observe(TRANSPORT, "AddRole", async {
        let role = decode_body(payload)?;
        state.roles.add_role(AddRoleRequest { role }).await
    })
    .await?;
    Ok(Json(res))
}

async fn find_role(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<FindRoleResponse>, RpcError> {
    let res = observe(TRANSPORT, "FindRole", state.roles.find_role(FindRoleRequest { name })).await?;
    Ok(Json(res))
}

async fn find_roles(State(state): State<AppState>) -> Result<Json<FindRolesResponse>, RpcError> {
    let res = observe(TRANSPORT, "FindRoles", state.roles.find_roles(FindRolesRequest {})).await?;
    Ok(Json(res))
}
