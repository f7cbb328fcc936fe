//! RPC surface: one `POST` route per service method, JSON request and
//! response envelopes, failures rendered through [`RpcError`].

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use models::messages::{
    AddRoleRequest, AddRoleResponse, AddUserRequest, AddUserResponse, FindRoleRequest,
    FindRoleResponse, FindRolesRequest, FindRolesResponse, FindUserRequest, FindUserResponse,
    FindUsersRequest, FindUsersResponse,
};
use service::api::methods;

use crate::errors::{decode_body, RpcError};
use crate::observability::observe;
use crate::routes::{self, AppState};

const TRANSPORT: &str = "rpc";

pub fn router(state: AppState) -> Router {
    let rpc = Router::new()
        .route(methods::ADD_USER, post(add_user))
        .route(methods::FIND_USER, post(find_user))
        .route(methods::FIND_USERS, post(find_users))
        .route(methods::ADD_ROLE, post(add_role))
        .route(methods::FIND_ROLE, post(find_role))
        .route(methods::FIND_ROLES, post(find_roles))
        .route("/health", get(routes::health))
        .with_state(state);
    routes::with_tracing(rpc)
}

async fn add_user(
    State(state): State<AppState>,
    payload: Result<Json<AddUserRequest>, JsonRejection>,
) -> Result<Json<AddUserResponse>, RpcError> {
    let res = observe(TRANSPORT, "AddUser", async {
        let req = decode_body(payload)?;
        state.users.add_user(req).await
    })
    .await?;
    Ok(Json(res))
}

async fn find_user(
    State(state): State<AppState>,
    payload: Result<Json<FindUserRequest>, JsonRejection>,
) -> Result<Json<FindUserResponse>, RpcError> {
    let res = observe(TRANSPORT, "FindUser", async {
        let req = decode_body(payload)?;
        state.users.find_user(req).await
    })
    .await?;
    Ok(Json(res))
}

async fn find_users(
    State(state): State<AppState>,
    payload: Result<Json<FindUsersRequest>, JsonRejection>,
) -> Result<Json<FindUsersResponse>, RpcError> {
    let res = observe(TRANSPORT, "FindUsers", async {
        let req = decode_body(payload)?;
        state.users.find_users(req).await
    })
    .await?;
    Ok(Json(res))
}

async fn add_role(
    State(state): State<AppState>,
    payload: Result<Json<AddRoleRequest>, JsonRejection>,
) -> Result<Json<AddRoleResponse>, RpcError> {
    let res = observe(TRANSPORT, "AddRole", async {
        let req = decode_body(payload)?;
        state.roles.add_role(req).await
    })
    .await?;
    Ok(Json(res))
}

async fn find_role(
    State(state): State<AppState>,
    payload: Result<Json<FindRoleRequest>, JsonRejection>,
) -> Result<Json<FindRoleResponse>, RpcError> {
    let res = observe(TRANSPORT, "FindRole", async {
        let req = decode_body(payload)?;
        state.roles.find_role(req).await
    })
    .await?;
    Ok(Json(res))
}

async fn find_roles(
    State(state): State<AppState>,
    payload: Result<Json<FindRolesRequest>, JsonRejection>,
) -> Result<Json<FindRolesResponse>, RpcError> {
    let res = observe(TRANSPORT, "FindRoles", async {
        let req = decode_body(payload)?;
        state.roles.find_roles(req).await
    })
    .await?;
    Ok(Json(res))
}
