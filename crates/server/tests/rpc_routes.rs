mod common;

use axum::http::StatusCode;
use axum::Router;
use serde_json::json;
use server::{rpc, AppState};

use common::{post_json, post_raw};

fn app() -> Router {
    rpc::router(AppState::in_memory())
}

#[tokio::test]
async fn add_user_generates_id_and_reads_back() -> anyhow::Result<()> {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/user.UserService/AddUser",
        json!({"user": {"name": "Ashish", "address": "Pune"}}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().unwrap_or_default().to_string();
    assert!(uuid::Uuid::parse_str(&id).is_ok());

    let (status, body) = post_json(&app, "/user.UserService/FindUser", json!({"id": id})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ashish");
    assert_eq!(body["user"]["address"], "Pune");
    assert_eq!(body["user"]["roles"], json!([]));

    let (status, body) = post_json(&app, "/user.UserService/FindUsers", json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn invalid_user_id_is_bad_request() -> anyhow::Result<()> {
    let (status, body) = post_json(
        &app(),
        "/user.UserService/AddUser",
        json!({"user": {"id": "invalid-uuid", "name": "Ashish"}}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
    Ok(())
}

#[tokio::test]
async fn duplicate_user_conflicts() -> anyhow::Result<()> {
    let app = app();
    let id = uuid::Uuid::new_v4().to_string();
    let user = json!({"user": {"id": id, "name": "Pratik", "address": "Mumbai"}});

    let (first, _) = post_json(&app, "/user.UserService/AddUser", user.clone()).await?;
    assert_eq!(first, StatusCode::OK);
    let (second, body) = post_json(&app, "/user.UserService/AddUser", user).await?;
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_EXISTS");
    Ok(())
}

#[tokio::test]
async fn empty_collections_are_not_found() -> anyhow::Result<()> {
    let app = app();
    let (status, body) = post_json(&app, "/user.UserService/FindUsers", json!({})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "no users found");

    let (status, body) = post_json(&app, "/role.RoleService/FindRoles", json!({})).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "no roles found");

    let (status, _) = post_json(
        &app,
        "/user.UserService/FindUser",
        json!({"id": uuid::Uuid::new_v4().to_string()}),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn role_conflict_keeps_original_permissions() -> anyhow::Result<()> {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/role.RoleService/AddRole",
        json!({"role": {"name": "OWNER", "permissions": ["READ", "READWRITE"]}}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "OWNER"}));

    let (status, _) = post_json(
        &app,
        "/role.RoleService/AddRole",
        json!({"role": {"name": "OWNER", "permissions": ["READ"]}}),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = post_json(&app, "/role.RoleService/FindRole", json!({"name": "OWNER"})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"]["permissions"], json!(["READ", "READWRITE"]));
    Ok(())
}

#[tokio::test]
async fn undecodable_requests_are_invalid_arguments() -> anyhow::Result<()> {
    let app = app();
    let (status, body) = post_raw(&app, "/user.UserService/AddUser", "{not json").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, body) = post_json(
        &app,
        "/role.RoleService/AddRole",
        json!({"role": {"name": "GUEST", "permissions": []}}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, body) = post_json(&app, "/role.RoleService/FindRole", json!({"name": "GUEST"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
    Ok(())
}

#[tokio::test]
async fn health_is_served() -> anyhow::Result<()> {
    let (status, body) = common::get(&app(), "/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}
