//! Client for the RPC surface.
//!
//! [`RpcClient`] implements the same service traits as the in-process
//! handlers, so callers (the demo binary, the gateway in forwarding mode)
//! cannot tell a remote service from a local one. Error bodies are decoded
//! back into [`Status`]; transport failures become `UNAVAILABLE`.

use async_trait::async_trait;
use models::messages::{
    AddRoleRequest, AddRoleResponse, AddUserRequest, AddUserResponse, FindRoleRequest,
    FindRoleResponse, FindRolesRequest, FindRolesResponse, FindUserRequest, FindUserResponse,
    FindUsersRequest, FindUsersResponse,
};
use serde::{de::DeserializeOwned, Serialize};
use service::api::methods;
use service::{Code, RoleService, Status, UserService};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server address {0:?}")]
    InvalidAddress(String),
    #[error("cannot build http client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct RpcClient {
    base_url: String,
    http: reqwest::Client,
}

impl RpcClient {
    /// `address` is `host:port` or a full `http(s)://` base URL.
    pub fn new(address: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Self::with_client(address, http)
    }

    pub fn with_client(address: &str, http: reqwest::Client) -> Result<Self, ClientError> {
        Ok(Self { base_url: normalize_address(address)?, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<Req, Resp>(&self, method: &str, req: &Req) -> Result<Resp, Status>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, method);
        debug!(%url, "rpc call");
        let res = self
            .http
            .post(&url)
            .json(req)
            .send()
            .await
            .map_err(|e| Status::unavailable(format!("cannot reach {url}: {e}")))?;

        let http_status = res.status();
        let body = res
            .bytes()
            .await
            .map_err(|e| Status::unavailable(format!("cannot read response from {url}: {e}")))?;

        if http_status.is_success() {
            serde_json::from_slice(&body)
                .map_err(|e| Status::internal(format!("cannot decode {method} response: {e}")))
        } else {
            Err(decode_error(http_status.as_u16(), &body))
        }
    }
}

fn normalize_address(address: &str) -> Result<String, ClientError> {
    let trimmed = address.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::InvalidAddress(address.to_string()));
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("http://{trimmed}"))
    }
}

/// Turn an error response into a status, falling back to `UNKNOWN` when the
/// body is not a status document.
pub fn decode_error(http_status: u16, body: &[u8]) -> Status {
    serde_json::from_slice::<Status>(body).unwrap_or_else(|_| {
        Status::new(
            Code::Unknown,
            format!("HTTP {http_status}: {}", String::from_utf8_lossy(body)),
        )
    })
}

#[async_trait]
impl UserService for RpcClient {
    async fn add_user(&self, req: AddUserRequest) -> Result<AddUserResponse, Status> {
        self.call(methods::ADD_USER, &req).await
    }

    async fn find_user(&self, req: FindUserRequest) -> Result<FindUserResponse, Status> {
        self.call(methods::FIND_USER, &req).await
    }

    async fn find_users(&self, req: FindUsersRequest) -> Result<FindUsersResponse, Status> {
        self.call(methods::FIND_USERS, &req).await
    }
}

#[async_trait]
impl RoleService for RpcClient {
    async fn add_role(&self, req: AddRoleRequest) -> Result<AddRoleResponse, Status> {
        self.call(methods::ADD_ROLE, &req).await
    }

    async fn find_role(&self, req: FindRoleRequest) -> Result<FindRoleResponse, Status> {
        self.call(methods::FIND_ROLE, &req).await
    }

    async fn find_roles(&self, req: FindRolesRequest) -> Result<FindRolesResponse, Status> {
        self.call(methods::FIND_ROLES, &req).await
    }
}
