use std::io;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::{Code, Status};
use thiserror::Error;

/// A failed call, rendered as `{"code": ..., "message": ...}` with the HTTP
/// status mapped from the status code.
#[derive(Debug)]
pub struct RpcError(pub Status);

impl From<Status> for RpcError {
    fn from(status: Status) -> Self {
        Self(status)
    }
}

/// HTTP status for a protocol code, following the grpc-gateway mapping.
pub fn http_status(code: Code) -> StatusCode {
    match code {
        Code::InvalidArgument => StatusCode::BAD_REQUEST,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists => StatusCode::CONFLICT,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::Internal | Code::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = http_status(self.0.code());
        (status, Json(self.0)).into_response()
    }
}

/// Unwrap a JSON body, reporting decode failures as `INVALID_ARGUMENT`.
pub fn decode_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Status> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| Status::invalid_argument(rejection.body_text()))
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot build forwarding client: {0}")]
    Client(#[from] client::ClientError),
    #[error(transparent)]
    Io(#[from] io::Error),
}
