use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use client::RpcClient;
use common::admin_http::spawn_admin_server;
use configs::{AppConfig, ServerMode};
use tokio::net::TcpListener;
use tracing::info;

use crate::errors::StartupError;
use crate::observability::encode_metrics;
use crate::routes::AppState;
use crate::{gateway, rpc};

/// Listeners bound for the configured mode, not yet serving.
pub struct Bound {
    rpc: Option<TcpListener>,
    http: Option<TcpListener>,
    admin: Option<TcpListener>,
}

async fn bind_addr(addr: String) -> Result<TcpListener, StartupError> {
    TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })
}

/// Bind every listener the mode needs. Binding happens before serving so
/// ephemeral ports are known up front.
pub async fn bind(cfg: &AppConfig) -> Result<Bound, StartupError> {
    let server = &cfg.server;
    let rpc_addr = format!("{}:{}", server.host, server.rpc_port);
    let http_addr = format!("{}:{}", server.host, server.http_port);

    let (rpc, http) = match server.mode {
        ServerMode::Rpc => (Some(bind_addr(rpc_addr).await?), None),
        ServerMode::Rest => (None, Some(bind_addr(http_addr).await?)),
        ServerMode::Both => (
            Some(bind_addr(rpc_addr).await?),
            Some(bind_addr(http_addr).await?),
        ),
    };
    // Admin listener only when an address is configured
    let admin = match cfg.admin.addr.as_deref() {
        Some(addr) => Some(bind_addr(addr.to_string()).await?),
        None => None,
    };
    Ok(Bound { rpc, http, admin })
}

/// Address to dial for a listener; wildcard binds are reached over loopback.
fn dialable(addr: SocketAddr) -> SocketAddr {
    match addr {
        SocketAddr::V4(a) if a.ip().is_unspecified() => (Ipv4Addr::LOCALHOST, a.port()).into(),
        SocketAddr::V6(a) if a.ip().is_unspecified() => (Ipv6Addr::LOCALHOST, a.port()).into(),
        other => other,
    }
}

impl Bound {
    pub fn rpc_addr(&self) -> Option<SocketAddr> {
        self.rpc.as_ref().and_then(|l| l.local_addr().ok())
    }

    pub fn http_addr(&self) -> Option<SocketAddr> {
        self.http.as_ref().and_then(|l| l.local_addr().ok())
    }

    pub fn admin_addr(&self) -> Option<SocketAddr> {
        self.admin.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Serve until a listener fails.
    pub async fn serve(self) -> Result<(), StartupError> {
        // Health and metrics run beside the transports
        if let Some(admin) = self.admin {
            spawn_admin_server(admin, encode_metrics);
        }

        // One set of stores per process
        let local = AppState::in_memory();
        match (self.rpc, self.http) {
            (Some(rpc_listener), Some(http_listener)) => {
                // Gateway dials the RPC listener it was bound next to
                let rpc_addr = dialable(rpc_listener.local_addr()?);
                let remote = AppState::remote(RpcClient::new(&rpc_addr.to_string())?);
                info!(rpc = %rpc_listener.local_addr()?, http = %http_listener.local_addr()?, "starting RPC server and forwarding gateway");
                tokio::try_join!(
                    async { axum::serve(rpc_listener, rpc::router(local)).await },
                    async { axum::serve(http_listener, gateway::router(remote)).await },
                )?;
            }
            (Some(rpc_listener), None) => {
                info!(addr = %rpc_listener.local_addr()?, "starting RPC server");
                axum::serve(rpc_listener, rpc::router(local)).await?;
            }
            (None, Some(http_listener)) => {
                info!(addr = %http_listener.local_addr()?, "starting gateway server");
                axum::serve(http_listener, gateway::router(local)).await?;
            }
            (None, None) => {
                return Err(StartupError::InvalidConfig("no transport listener bound".into()));
            }
        }
        Ok(())
    }
}

/// Public entry: bind the configured listeners and serve
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    info!(mode = %cfg.server.mode, host = %cfg.server.host, "binding listeners");
    let bound = bind(&cfg).await?;
    // Returns only when a listener fails
    bound.serve().await?;
    Ok(())
}
