use std::process::ExitCode;

use clap::Parser;
use configs::{AppConfig, Overrides, ServerMode};
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

/// Users and roles service: RPC listener, HTTP/JSON gateway, or both.
#[derive(Debug, Parser)]
#[command(name = "server", version)]
struct Cli {
    /// Port of the RPC listener
    #[arg(long = "grpc-port", alias = "rpc-port")]
    rpc_port: Option<u16>,

    /// Port of the HTTP/JSON gateway
    #[arg(long)]
    http_port: Option<u16>,

    /// rpc (alias grpc), rest or both
    #[arg(long = "server-type")]
    mode: Option<ServerMode>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,
}

impl From<Cli> for Overrides {
    fn from(cli: Cli) -> Self {
        Overrides {
            host: cli.host,
            rpc_port: cli.rpc_port,
            http_port: cli.http_port,
            mode: cli.mode,
        }
    }
}

fn init_logging() {
    // Load .env first so RUST_LOG and LOG_FORMAT take effect
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = "server", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    // Process context attached to lifecycle events
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // Panics go through tracing so they land in the same log stream
    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "server",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    // config.toml, then environment, then command line flags
    let cfg = match AppConfig::load_and_validate().and_then(|mut cfg| {
        cfg.apply_overrides(cli.into())?;
        Ok(cfg)
    }) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "server", event = "config_invalid", error = %e, "cannot load configuration");
            return ExitCode::FAILURE;
        }
    };

    // Runtime sized by worker_threads when configured
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        mode = %cfg.server.mode,
        rpc_port = cfg.server.rpc_port,
        http_port = cfg.server.http_port,
        "server service starting"
    );

    // Serve in its own task and stop on Ctrl+C
    rt.block_on(async move {
        let server_task = tokio::spawn(server::run(cfg));

        tokio::select! {
            res = server_task => match res {
                Ok(Ok(())) => {
                    info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
                    ExitCode::SUCCESS
                }
                Ok(Err(e)) => {
                    error!(service = "server", event = "run_failed", error = %e, "server::run returned error");
                    ExitCode::FAILURE
                }
                Err(e) => {
                    error!(service = "server", event = "task_join_error", error = %e, "server task join error");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(service = "server", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                ExitCode::SUCCESS
            }
        }
    })
}
