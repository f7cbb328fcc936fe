use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

/// Which transports the server process exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    /// RPC surface only.
    #[serde(alias = "grpc")]
    Rpc,
    /// HTTP/JSON gateway only, calling the handlers in-process.
    Rest,
    /// Both, with the gateway forwarding to the RPC listener.
    #[default]
    Both,
}

impl FromStr for ServerMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rpc" | "grpc" => Ok(ServerMode::Rpc),
            "rest" => Ok(ServerMode::Rest),
            "" | "both" => Ok(ServerMode::Both),
            other => Err(anyhow!("unknown server mode {other:?}; expected rpc, rest or both")),
        }
    }
}

impl fmt::Display for ServerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServerMode::Rpc => "rpc",
            ServerMode::Rest => "rest",
            ServerMode::Both => "both",
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// 0 binds an ephemeral port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default)]
    pub mode: ServerMode,
    /// Tokio worker threads; unset or 0 uses the runtime default.
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            rpc_port: default_rpc_port(),
            http_port: default_http_port(),
            mode: ServerMode::default(),
            worker_threads: None,
        }
    }
}

/// Values supplied on the command line; `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub rpc_port: Option<u16>,
    pub http_port: Option<u16>,
    pub mode: Option<ServerMode>,
}

/// Optional admin listener serving `/healthz` and `/metrics`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub addr: Option<String>,
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_rpc_port() -> u16 { 8080 }
fn default_http_port() -> u16 { 8081 }

/// Load `$CONFIG_PATH` (default `config.toml`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// File, then process environment, then validation.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override fields from `SERVER_HOST`, `RPC_PORT`, `HTTP_PORT`,
    /// `SERVER_MODE`, `ADMIN_ADDR` and `TOKIO_WORKER_THREADS` as returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RPC_PORT") {
            self.server.rpc_port = parse_port("RPC_PORT", &port)?;
        }
        if let Some(port) = lookup("HTTP_PORT") {
            self.server.http_port = parse_port("HTTP_PORT", &port)?;
        }
        if let Some(mode) = lookup("SERVER_MODE") {
            self.server.mode = mode.parse()?;
        }
        if let Some(addr) = lookup("ADMIN_ADDR") {
            self.admin.addr = Some(addr).filter(|a| !a.trim().is_empty());
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS") {
            let threads = threads
                .trim()
                .parse::<usize>()
                .map_err(|e| anyhow!("TOKIO_WORKER_THREADS must be a number: {e}"))?;
            self.server.worker_threads = Some(threads);
        }
        Ok(())
    }

    /// Last layer: command line values win over file and environment, then
    /// the result is validated again.
    pub fn apply_overrides(&mut self, overrides: Overrides) -> Result<()> {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.rpc_port {
            self.server.rpc_port = port;
        }
        if let Some(port) = overrides.http_port {
            self.server.http_port = port;
        }
        if let Some(mode) = overrides.mode {
            self.server.mode = mode;
        }
        self.normalize_and_validate()
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        Ok(())
    }
}

fn parse_port(var: &str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|e| anyhow!("{var} must be a port number: {e}"))
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.mode == ServerMode::Both && self.rpc_port != 0 && self.rpc_port == self.http_port {
            return Err(anyhow!(
                "rpc_port and http_port must differ in both mode (got {})",
                self.rpc_port
            ));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_file_gives_defaults() -> Result<()> {
        let mut cfg = from_toml_str("")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.rpc_port, 8080);
        assert_eq!(cfg.server.http_port, 8081);
        assert_eq!(cfg.server.mode, ServerMode::Both);
        assert!(cfg.admin.addr.is_none());
        Ok(())
    }

    #[test]
    fn toml_sections_are_read() -> Result<()> {
        let cfg = from_toml_str(
            r#"
            [server]
            host = "127.0.0.1"
            rpc_port = 9000
            http_port = 9001
            mode = "grpc"

            [admin]
            addr = "127.0.0.1:9100"
            "#,
        )?;
        assert_eq!(cfg.server.mode, ServerMode::Rpc);
        assert_eq!(cfg.server.rpc_port, 9000);
        assert_eq!(cfg.admin.addr.as_deref(), Some("127.0.0.1:9100"));
        Ok(())
    }

    #[test]
    fn env_overrides_file() -> Result<()> {
        let mut cfg = from_toml_str("[server]\nrpc_port = 9000\n")?;
        cfg.apply_env(env(&[("RPC_PORT", "7000"), ("SERVER_MODE", "rest"), ("ADMIN_ADDR", "")]))?;
        assert_eq!(cfg.server.rpc_port, 7000);
        assert_eq!(cfg.server.mode, ServerMode::Rest);
        assert!(cfg.admin.addr.is_none());
        Ok(())
    }

    #[test]
    fn bad_env_values_are_errors() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env(env(&[("HTTP_PORT", "eighty")])).is_err());
        assert!(cfg.apply_env(env(&[("SERVER_MODE", "carrier-pigeon")])).is_err());
    }

    #[test]
    fn both_mode_needs_distinct_ports() {
        let mut cfg = AppConfig::default();
        cfg.server.rpc_port = 8080;
        cfg.server.http_port = 8080;
        assert!(cfg.normalize_and_validate().is_err());

        cfg.server.mode = ServerMode::Rpc;
        assert!(cfg.normalize_and_validate().is_ok());

        let mut ephemeral = AppConfig::default();
        ephemeral.server.rpc_port = 0;
        ephemeral.server.http_port = 0;
        assert!(ephemeral.normalize_and_validate().is_ok());
    }

    #[test]
    fn flags_override_env_and_revalidate() -> Result<()> {
        let mut cfg = from_toml_str("[server]\nrpc_port = 7000\n")?;
        cfg.apply_env(env(&[("RPC_PORT", "7100"), ("SERVER_MODE", "rest")]))?;
        cfg.apply_overrides(Overrides {
            rpc_port: Some(9000),
            http_port: Some(9000),
            mode: Some("grpc".parse()?),
            ..Overrides::default()
        })?;
        assert_eq!(cfg.server.rpc_port, 9000);
        assert_eq!(cfg.server.mode, ServerMode::Rpc);

        // Same ports are rejected once the flags leave both transports on.
        let mut cfg = AppConfig::default();
        let err = cfg
            .apply_overrides(Overrides {
                rpc_port: Some(9000),
                http_port: Some(9000),
                ..Overrides::default()
            })
            .unwrap_err();
        assert!(err.to_string().contains("must differ"));
        Ok(())
    }

    #[test]
    fn empty_overrides_keep_loaded_values() -> Result<()> {
        let mut cfg = from_toml_str("[server]\nhost = \"127.0.0.1\"\nhttp_port = 9001\n")?;
        cfg.apply_overrides(Overrides::default())?;
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.http_port, 9001);
        Ok(())
    }

    #[test]
    fn worker_threads_from_env() -> Result<()> {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[("TOKIO_WORKER_THREADS", "0")]))?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.worker_threads, None);

        cfg.apply_env(env(&[("TOKIO_WORKER_THREADS", "4")]))?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert!(cfg.apply_env(env(&[("TOKIO_WORKER_THREADS", "many")])).is_err());
        Ok(())
    }

    #[test]
    fn blank_host_falls_back() -> Result<()> {
        let mut cfg = from_toml_str("[server]\nhost = \"  \"\n")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.host, "0.0.0.0");
        Ok(())
    }
}
