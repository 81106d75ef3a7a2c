use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub handler: HandlerConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Which handler this host process serves, plus its dispatch limits.
///
/// The delay overrides exist so tests and local runs don't have to sit
/// through the mock handlers' full cold-start sleeps.
#[derive(Debug, Clone, Deserialize)]
pub struct HandlerConfig {
    pub name: String,
    pub invoke_timeout_secs: u64,
    pub load_delay_ms: Option<u64>,
    pub generate_delay_ms: Option<u64>,
}

impl HandlerConfig {
    pub fn invoke_timeout(&self) -> Duration {
        Duration::from_secs(self.invoke_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Opaque identity attached to every request this client issues.
    pub caller_id: String,
    /// Number of simultaneous streams per target.
    pub concurrency: usize,
    pub prompt: String,
    pub request_timeout_secs: u64,
    /// Optional cap on invocations per stream; absent means run until
    /// externally stopped.
    pub iterations: Option<u64>,
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    pub name: String,
    pub base_url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("FNHOST__").split("__"));
        Ok(figment.extract()?)
    }
}
