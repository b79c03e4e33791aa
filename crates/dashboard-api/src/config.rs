//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use dealer_engine::{EngineConfig, EngineError};

const DEFAULT_ADDR: &str = "127.0.0.1:8790";

/// Dashboard API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// Store, source and persistence settings.
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `DASHBOARD_ADDR` | Server bind address | `127.0.0.1:8790` |
    ///
    /// Engine variables (`DEALER_*`) are read by [`EngineConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_addr = env::var("DASHBOARD_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(raw_addr))?;

        Ok(Self {
            addr,
            engine: EngineConfig::from_env()?,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid DASHBOARD_ADDR: {0}")]
    InvalidAddr(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
