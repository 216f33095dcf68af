//! Configuration Types

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub remote: RemoteConfig,
    pub relay: RelayConfig,
    pub monitoring: MonitoringConfig,
}

/// Local listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

/// The fixed remote endpoint every session connects out to
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    pub host: String,
    pub port: u16,
}

/// Forwarding-loop configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    /// Read inactivity after which a drain is considered finished.
    /// Higher-latency links need a larger value.
    #[serde(with = "humantime_serde")]
    pub idle_timeout: Duration,
    /// Drain the remote once and relay the result to the client before
    /// the loop starts, for protocols where the remote speaks first
    pub receive_first: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitoringConfig {
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "127.0.0.1:9000".parse().unwrap(),
            },
            remote: RemoteConfig {
                host: "127.0.0.1".to_string(),
                port: 9001,
            },
            relay: RelayConfig {
                idle_timeout: Duration::from_secs(5),
                receive_first: false,
            },
            monitoring: MonitoringConfig {
                log_level: "info".to_string(),
            },
        }
    }
}
