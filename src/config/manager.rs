//! Configuration Manager

use super::Config;
use crate::Result;
use anyhow::{bail, Context};
use std::path::Path;

/// Parse the user-supplied receive-first token.
///
/// Only an exact, case-sensitive match of the literal `True` yields true;
/// any other value (`true`, `TRUE`, `false`, empty) yields false. This
/// mirrors the tool's historical startup contract and is kept as a fixed
/// design choice.
pub fn parse_receive_first(token: &str) -> bool {
    token == "True"
}

/// Manages configuration loading and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Config> {
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            config
                .validate()
                .context("Configuration validation failed")?;

            Ok(config)
        } else {
            tracing::warn!(
                "Configuration file not found at {}, using defaults",
                path.display()
            );
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Config> {
        let mut config = Config::default();

        if let Ok(bind_addr) = std::env::var("HEXRELAY_BIND_ADDR") {
            config.server.bind_addr = bind_addr
                .parse()
                .with_context(|| format!("Invalid HEXRELAY_BIND_ADDR: {}", bind_addr))?;
        }

        if let Ok(host) = std::env::var("HEXRELAY_REMOTE_HOST") {
            config.remote.host = host;
        }

        if let Ok(port) = std::env::var("HEXRELAY_REMOTE_PORT") {
            config.remote.port = port
                .parse()
                .with_context(|| format!("Invalid HEXRELAY_REMOTE_PORT: {}", port))?;
        }

        if let Ok(timeout) = std::env::var("HEXRELAY_IDLE_TIMEOUT") {
            config.relay.idle_timeout = humantime::parse_duration(&timeout)
                .with_context(|| format!("Invalid HEXRELAY_IDLE_TIMEOUT: {}", timeout))?;
        }

        if let Ok(token) = std::env::var("HEXRELAY_RECEIVE_FIRST") {
            config.relay.receive_first = parse_receive_first(&token);
        }

        if let Ok(log_level) = std::env::var("HEXRELAY_LOG_LEVEL") {
            config.monitoring.log_level = log_level;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.remote.host.is_empty() {
            bail!("remote.host must not be empty");
        }

        if self.remote.port == 0 {
            bail!("remote.port must be greater than 0");
        }

        if self.relay.idle_timeout.as_millis() == 0 {
            bail!("relay.idle_timeout must be greater than 0");
        }

        if self.relay.idle_timeout.as_secs() > 3600 {
            bail!("relay.idle_timeout cannot exceed 1 hour");
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.monitoring.log_level.as_str()) {
            bail!(
                "monitoring.log_level must be one of: {}",
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }

    /// Merge with CLI arguments (highest priority)
    pub fn merge_with_cli_args(
        &mut self,
        bind: Option<&str>,
        port: Option<u16>,
        remote_host: Option<&str>,
        remote_port: Option<u16>,
        idle_timeout: Option<u64>,
        receive_first: Option<&str>,
    ) {
        // --bind accepts either a bare host or host:port
        if let Some(bind_str) = bind {
            if let Ok(addr) = bind_str.parse::<std::net::SocketAddr>() {
                self.server.bind_addr = addr;
                tracing::info!("CLI override: bind address set to {}", addr);
            } else if let Ok(ip) = bind_str.parse::<std::net::IpAddr>() {
                self.server.bind_addr.set_ip(ip);
                tracing::info!("CLI override: bind host set to {}", ip);
            } else {
                tracing::warn!("Invalid bind address provided: {}", bind_str);
            }
        }

        if let Some(port) = port {
            self.server.bind_addr.set_port(port);
            tracing::info!("CLI override: local port set to {}", port);
        }

        if let Some(host) = remote_host {
            self.remote.host = host.to_string();
            tracing::info!("CLI override: remote host set to {}", host);
        }

        if let Some(port) = remote_port {
            self.remote.port = port;
            tracing::info!("CLI override: remote port set to {}", port);
        }

        if let Some(timeout_secs) = idle_timeout {
            self.relay.idle_timeout = std::time::Duration::from_secs(timeout_secs);
            tracing::info!("CLI override: idle timeout set to {}s", timeout_secs);
        }

        if let Some(token) = receive_first {
            self.relay.receive_first = parse_receive_first(token);
            tracing::info!(
                "CLI override: receive_first set to {}",
                self.relay.receive_first
            );
        }
    }
}
