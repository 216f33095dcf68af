//! Hexrelay - Transparent TCP Interception Relay
//!
//! Accepts inbound client connections, opens a matching outbound
//! connection to a fixed remote endpoint, and forwards bytes in both
//! directions while printing a hexdump of everything that passes through.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hexrelay::{config::ConfigManager, Listener};

/// CLI arguments for hexrelay
#[derive(Parser, Debug)]
#[command(name = "hexrelay")]
#[command(about = "Transparent TCP interception relay with hexdump tracing")]
#[command(version)]
#[command(long_about = "
Hexrelay - Transparent TCP Interception Relay

Sits between a client and a remote endpoint, forwarding traffic in both
directions and printing an offset/hex/ASCII trace of every chunk.

Configuration priority (highest to lowest):
1. Command-line arguments
2. Configuration file
3. Environment variables
4. Built-in defaults

Environment variables:
  HEXRELAY_BIND_ADDR     - Local bind address (e.g., 127.0.0.1:9000)
  HEXRELAY_REMOTE_HOST   - Remote host to forward to
  HEXRELAY_REMOTE_PORT   - Remote port to forward to
  HEXRELAY_IDLE_TIMEOUT  - Drain idle timeout (e.g., 5s, 500ms)
  HEXRELAY_RECEIVE_FIRST - Drain the remote before the first client turn
                           (only the literal 'True' enables this)
  HEXRELAY_LOG_LEVEL     - Log level (trace, debug, info, warn, error)

Example:
  hexrelay -b 127.0.0.1 -p 9000 -r 123.123.124.124 -P 9000 --receive-first True
")]
pub struct CliArgs {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "config.toml",
        help = "Path to configuration file"
    )]
    pub config: PathBuf,

    /// Local bind host (overrides config file)
    #[arg(short, long, help = "Local bind host (e.g., 127.0.0.1)")]
    pub bind: Option<String>,

    /// Local bind port (overrides config file)
    #[arg(short, long, help = "Local bind port")]
    pub port: Option<u16>,

    /// Remote host to forward to (overrides config file)
    #[arg(short = 'r', long, help = "Remote host to forward to")]
    pub remote_host: Option<String>,

    /// Remote port to forward to (overrides config file)
    #[arg(short = 'P', long, help = "Remote port to forward to")]
    pub remote_port: Option<u16>,

    /// Drain idle timeout in seconds (overrides config file)
    #[arg(long, help = "Drain idle timeout in seconds")]
    pub idle_timeout: Option<u64>,

    /// Receive-first token; only the literal 'True' enables it
    #[arg(long, help = "Drain the remote first ('True' to enable)")]
    pub receive_first: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", help = "Log level")]
    pub log_level: String,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration and exit")]
    pub validate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    init_tracing(&args)?;

    info!("Starting hexrelay v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with priority: CLI args > config file > environment > defaults
    let mut config = if args.config.exists() {
        ConfigManager::load_from_file(&args.config)?
    } else {
        info!("Config file not found, checking environment variables");
        ConfigManager::load_from_env()?
    };

    config.merge_with_cli_args(
        args.bind.as_deref(),
        args.port,
        args.remote_host.as_deref(),
        args.remote_port,
        args.idle_timeout,
        args.receive_first.as_deref(),
    );

    config
        .validate()
        .context("Final configuration validation failed")?;

    if args.validate_config {
        info!("Configuration is valid");
        info!("Configuration summary:");
        info!("  Bind address: {}", config.server.bind_addr);
        info!("  Remote: {}:{}", config.remote.host, config.remote.port);
        info!("  Idle timeout: {:?}", config.relay.idle_timeout);
        info!("  Receive first: {}", config.relay.receive_first);
        return Ok(());
    }

    info!(
        "Forwarding {} -> {}:{}",
        config.server.bind_addr, config.remote.host, config.remote.port
    );

    let mut listener = Listener::new(Arc::new(config));
    listener.start().await
}

/// Initialize tracing/logging
fn init_tracing(args: &CliArgs) -> Result<()> {
    let log_level = if args.verbose {
        "debug"
    } else {
        &args.log_level
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_ansi(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}
