//! Listener
//!
//! Binds the local endpoint, accepts connections, and starts one relay
//! session per accepted connection.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::{error, info};

use crate::config::Config;
use crate::relay::{FilterPair, RelaySession};
use crate::Result;

/// Listen backlog for the local socket
pub const LISTEN_BACKLOG: u32 = 5;

/// Accepts client connections and spawns one [`RelaySession`] per
/// connection. Concurrency is unbounded; the accept step is the only
/// serialized point.
pub struct Listener {
    config: Arc<Config>,
    filters: Arc<FilterPair>,
    listener: Option<TcpListener>,
    active_sessions: Arc<AtomicUsize>,
    next_session_id: AtomicUsize,
}

impl Listener {
    /// Create a new listener with the default identity filters
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_filters(config, FilterPair::default())
    }

    /// Create a new listener with custom payload filters
    pub fn with_filters(config: Arc<Config>, filters: FilterPair) -> Self {
        Self {
            config,
            filters: Arc::new(filters),
            listener: None,
            active_sessions: Arc::new(AtomicUsize::new(0)),
            next_session_id: AtomicUsize::new(1),
        }
    }

    /// Bind the configured local address.
    ///
    /// Bind failure is fatal: the error is reported with context and
    /// propagated so the process exits without entering the accept loop.
    pub async fn bind(&mut self) -> Result<()> {
        let bind_addr = self.config.server.bind_addr;

        let socket = match bind_addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .context("Failed to create listening socket")?;
        socket
            .set_reuseaddr(true)
            .context("Failed to set SO_REUSEADDR")?;
        socket
            .bind(bind_addr)
            .with_context(|| format!("Failed to listen on {}", bind_addr))?;
        let listener = socket
            .listen(LISTEN_BACKLOG)
            .with_context(|| format!("Failed to listen on {}", bind_addr))?;

        info!("[*] Listening on {}", listener.local_addr()?);
        self.listener = Some(listener);
        Ok(())
    }

    /// The bound local address, once [`bind`](Self::bind) has succeeded
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener
            .as_ref()
            .and_then(|listener| listener.local_addr().ok())
    }

    /// Number of sessions currently running
    pub fn active_sessions(&self) -> usize {
        self.active_sessions.load(Ordering::Relaxed)
    }

    /// Bind (if not already bound) and accept connections forever.
    ///
    /// Each accepted connection gets its own spawned task; a session that
    /// fails takes down neither the listener nor other sessions. A failed
    /// accept is logged and the loop continues.
    pub async fn start(&mut self) -> Result<()> {
        if self.listener.is_none() {
            self.bind().await?;
        }
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Listener not initialized"))?;

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    info!("[*] Received incoming connection from {}", addr);

                    let session_id = format!(
                        "session_{}",
                        self.next_session_id.fetch_add(1, Ordering::Relaxed)
                    );
                    let config = Arc::clone(&self.config);
                    let filters = Arc::clone(&self.filters);
                    let active_sessions = Arc::clone(&self.active_sessions);

                    tokio::spawn(async move {
                        active_sessions.fetch_add(1, Ordering::Relaxed);

                        let result = match RelaySession::connect(
                            session_id.clone(),
                            stream,
                            addr,
                            &config,
                            filters,
                        )
                        .await
                        {
                            Ok(session) => session.run().await,
                            Err(e) => Err(e),
                        };

                        if let Err(e) = result {
                            error!("Session {} failed: {:#}", session_id, e);
                        }

                        active_sessions.fetch_sub(1, Ordering::Relaxed);
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}
