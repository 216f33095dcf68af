//! Relay Session
//!
//! Owns one accepted client connection and its paired outbound remote
//! connection, and runs the alternating drain-and-forward loop until
//! either direction goes idle with nothing to forward.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::config::Config;
use crate::hexdump;
use crate::relay::drain::drain;
use crate::relay::filter::FilterPair;
use crate::Result;

/// One client/remote connection pair and its forwarding loop.
///
/// The session holds exclusive ownership of both sockets; no other
/// component reads or writes either one. Both are closed when the loop
/// terminates.
pub struct RelaySession {
    session_id: String,
    client: TcpStream,
    client_addr: SocketAddr,
    remote: TcpStream,
    remote_addr: SocketAddr,
    idle_timeout: Duration,
    receive_first: bool,
    filters: Arc<FilterPair>,
    start_time: Instant,
    bytes_up: u64,
    bytes_down: u64,
}

impl RelaySession {
    /// Open the outbound connection and pair it with the accepted client.
    ///
    /// Connect failure is fatal to this session only; the caller decides
    /// how to report it. No retries.
    pub async fn connect(
        session_id: String,
        client: TcpStream,
        client_addr: SocketAddr,
        config: &Config,
        filters: Arc<FilterPair>,
    ) -> Result<Self> {
        let remote_host = config.remote.host.as_str();
        let remote_port = config.remote.port;

        debug!(
            "Session {} connecting to remote {}:{}",
            session_id, remote_host, remote_port
        );

        let remote = TcpStream::connect((remote_host, remote_port))
            .await
            .with_context(|| {
                format!("Failed to connect to remote {}:{}", remote_host, remote_port)
            })?;
        let remote_addr = remote
            .peer_addr()
            .context("Failed to get remote peer address")?;

        info!(
            "Session {} established: {} -> {}",
            session_id, client_addr, remote_addr
        );

        Ok(Self {
            session_id,
            client,
            client_addr,
            remote,
            remote_addr,
            idle_timeout: config.relay.idle_timeout,
            receive_first: config.relay.receive_first,
            filters,
            start_time: Instant::now(),
            bytes_up: 0,
            bytes_down: 0,
        })
    }

    /// Run the session to completion: the optional receive-first exchange,
    /// then the relay loop, then close both sockets.
    ///
    /// The loop terminates as soon as either direction drains empty within
    /// one idle-timeout cycle. That is a heuristic for "the exchange has
    /// finished", not proof of protocol completion; long-idle but still
    /// active connections get truncated. Write errors end the session.
    pub async fn run(mut self) -> Result<()> {
        // Some protocols have the remote speak first (greeting banners);
        // pull that down before the client gets a turn.
        if self.receive_first {
            let drained = drain(&mut self.remote, self.idle_timeout).await;
            if !drained.is_empty() {
                info!(
                    "[<==] Session {} received {} bytes from remote",
                    self.session_id,
                    drained.len()
                );
                hexdump::dump(&drained.bytes);
            }
            let outgoing = self.filters.response.transform(drained.bytes);
            if !outgoing.is_empty() {
                info!(
                    "[<==] Session {} sending {} bytes to client",
                    self.session_id,
                    outgoing.len()
                );
                self.client
                    .write_all(&outgoing)
                    .await
                    .context("Failed to send greeting to client")?;
                self.bytes_down += outgoing.len() as u64;
            }
        }

        loop {
            let local = drain(&mut self.client, self.idle_timeout).await;
            let local_empty = local.is_empty();
            if !local_empty {
                info!(
                    "[==>] Session {} received {} bytes from client",
                    self.session_id,
                    local.len()
                );
                hexdump::dump(&local.bytes);

                let outgoing = self.filters.request.transform(local.bytes);
                self.remote
                    .write_all(&outgoing)
                    .await
                    .context("Failed to forward to remote")?;
                self.bytes_up += outgoing.len() as u64;
                debug!("[==>] Session {} sent to remote", self.session_id);
            }

            let remote = drain(&mut self.remote, self.idle_timeout).await;
            let remote_empty = remote.is_empty();
            if !remote_empty {
                info!(
                    "[<==] Session {} received {} bytes from remote",
                    self.session_id,
                    remote.len()
                );
                hexdump::dump(&remote.bytes);

                let outgoing = self.filters.response.transform(remote.bytes);
                self.client
                    .write_all(&outgoing)
                    .await
                    .context("Failed to forward to client")?;
                self.bytes_down += outgoing.len() as u64;
                debug!("[<==] Session {} sent to client", self.session_id);
            }

            if local_empty || remote_empty {
                info!(
                    "[*] Session {} no more data, closing connections",
                    self.session_id
                );
                break;
            }
        }

        self.close().await;
        Ok(())
    }

    /// Shut down both sockets and log the session summary
    async fn close(&mut self) {
        let _ = self.client.shutdown().await;
        let _ = self.remote.shutdown().await;

        info!(
            session_id = %self.session_id,
            client_addr = %self.client_addr,
            remote_addr = %self.remote_addr,
            duration_ms = self.start_time.elapsed().as_millis() as u64,
            bytes_up = self.bytes_up,
            bytes_down = self.bytes_down,
            "Relay session completed"
        );
    }

    /// Bytes forwarded client -> remote so far
    pub fn bytes_up(&self) -> u64 {
        self.bytes_up
    }

    /// Bytes forwarded remote -> client so far
    pub fn bytes_down(&self) -> u64 {
        self.bytes_down
    }

    /// Session duration since the outbound connection was established
    pub fn duration(&self) -> Duration {
        self.start_time.elapsed()
    }
}
