//! Socket Draining
//!
//! Reads everything currently available from one socket, using an idle
//! timeout as the end-of-message signal. The protocol carries no length or
//! delimiter framing, so "nothing arrived for one idle window" is the only
//! message-boundary heuristic the relay has.

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Maximum bytes pulled per read attempt
pub const DRAIN_CHUNK_SIZE: usize = 4096;

/// Why a drain stopped accumulating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainEnd {
    /// No data arrived within the idle timeout
    TimedOut,
    /// The peer closed the connection (or the socket became unusable)
    PeerClosed,
}

/// The outcome of one drain call: whatever was accumulated, and why the
/// drain stopped. Never an error; a failed read just ends the drain with
/// the partial buffer.
#[derive(Debug, Clone)]
pub struct Drained {
    pub bytes: Bytes,
    pub reason: DrainEnd,
}

impl Drained {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// Read all currently available bytes from `stream`.
///
/// Repeatedly reads up to [`DRAIN_CHUNK_SIZE`] bytes, appending to an
/// accumulating buffer, until a read blocks longer than `idle_timeout` or
/// the peer closes. Read errors terminate the drain and return whatever
/// was accumulated so far; they are never surfaced to the caller.
///
/// The caller must hold exclusive access to the stream for the duration
/// of the call.
pub async fn drain(stream: &mut TcpStream, idle_timeout: Duration) -> Drained {
    let mut buffer = BytesMut::new();
    let mut chunk = [0u8; DRAIN_CHUNK_SIZE];

    loop {
        match timeout(idle_timeout, stream.read(&mut chunk)).await {
            Ok(Ok(0)) => {
                return Drained {
                    bytes: buffer.freeze(),
                    reason: DrainEnd::PeerClosed,
                };
            }
            Ok(Ok(n)) => {
                buffer.extend_from_slice(&chunk[..n]);
            }
            Ok(Err(e)) => {
                debug!("Read error during drain, returning partial buffer: {}", e);
                return Drained {
                    bytes: buffer.freeze(),
                    reason: DrainEnd::PeerClosed,
                };
            }
            Err(_) => {
                return Drained {
                    bytes: buffer.freeze(),
                    reason: DrainEnd::TimedOut,
                };
            }
        }
    }
}
