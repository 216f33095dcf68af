//! Hexrelay Library
//!
//! A transparent bidirectional TCP relay for traffic inspection.
//!
//! Accepts inbound client connections, opens a matching outbound connection
//! to a fixed remote endpoint, and forwards bytes in both directions while
//! emitting an offset/hex/ASCII trace of everything that passes through.

pub mod config;
pub mod hexdump;
pub mod listener;
pub mod relay;

pub use config::Config;
pub use listener::Listener;

/// Common error type for the relay
pub type Result<T> = anyhow::Result<T>;
