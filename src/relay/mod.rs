//! Relay Module
//!
//! The per-connection forwarding machinery: socket draining, payload
//! filtering, and the session loop.

pub mod drain;
pub mod filter;
pub mod session;

pub use drain::{drain, DrainEnd, Drained, DRAIN_CHUNK_SIZE};
pub use filter::{FilterPair, IdentityFilter, PayloadFilter};
pub use session::RelaySession;
