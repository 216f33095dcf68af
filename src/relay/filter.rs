//! Payload Filters
//!
//! Direction-specific transform hooks applied to a buffer before it is
//! forwarded. The default is identity; deployments swap in their own
//! implementations for tampering or fuzzing tasks. Dumps always render the
//! buffer as drained, before the filter runs; the filter's result is what
//! gets sent.

use std::sync::Arc;

use bytes::Bytes;

/// A transform applied to one direction of traffic.
///
/// Implementations must not block or fail for well-formed input. Any
/// transformation is permitted, including changing the length.
pub trait PayloadFilter: Send + Sync {
    fn transform(&self, buffer: Bytes) -> Bytes;
}

/// The default filter: forwards bytes unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFilter;

impl PayloadFilter for IdentityFilter {
    fn transform(&self, buffer: Bytes) -> Bytes {
        buffer
    }
}

/// The pair of hooks a session runs, one per direction
#[derive(Clone)]
pub struct FilterPair {
    /// Applied to client -> remote traffic
    pub request: Arc<dyn PayloadFilter>,
    /// Applied to remote -> client traffic
    pub response: Arc<dyn PayloadFilter>,
}

impl Default for FilterPair {
    fn default() -> Self {
        Self {
            request: Arc::new(IdentityFilter),
            response: Arc::new(IdentityFilter),
        }
    }
}
