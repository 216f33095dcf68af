//! Configuration Module
//!
//! Handles configuration loading, validation, and CLI/environment merging.

pub mod manager;
pub mod types;

pub use manager::{parse_receive_first, ConfigManager};
pub use types::*;
