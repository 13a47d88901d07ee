//! Error types for the cache
//!
//! Reads, writes, deletes and sweeps never fail; only construction does.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised while building a cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The expiration sweeper needs a tokio runtime and none is current
    #[error("no tokio runtime available to run the expiration sweeper")]
    NoRuntime,

    /// Configuration values that cannot be honored
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
