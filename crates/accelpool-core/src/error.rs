//! Error types for pool configuration and priority parsing.
//!
//! Borrowing and returning streams never fails; these errors only surface
//! while building a pool or interpreting user-supplied settings.

/// Errors produced by the stream pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamPoolError {
    /// Pool configuration was rejected.
    #[error("Invalid pool configuration: {0}")]
    InvalidConfig(String),

    /// A priority name did not match any known class.
    #[error("Unknown stream priority: {0:?}")]
    UnknownPriority(String),
}

/// Result type for stream pool operations.
pub type Result<T> = std::result::Result<T, StreamPoolError>;
