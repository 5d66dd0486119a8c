//! # accelpool Core
//!
//! Core traits and pooling logic for reusable accelerator execution streams.
//!
//! Creating a device stream allocates device-side resources, so tearing one
//! down after every unit of work is wasteful. [`StreamPool`] keeps returned
//! streams per priority class and hands them out again, dropping any stream
//! that has entered an error state.
//!
//! ## Core Abstractions
//!
//! - [`Stream`] - A poolable execution queue with a health flag and priority
//! - [`StreamExecutor`] - Device context that creates new streams
//! - [`StreamPool`] - Thread-safe pool, one idle list per priority
//! - [`PooledStream`] - Owning handle that returns its stream on drop
//! - [`StreamPriority`] - Priority class partitioning the pool
//!
//! ## Example
//!
//! ```ignore
//! use accelpool_core::prelude::*;
//!
//! let pool = StreamPool::new();
//! let stream = pool.borrow_stream(&executor, StreamPriority::Default);
//! // ... use the stream; it goes back to the pool when `stream` drops ...
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod error;
pub mod handle;
pub mod pool;
pub mod priority;
pub mod stats;
pub mod stream;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{StreamPoolConfig, StreamPoolConfigBuilder};
    pub use crate::error::{Result, StreamPoolError};
    pub use crate::handle::PooledStream;
    pub use crate::pool::StreamPool;
    pub use crate::priority::{PriorityRange, StreamPriority};
    pub use crate::stats::StreamPoolStats;
    pub use crate::stream::{Stream, StreamExecutor};
}

// Re-exports for convenience
pub use config::{StreamPoolConfig, StreamPoolConfigBuilder};
pub use error::{Result, StreamPoolError};
pub use handle::PooledStream;
pub use pool::StreamPool;
pub use priority::{PriorityRange, StreamPriority};
pub use stats::StreamPoolStats;
pub use stream::{Stream, StreamExecutor};
