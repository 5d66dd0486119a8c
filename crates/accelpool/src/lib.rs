//! # accelpool
//!
//! Thread-safe pooling of accelerator execution streams.
//!
//! Device streams are expensive to create. accelpool lets worker code borrow
//! a stream of a given priority, reuses streams that were handed back, and
//! quietly drops streams that have failed so the failure never leaks to an
//! unrelated caller.
//!
//! ## Quick Start
//!
//! ```ignore
//! use accelpool::prelude::*;
//!
//! let executor = CpuExecutor::new(0);
//! let pool = StreamPool::new();
//!
//! {
//!     let mut stream = pool.borrow_stream(&executor, StreamPriority::Highest);
//!     stream.submit(|| Ok::<(), String>(()))?;
//! } // stream returns to the pool here
//!
//! // Same stream, no new device allocation
//! let stream = pool.borrow_stream(&executor, StreamPriority::Highest);
//! assert_eq!(executor.streams_created(), 1);
//! ```
//!
//! ## Backends
//!
//! - **CPU** - Host reference backend (`cpu` feature, on by default)
//!
//! Any device backend plugs in by implementing [`Stream`] and
//! [`StreamExecutor`].
//!
//! ## Lifecycle
//!
//! ```text
//!   Created ──► InUse ──► Idle ──► InUse ──► ...
//!                 │         │
//!                 └────┬────┘
//!                      ▼  (stream reports !is_ok)
//!                  Discarded
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(hidden_glob_reexports)]

// Re-export core types
pub use accelpool_core::*;

// Re-export CPU backend
#[cfg(feature = "cpu")]
pub use accelpool_cpu::{CpuExecutor, CpuStream, CpuStreamError, CpuStreamResult};

/// Stream pool specialized to the CPU backend.
#[cfg(feature = "cpu")]
pub type CpuStreamPool = StreamPool<CpuStream>;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use accelpool_core::prelude::*;

    #[cfg(feature = "cpu")]
    pub use crate::CpuStreamPool;
    #[cfg(feature = "cpu")]
    pub use accelpool_cpu::{CpuExecutor, CpuStream, CpuStreamError};
}
