//! CPU Backend for accelpool
//!
//! Host-side reference implementation of the accelpool stream traits.
//!
//! [`CpuStream`] runs submitted work in order on the calling thread and
//! follows the device error model: one failing task leaves the stream
//! permanently unusable. [`CpuExecutor`] creates streams and tracks how many
//! exist, so tests and benchmarks can observe pool reuse without hardware.
//!
//! # Example
//!
//! ```ignore
//! use accelpool_core::{StreamPool, StreamPriority};
//! use accelpool_cpu::CpuExecutor;
//!
//! let executor = CpuExecutor::new(0);
//! let pool = StreamPool::new();
//!
//! let mut stream = pool.borrow_stream(&executor, StreamPriority::Default);
//! stream.submit(|| Ok::<(), String>(()))?;
//! ```

#![warn(missing_docs)]

mod error;
mod executor;
mod stream;

pub use error::{CpuStreamError, CpuStreamResult};
pub use executor::CpuExecutor;
pub use stream::CpuStream;
