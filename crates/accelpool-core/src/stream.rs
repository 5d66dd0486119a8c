//! Stream and executor abstractions consumed by the pool.
//!
//! Backends implement these traits for their native stream type. The pool
//! only ever asks a stream for its health and priority; everything else a
//! stream does is opaque to it.

use crate::priority::StreamPriority;

/// An accelerator execution queue that can be pooled.
///
/// Once an operation on a stream fails, the stream is expected to report
/// `is_ok() == false` for the rest of its life. The pool relies on that to
/// decide whether a stream may be handed out again.
pub trait Stream: Send + 'static {
    /// Returns `true` while further operations on the stream are expected
    /// to succeed.
    fn is_ok(&self) -> bool;

    /// Returns the priority class assigned to this stream.
    fn priority(&self) -> StreamPriority;

    /// Assigns a priority class. Called once, before [`Stream::init`].
    fn set_priority(&mut self, priority: StreamPriority);

    /// Finishes device-side initialization of a freshly created stream.
    fn init(&mut self);

    /// Short human-readable identity used in log output.
    fn describe(&self) -> String {
        format!("stream@{}", self.priority())
    }
}

/// A device context able to create new streams.
pub trait StreamExecutor {
    /// Stream type produced by this executor.
    type Stream: Stream;

    /// Allocates a new, uninitialized stream bound to this executor.
    ///
    /// Creation is treated as infallible by the pool; a backend that cannot
    /// allocate a stream must abort rather than return a broken one.
    fn new_stream(&self) -> Self::Stream;

    /// Device ordinal, used for diagnostics.
    fn ordinal(&self) -> usize {
        0
    }
}
