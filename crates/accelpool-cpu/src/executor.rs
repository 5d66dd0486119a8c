//! CPU executor implementation.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{info, trace};

use accelpool_core::priority::PriorityRange;
use accelpool_core::stream::StreamExecutor;

use crate::stream::CpuStream;

/// CPU-based stream executor.
///
/// Stands in for a device context in tests and on hosts without an
/// accelerator. It counts every stream it creates and every one still alive,
/// which makes pool reuse directly observable.
#[derive(Debug)]
pub struct CpuExecutor {
    /// Device ordinal reported in diagnostics.
    ordinal: usize,
    /// Priority range used to resolve stream priorities.
    priority_range: PriorityRange,
    /// Next stream id.
    next_id: AtomicU64,
    /// Streams that are currently alive.
    live: Arc<AtomicUsize>,
}

impl CpuExecutor {
    /// Create a new CPU executor.
    pub fn new(ordinal: usize) -> Self {
        Self::with_priority_range(ordinal, PriorityRange::default())
    }

    /// Create a CPU executor with a specific priority range.
    pub fn with_priority_range(ordinal: usize, priority_range: PriorityRange) -> Self {
        info!(
            ordinal,
            least = priority_range.least,
            greatest = priority_range.greatest,
            "Initializing CPU stream executor"
        );

        Self {
            ordinal,
            priority_range,
            next_id: AtomicU64::new(0),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get device ordinal.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Get priority range.
    pub fn priority_range(&self) -> PriorityRange {
        self.priority_range
    }

    /// Get total number of streams ever created.
    pub fn streams_created(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }

    /// Get number of streams currently alive.
    pub fn live_streams(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl Default for CpuExecutor {
    fn default() -> Self {
        Self::new(0)
    }
}

impl StreamExecutor for CpuExecutor {
    type Stream = CpuStream;

    fn new_stream(&self) -> CpuStream {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        trace!(ordinal = self.ordinal, stream = id, "Creating CPU stream");
        CpuStream::new(id, self.ordinal, self.priority_range, Arc::clone(&self.live))
    }

    fn ordinal(&self) -> usize {
        self.ordinal
    }
}
