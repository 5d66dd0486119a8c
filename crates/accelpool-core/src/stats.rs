//! Pool usage counters.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Live counters updated by the pool. Read without taking the pool lock.
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    pub(crate) borrows: AtomicU64,
    pub(crate) reused: AtomicU64,
    pub(crate) created: AtomicU64,
    pub(crate) returned: AtomicU64,
    pub(crate) discarded_on_return: AtomicU64,
    pub(crate) discarded_idle: AtomicU64,
    pub(crate) outstanding: AtomicUsize,
}

impl PoolCounters {
    pub(crate) fn snapshot(&self, idle: usize) -> StreamPoolStats {
        StreamPoolStats {
            borrows: self.borrows.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            created: self.created.load(Ordering::Relaxed),
            returned: self.returned.load(Ordering::Relaxed),
            discarded_on_return: self.discarded_on_return.load(Ordering::Relaxed),
            discarded_idle: self.discarded_idle.load(Ordering::Relaxed),
            outstanding: self.outstanding.load(Ordering::Relaxed),
            idle,
        }
    }
}

/// Point-in-time statistics for a stream pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamPoolStats {
    /// Total borrow calls.
    pub borrows: u64,
    /// Borrows served from an idle list.
    pub reused: u64,
    /// Streams created on a cache miss.
    pub created: u64,
    /// Healthy streams placed back on an idle list.
    pub returned: u64,
    /// Streams dropped because they were unhealthy when returned.
    pub discarded_on_return: u64,
    /// Idle streams dropped during a reuse scan.
    pub discarded_idle: u64,
    /// Handles currently held by callers.
    pub outstanding: usize,
    /// Streams currently idle across all priorities.
    pub idle: usize,
}

impl StreamPoolStats {
    /// Fraction of borrows served from an idle list.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.borrows == 0 {
            0.0
        } else {
            self.reused as f64 / self.borrows as f64
        }
    }

    /// Total streams dropped for being unhealthy.
    #[must_use]
    pub fn discarded(&self) -> u64 {
        self.discarded_on_return + self.discarded_idle
    }
}

impl std::fmt::Display for StreamPoolStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StreamPool: {} borrows ({:.1}% reused), {} created, {} discarded, {} outstanding, {} idle",
            self.borrows,
            self.hit_rate() * 100.0,
            self.created,
            self.discarded(),
            self.outstanding,
            self.idle
        )
    }
}
