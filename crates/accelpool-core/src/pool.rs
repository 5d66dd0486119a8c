//! Priority-partitioned pool of reusable streams.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      StreamPool<S>                           │
//! │  Mutex<HashMap<StreamPriority, Vec<S>>>                      │
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐            │
//! │  │  Default   │   │   Lowest   │   │  Highest   │            │
//! │  │ [s1][s4]   │   │ [s2]       │   │            │            │
//! │  └─────▲──────┘   └────────────┘   └────────────┘            │
//! └────────┼─────────────────────────────────────────────────────┘
//!          │ healthy streams pushed back on drop (LIFO)
//!   ┌──────┴────────┐
//!   │ PooledStream  │── Weak back-reference, never keeps the pool alive
//!   └───────────────┘
//! ```
//!
//! Borrowing pops idle streams from the tail of the requested priority's
//! list until a healthy one turns up; unhealthy ones found on the way are
//! dropped. When nothing usable is idle, a new stream is created through the
//! executor. The lock only covers list manipulation. Stream creation,
//! initialization and destruction always run with the lock released.
//!
//! # Usage
//!
//! ```ignore
//! use accelpool_core::{StreamPool, StreamPriority};
//!
//! let pool = StreamPool::new();
//! {
//!     let stream = pool.borrow_stream(&executor, StreamPriority::Highest);
//!     // ... enqueue work on `stream` ...
//! } // returned to the pool here
//!
//! // Reuses the stream returned above
//! let again = pool.borrow_stream(&executor, StreamPriority::Highest);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::StreamPoolConfig;
use crate::error::Result;
use crate::handle::PooledStream;
use crate::priority::StreamPriority;
use crate::stats::{PoolCounters, StreamPoolStats};
use crate::stream::{Stream, StreamExecutor};

/// State shared between a pool and the handles it has handed out.
pub(crate) struct PoolShared<S: Stream> {
    config: StreamPoolConfig,
    /// Idle streams per priority, most recently returned last.
    idle: Mutex<HashMap<StreamPriority, Vec<S>>>,
    counters: PoolCounters,
}

impl<S: Stream> PoolShared<S> {
    /// Takes a stream back from a dropped handle.
    pub(crate) fn reclaim(&self, stream: S) {
        self.counters.outstanding.fetch_sub(1, Ordering::Relaxed);
        self.return_stream(stream);
    }

    fn return_stream(&self, stream: S) {
        if stream.is_ok() {
            let priority = stream.priority();
            debug!(
                pool = %self.config.name,
                stream = %stream.describe(),
                %priority,
                "StreamPool returning ok stream"
            );
            self.idle
                .lock()
                .entry(priority)
                .or_insert_with(|| Vec::with_capacity(self.config.idle_capacity))
                .push(stream);
            self.counters.returned.fetch_add(1, Ordering::Relaxed);
        } else {
            // A failed stream rejects every later operation; drop it and let
            // a future borrow create a replacement.
            debug!(
                pool = %self.config.name,
                stream = %stream.describe(),
                "StreamPool deleting !ok stream"
            );
            self.counters
                .discarded_on_return
                .fetch_add(1, Ordering::Relaxed);
            drop(stream);
        }
    }

    /// Pops the most recently returned healthy stream for `priority`.
    ///
    /// Unhealthy streams popped along the way are moved into `discarded` so
    /// the caller can drop them after the lock is released.
    fn take_idle(&self, priority: StreamPriority, discarded: &mut Vec<S>) -> Option<S> {
        let mut idle = self.idle.lock();
        let list = idle.get_mut(&priority)?;
        while let Some(candidate) = list.pop() {
            if candidate.is_ok() {
                return Some(candidate);
            }
            discarded.push(candidate);
        }
        None
    }

    fn idle_count(&self, priority: StreamPriority) -> usize {
        self.idle.lock().get(&priority).map_or(0, Vec::len)
    }

    fn total_idle(&self) -> usize {
        self.idle.lock().values().map(Vec::len).sum()
    }
}

impl<S: Stream> Drop for PoolShared<S> {
    fn drop(&mut self) {
        let idle: usize = self.idle.get_mut().values().map(Vec::len).sum();
        if idle > 0 {
            debug!(
                pool = %self.config.name,
                idle,
                "Dropping stream pool, releasing idle streams"
            );
        }
    }
}

/// Thread-safe pool of reusable streams, partitioned by priority.
///
/// Borrowed streams come back automatically when their [`PooledStream`]
/// handle is dropped. Streams that report `!is_ok()` are never handed out
/// again. Handles may outlive the pool; their stream is then dropped
/// directly.
pub struct StreamPool<S: Stream> {
    shared: Arc<PoolShared<S>>,
}

impl<S: Stream> StreamPool<S> {
    /// Creates a pool with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(StreamPoolConfig::default())
    }

    /// Creates a pool from a validated configuration.
    pub fn with_config(config: StreamPoolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: StreamPoolConfig) -> Self {
        info!(
            pool = %config.name,
            default_priority = %config.default_priority,
            "Created stream pool"
        );
        Self {
            shared: Arc::new(PoolShared {
                config,
                idle: Mutex::new(HashMap::new()),
                counters: PoolCounters::default(),
            }),
        }
    }

    /// Borrows a stream of the given priority.
    ///
    /// Reuses the most recently returned healthy stream of that priority if
    /// there is one, otherwise creates, prioritizes and initializes a new
    /// stream on `executor`. Never blocks waiting for other borrowers.
    pub fn borrow_stream<E>(&self, executor: &E, priority: StreamPriority) -> PooledStream<S>
    where
        E: StreamExecutor<Stream = S> + ?Sized,
    {
        let shared = &self.shared;
        shared.counters.borrows.fetch_add(1, Ordering::Relaxed);

        let mut discarded = Vec::new();
        let reused = shared.take_idle(priority, &mut discarded);

        for stream in discarded {
            debug!(
                pool = %shared.config.name,
                stream = %stream.describe(),
                %priority,
                "Stream was not ok, StreamPool deleting"
            );
            shared.counters.discarded_idle.fetch_add(1, Ordering::Relaxed);
            drop(stream);
        }

        let stream = match reused {
            Some(stream) => {
                debug!(
                    pool = %shared.config.name,
                    stream = %stream.describe(),
                    %priority,
                    "StreamPool reusing existing stream"
                );
                shared.counters.reused.fetch_add(1, Ordering::Relaxed);
                stream
            }
            None => {
                let mut stream = executor.new_stream();
                stream.set_priority(priority);
                stream.init();
                debug!(
                    pool = %shared.config.name,
                    stream = %stream.describe(),
                    device = executor.ordinal(),
                    %priority,
                    "StreamPool created new stream"
                );
                shared.counters.created.fetch_add(1, Ordering::Relaxed);
                stream
            }
        };

        shared.counters.outstanding.fetch_add(1, Ordering::Relaxed);
        PooledStream::new(stream, Arc::downgrade(&self.shared))
    }

    /// Borrows a stream at the configured default priority.
    pub fn borrow_default<E>(&self, executor: &E) -> PooledStream<S>
    where
        E: StreamExecutor<Stream = S> + ?Sized,
    {
        self.borrow_stream(executor, self.shared.config.default_priority)
    }

    /// Returns the number of idle streams for a priority.
    #[must_use]
    pub fn idle_count(&self, priority: StreamPriority) -> usize {
        self.shared.idle_count(priority)
    }

    /// Returns the number of idle streams across all priorities.
    #[must_use]
    pub fn total_idle(&self) -> usize {
        self.shared.total_idle()
    }

    /// Returns a statistics snapshot.
    #[must_use]
    pub fn stats(&self) -> StreamPoolStats {
        self.shared.counters.snapshot(self.shared.total_idle())
    }

    /// Returns the pool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shared.config.name
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &StreamPoolConfig {
        &self.shared.config
    }
}

impl<S: Stream> Default for StreamPool<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Stream> fmt::Debug for StreamPool<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamPool")
            .field("name", &self.shared.config.name)
            .field("idle", &self.total_idle())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize};

    /// Minimal stream whose health can be flipped from outside.
    #[derive(Debug)]
    struct TestStream {
        id: u64,
        priority: StreamPriority,
        initialized: bool,
        ok: Arc<AtomicBool>,
        live: Arc<AtomicUsize>,
    }

    impl Drop for TestStream {
        fn drop(&mut self) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    impl TestStream {
        fn fail(&self) {
            self.ok.store(false, Ordering::SeqCst);
        }
    }

    impl Stream for TestStream {
        fn is_ok(&self) -> bool {
            self.ok.load(Ordering::SeqCst)
        }

        fn priority(&self) -> StreamPriority {
            self.priority
        }

        fn set_priority(&mut self, priority: StreamPriority) {
            self.priority = priority;
        }

        fn init(&mut self) {
            self.initialized = true;
        }
    }

    #[derive(Default)]
    struct TestExecutor {
        next_id: AtomicU64,
        live: Arc<AtomicUsize>,
    }

    impl TestExecutor {
        fn created(&self) -> u64 {
            self.next_id.load(Ordering::SeqCst)
        }

        fn live(&self) -> usize {
            self.live.load(Ordering::SeqCst)
        }
    }

    impl StreamExecutor for TestExecutor {
        type Stream = TestStream;

        fn new_stream(&self) -> TestStream {
            self.live.fetch_add(1, Ordering::SeqCst);
            TestStream {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                priority: StreamPriority::Default,
                initialized: false,
                ok: Arc::new(AtomicBool::new(true)),
                live: Arc::clone(&self.live),
            }
        }
    }

    #[test]
    fn test_borrow_creates_initialized_stream() {
        let pool = StreamPool::new();
        let executor = TestExecutor::default();

        let stream = pool.borrow_stream(&executor, StreamPriority::Highest);
        assert!(stream.initialized);
        assert_eq!(stream.priority(), StreamPriority::Highest);
        assert_eq!(executor.created(), 1);
        assert_eq!(pool.idle_count(StreamPriority::Highest), 0);
    }

    #[test]
    fn test_return_then_reuse() {
        let pool = StreamPool::new();
        let executor = TestExecutor::default();

        let first = pool.borrow_stream(&executor, StreamPriority::Default);
        let id = first.id;
        drop(first);
        assert_eq!(pool.idle_count(StreamPriority::Default), 1);

        let second = pool.borrow_stream(&executor, StreamPriority::Default);
        assert_eq!(second.id, id);
        assert_eq!(pool.idle_count(StreamPriority::Default), 0);
        assert_eq!(executor.created(), 1);
    }

    #[test]
    fn test_unhealthy_stream_not_pooled() {
        let pool = StreamPool::new();
        let executor = TestExecutor::default();

        let stream = pool.borrow_stream(&executor, StreamPriority::Default);
        let id = stream.id;
        stream.fail();
        drop(stream);
        assert_eq!(pool.idle_count(StreamPriority::Default), 0);

        let replacement = pool.borrow_stream(&executor, StreamPriority::Default);
        assert_ne!(replacement.id, id);
        assert_eq!(executor.created(), 2);
        assert_eq!(pool.stats().discarded_on_return, 1);
    }

    #[test]
    fn test_scan_discards_streams_that_failed_while_idle() {
        let pool = StreamPool::new();
        let executor = TestExecutor::default();

        let a = pool.borrow_stream(&executor, StreamPriority::Lowest);
        let b = pool.borrow_stream(&executor, StreamPriority::Lowest);
        let c = pool.borrow_stream(&executor, StreamPriority::Lowest);
        let (a_id, b_ok, c_ok) = (a.id, Arc::clone(&b.ok), Arc::clone(&c.ok));
        drop(a);
        drop(b);
        drop(c);
        assert_eq!(pool.idle_count(StreamPriority::Lowest), 3);

        assert_eq!(executor.live(), 3);

        // Idle list is [a, b, c]; c and b fail while idle.
        c_ok.store(false, Ordering::SeqCst);
        b_ok.store(false, Ordering::SeqCst);

        let reused = pool.borrow_stream(&executor, StreamPriority::Lowest);
        assert_eq!(reused.id, a_id);
        assert_eq!(pool.idle_count(StreamPriority::Lowest), 0);
        // Both failed streams are destroyed by the scan.
        assert_eq!(executor.live(), 1);

        let stats = pool.stats();
        assert_eq!(stats.discarded_idle, 2);
        assert_eq!(stats.reused, 1);
        assert_eq!(executor.created(), 3);
    }

    #[test]
    fn test_scan_stops_at_first_healthy_stream() {
        let pool = StreamPool::new();
        let executor = TestExecutor::default();

        let a = pool.borrow_stream(&executor, StreamPriority::Default);
        let b = pool.borrow_stream(&executor, StreamPriority::Default);
        let a_ok = Arc::clone(&a.ok);
        let b_id = b.id;
        drop(a);
        drop(b);

        // `a` is unhealthy but sits below healthy `b`, so it is not visited.
        a_ok.store(false, Ordering::SeqCst);
        let reused = pool.borrow_stream(&executor, StreamPriority::Default);
        assert_eq!(reused.id, b_id);
        assert_eq!(pool.idle_count(StreamPriority::Default), 1);
        assert_eq!(pool.stats().discarded_idle, 0);
    }

    #[test]
    fn test_handle_drop_releases_stream_exactly_once() {
        let executor = TestExecutor::default();
        let pool = StreamPool::new();

        let healthy = pool.borrow_stream(&executor, StreamPriority::Default);
        let failed = pool.borrow_stream(&executor, StreamPriority::Default);
        failed.fail();
        assert_eq!(executor.live(), 2);

        drop(healthy);
        drop(failed);
        assert_eq!(executor.live(), 1);
        assert_eq!(pool.idle_count(StreamPriority::Default), 1);

        let orphan = pool.borrow_stream(&executor, StreamPriority::Default);
        drop(pool);
        assert_eq!(executor.live(), 1);
        drop(orphan);
        assert_eq!(executor.live(), 0);
    }

    #[test]
    fn test_reprioritized_stream_returns_to_new_list() {
        let pool = StreamPool::new();
        let executor = TestExecutor::default();

        let mut stream = pool.borrow_stream(&executor, StreamPriority::Lowest);
        let id = stream.id;
        stream.set_priority(StreamPriority::Highest);
        drop(stream);

        assert_eq!(pool.idle_count(StreamPriority::Lowest), 0);
        assert_eq!(pool.idle_count(StreamPriority::Highest), 1);
        let reused = pool.borrow_stream(&executor, StreamPriority::Highest);
        assert_eq!(reused.id, id);
        assert_eq!(reused.priority(), StreamPriority::Highest);
    }

    #[test]
    fn test_priorities_are_isolated() {
        let pool = StreamPool::new();
        let executor = TestExecutor::default();

        drop(pool.borrow_stream(&executor, StreamPriority::Highest));
        assert_eq!(pool.idle_count(StreamPriority::Highest), 1);

        let low = pool.borrow_stream(&executor, StreamPriority::Lowest);
        assert_eq!(low.priority(), StreamPriority::Lowest);
        assert_eq!(executor.created(), 2);
        assert_eq!(pool.idle_count(StreamPriority::Highest), 1);
    }

    #[test]
    fn test_borrow_default_uses_configured_priority() {
        let config = crate::config::StreamPoolConfigBuilder::new()
            .with_name("defaults")
            .with_default_priority(StreamPriority::Lowest)
            .build();
        let pool = StreamPool::with_config(config).unwrap();
        let executor = TestExecutor::default();

        let stream = pool.borrow_default(&executor);
        assert_eq!(stream.priority(), StreamPriority::Lowest);
        assert_eq!(pool.name(), "defaults");
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = crate::config::StreamPoolConfigBuilder::new()
            .with_name("")
            .build();
        assert!(StreamPool::<TestStream>::with_config(config).is_err());
    }

    #[test]
    fn test_handle_outlives_pool() {
        let executor = TestExecutor::default();
        let pool = StreamPool::new();
        let stream = pool.borrow_stream(&executor, StreamPriority::Default);
        assert!(stream.is_pool_alive());

        drop(pool);
        assert!(!stream.is_pool_alive());
        // Dropping the handle must not touch the destroyed pool.
        drop(stream);
    }

    #[test]
    fn test_stats_track_outstanding() {
        let pool = StreamPool::new();
        let executor = TestExecutor::default();

        let a = pool.borrow_stream(&executor, StreamPriority::Default);
        let b = pool.borrow_stream(&executor, StreamPriority::Default);
        assert_eq!(pool.stats().outstanding, 2);

        drop(a);
        let stats = pool.stats();
        assert_eq!(stats.outstanding, 1);
        assert_eq!(stats.idle, 1);
        assert_eq!(stats.returned, 1);

        drop(b);
        let stats = pool.stats();
        assert_eq!(stats.outstanding, 0);
        assert_eq!(stats.idle, 2);
        assert_eq!(stats.borrows, 2);
        assert_eq!(stats.created, 2);
    }

    #[test]
    fn test_borrow_through_trait_object() {
        let pool = StreamPool::new();
        let executor = TestExecutor::default();
        let dyn_executor: &dyn StreamExecutor<Stream = TestStream> = &executor;

        let stream = pool.borrow_stream(dyn_executor, StreamPriority::Default);
        assert_eq!(stream.id, 0);
    }
}
