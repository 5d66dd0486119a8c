//! Owning handle for a borrowed stream.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Weak;

use crate::pool::PoolShared;
use crate::priority::StreamPriority;
use crate::stream::Stream;

/// Exclusive ownership of a stream borrowed from a
/// [`StreamPool`](crate::pool::StreamPool).
///
/// When dropped, the stream goes back to the pool it came from. If that pool
/// has already been dropped, the stream is dropped directly instead.
///
/// The stream returns to the idle list of its priority at drop time, so
/// calling [`Stream::set_priority`] on a borrowed stream moves it to that
/// priority's list.
pub struct PooledStream<S: Stream> {
    /// `Some` until the handle is dropped.
    stream: Option<S>,
    /// Return path only. Never keeps the pool alive.
    pool: Weak<PoolShared<S>>,
}

impl<S: Stream> PooledStream<S> {
    pub(crate) fn new(stream: S, pool: Weak<PoolShared<S>>) -> Self {
        Self {
            stream: Some(stream),
            pool,
        }
    }

    /// Get the borrowed stream.
    pub fn stream(&self) -> &S {
        match self.stream.as_ref() {
            Some(stream) => stream,
            None => unreachable!("pooled stream accessed after drop"),
        }
    }

    /// Get the borrowed stream mutably.
    pub fn stream_mut(&mut self) -> &mut S {
        match self.stream.as_mut() {
            Some(stream) => stream,
            None => unreachable!("pooled stream accessed after drop"),
        }
    }

    /// Priority class of the borrowed stream.
    pub fn priority(&self) -> StreamPriority {
        self.stream().priority()
    }

    /// Check whether the originating pool still exists.
    pub fn is_pool_alive(&self) -> bool {
        self.pool.strong_count() > 0
    }
}

impl<S: Stream> Deref for PooledStream<S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        self.stream()
    }
}

impl<S: Stream> DerefMut for PooledStream<S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stream_mut()
    }
}

impl<S: Stream> Drop for PooledStream<S> {
    fn drop(&mut self) {
        let Some(stream) = self.stream.take() else {
            return;
        };

        match self.pool.upgrade() {
            Some(pool) => pool.reclaim(stream),
            None => {
                tracing::debug!(
                    stream = %stream.describe(),
                    "Stream pool already dropped, releasing stream directly"
                );
                drop(stream);
            }
        }
    }
}

impl<S: Stream + fmt::Debug> fmt::Debug for PooledStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledStream")
            .field("stream", self.stream())
            .field("pool_alive", &self.is_pool_alive())
            .finish()
    }
}
