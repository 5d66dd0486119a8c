//! CPU stream implementation.

use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use accelpool_core::priority::{PriorityRange, StreamPriority};
use accelpool_core::stream::Stream;

use crate::error::{CpuStreamError, CpuStreamResult};

/// Host-side stream that runs submitted work in order on the calling thread.
///
/// Mirrors the error model of device streams: the first failing task leaves
/// the stream in a sticky error state, and every later submission is
/// rejected.
#[derive(Debug)]
pub struct CpuStream {
    /// Unique id within the creating executor.
    id: u64,
    /// Ordinal of the creating executor.
    ordinal: usize,
    /// Priority class.
    priority: StreamPriority,
    /// Numeric priority resolved against the executor's range.
    device_priority: i32,
    /// Executor's priority range.
    range: PriorityRange,
    /// Whether `init` has run.
    initialized: bool,
    /// First error recorded on the stream.
    error: Option<String>,
    /// Tasks completed successfully.
    completed: u64,
    /// Live stream counter shared with the executor.
    live: Arc<AtomicUsize>,
}

impl CpuStream {
    pub(crate) fn new(
        id: u64,
        ordinal: usize,
        range: PriorityRange,
        live: Arc<AtomicUsize>,
    ) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self {
            id,
            ordinal,
            priority: StreamPriority::Default,
            device_priority: StreamPriority::Default.resolve(range),
            range,
            initialized: false,
            error: None,
            completed: 0,
            live,
        }
    }

    /// Runs `task` on this stream.
    ///
    /// A task error poisons the stream.
    pub fn submit<F, E>(&mut self, task: F) -> CpuStreamResult<()>
    where
        F: FnOnce() -> Result<(), E>,
        E: Display,
    {
        if !self.initialized {
            return Err(CpuStreamError::NotInitialized { id: self.id });
        }
        if let Some(cause) = &self.error {
            return Err(CpuStreamError::Poisoned {
                id: self.id,
                cause: cause.clone(),
            });
        }

        match task() {
            Ok(()) => {
                self.completed += 1;
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(stream = self.id, error = %message, "CPU stream task failed");
                self.error = Some(message.clone());
                Err(CpuStreamError::TaskFailed {
                    id: self.id,
                    message,
                })
            }
        }
    }

    /// Waits for all submitted work and reports the stream's error state.
    ///
    /// Work runs inline, so this only checks for a recorded failure.
    pub fn synchronize(&self) -> CpuStreamResult<()> {
        match &self.error {
            Some(cause) => Err(CpuStreamError::Poisoned {
                id: self.id,
                cause: cause.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Forces the stream into its error state.
    pub fn poison(&mut self, cause: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(cause.into());
        }
    }

    /// Get stream id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get executor ordinal.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Get numeric device priority.
    pub fn device_priority(&self) -> i32 {
        self.device_priority
    }

    /// Check if `init` has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Get number of successfully completed tasks.
    pub fn completed_tasks(&self) -> u64 {
        self.completed
    }

    /// Get the recorded error, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Stream for CpuStream {
    fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn priority(&self) -> StreamPriority {
        self.priority
    }

    fn set_priority(&mut self, priority: StreamPriority) {
        self.priority = priority;
        self.device_priority = priority.resolve(self.range);
    }

    fn init(&mut self) {
        self.initialized = true;
    }

    fn describe(&self) -> String {
        format!("cpu:{}/stream#{}", self.ordinal, self.id)
    }
}

impl Drop for CpuStream {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(stream = self.id, "Destroyed CPU stream");
    }
}
