//! CPU stream errors.

/// Errors from CPU stream operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CpuStreamError {
    /// Work was submitted before the stream was initialized.
    #[error("Stream {id} is not initialized")]
    NotInitialized {
        /// Stream id.
        id: u64,
    },

    /// The stream already failed and rejects further work.
    #[error("Stream {id} is in an error state: {cause}")]
    Poisoned {
        /// Stream id.
        id: u64,
        /// First error recorded on the stream.
        cause: String,
    },

    /// A submitted task returned an error.
    #[error("Task on stream {id} failed: {message}")]
    TaskFailed {
        /// Stream id.
        id: u64,
        /// Error reported by the task.
        message: String,
    },
}

/// Result type for CPU stream operations.
pub type CpuStreamResult<T> = Result<T, CpuStreamError>;
