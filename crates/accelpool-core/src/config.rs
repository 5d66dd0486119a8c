//! Stream pool configuration.

use crate::error::{Result, StreamPoolError};
use crate::priority::StreamPriority;

/// Configuration for a [`StreamPool`](crate::pool::StreamPool).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamPoolConfig {
    /// Pool name, attached to every log event.
    pub name: String,
    /// Priority used by `borrow_default`.
    pub default_priority: StreamPriority,
    /// Initial capacity of each per-priority idle list. Not a limit.
    pub idle_capacity: usize,
}

impl Default for StreamPoolConfig {
    fn default() -> Self {
        Self {
            name: "stream-pool".to_string(),
            default_priority: StreamPriority::Default,
            idle_capacity: 4,
        }
    }
}

impl StreamPoolConfig {
    /// Checks the configuration for values the pool cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(StreamPoolError::InvalidConfig(
                "pool name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for StreamPoolConfig.
#[derive(Debug, Default)]
pub struct StreamPoolConfigBuilder {
    config: StreamPoolConfig,
}

impl StreamPoolConfigBuilder {
    /// Creates a new builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pool name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Sets the priority used by `borrow_default`.
    #[must_use]
    pub fn with_default_priority(mut self, priority: StreamPriority) -> Self {
        self.config.default_priority = priority;
        self
    }

    /// Sets the initial idle list capacity.
    #[must_use]
    pub fn with_idle_capacity(mut self, capacity: usize) -> Self {
        self.config.idle_capacity = capacity;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> StreamPoolConfig {
        self.config
    }
}
