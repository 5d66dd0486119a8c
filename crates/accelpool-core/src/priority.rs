//! Stream priority classes.
//!
//! Every pooled stream carries exactly one [`StreamPriority`]. The pool keeps
//! a separate idle list per class, so a borrow for one class never hands out
//! a stream created for another.

use std::fmt;
use std::str::FromStr;

use crate::error::StreamPoolError;

/// Scheduling tier assigned to a stream when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamPriority {
    /// The device's default priority.
    #[default]
    Default,
    /// Lowest priority the device supports.
    Lowest,
    /// Highest priority the device supports.
    Highest,
}

impl StreamPriority {
    /// Returns the lowercase name of this class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Lowest => "lowest",
            Self::Highest => "highest",
        }
    }

    /// Returns all priority classes.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Default, Self::Lowest, Self::Highest]
    }

    /// Resolves this class to a numeric device priority within `range`.
    ///
    /// `Default` maps to 0, clamped into the range.
    #[must_use]
    pub fn resolve(self, range: PriorityRange) -> i32 {
        match self {
            Self::Default => range.clamp(0),
            Self::Lowest => range.least,
            Self::Highest => range.greatest,
        }
    }
}

impl fmt::Display for StreamPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for StreamPriority {
    type Err = StreamPoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "lowest" | "low" => Ok(Self::Lowest),
            "highest" | "high" => Ok(Self::Highest),
            _ => Err(StreamPoolError::UnknownPriority(s.to_string())),
        }
    }
}

/// Numeric priority bounds reported by a device.
///
/// Follows the accelerator convention where a lower number means a higher
/// priority, so `greatest <= least` on real hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityRange {
    /// Numeric value of the lowest priority.
    pub least: i32,
    /// Numeric value of the highest priority.
    pub greatest: i32,
}

impl PriorityRange {
    /// Creates a new priority range.
    #[must_use]
    pub const fn new(least: i32, greatest: i32) -> Self {
        Self { least, greatest }
    }

    /// Range for devices without priority support.
    #[must_use]
    pub const fn flat() -> Self {
        Self::new(0, 0)
    }

    /// Clamps `value` into this range regardless of its orientation.
    #[must_use]
    pub fn clamp(self, value: i32) -> i32 {
        let lo = self.least.min(self.greatest);
        let hi = self.least.max(self.greatest);
        value.clamp(lo, hi)
    }
}

impl Default for PriorityRange {
    fn default() -> Self {
        // Typical range exposed by current NVIDIA parts.
        Self::new(0, -5)
    }
}
