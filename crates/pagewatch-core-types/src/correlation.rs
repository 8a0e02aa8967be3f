//! Correlation types for cycle tracking
//!
//! Every scheduled run gets a fresh [`CycleId`] so the start, outcome and
//! end events of one cycle can be grouped even when the output is JSON.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one watch cycle (or the bootstrap fetch)
///
/// UUIDv7 ids sort by creation time, so consecutive cycles are ordered.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CycleId(String);

impl CycleId {
    /// Generate a new time-ordered CycleId
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CycleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
