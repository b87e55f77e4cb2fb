//! Common types used throughout Solidafy Pager
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Batch of elements as produced by the bundled cursors
pub type Batch<E> = Vec<E>;

// ============================================================================
// Overlap Policy
// ============================================================================

/// How a model treats a load issued while another one is still in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Every load runs; completions apply in completion order (last wins)
    #[default]
    Concurrent,
    /// A new load aborts the one in flight; stale completions are dropped
    LatestOnly,
    /// A load issued while loading is ignored
    IgnoreWhileLoading,
}

impl OverlapPolicy {
    /// Check if stale completions must be discarded
    pub fn discards_stale(&self) -> bool {
        matches!(self, Self::LatestOnly)
    }
}

impl std::fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Concurrent => write!(f, "concurrent"),
            Self::LatestOnly => write!(f, "latest_only"),
            Self::IgnoreWhileLoading => write!(f, "ignore_while_loading"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_policy_default() {
        assert_eq!(OverlapPolicy::default(), OverlapPolicy::Concurrent);
        assert!(!OverlapPolicy::Concurrent.discards_stale());
        assert!(OverlapPolicy::LatestOnly.discards_stale());
    }

    #[test]
    fn test_overlap_policy_serde() {
        let policy: OverlapPolicy = serde_json::from_str("\"ignore_while_loading\"").unwrap();
        assert_eq!(policy, OverlapPolicy::IgnoreWhileLoading);
        assert_eq!(
            serde_json::to_string(&OverlapPolicy::LatestOnly).unwrap(),
            "\"latest_only\""
        );
        assert_eq!(OverlapPolicy::LatestOnly.to_string(), "latest_only");
    }
}
