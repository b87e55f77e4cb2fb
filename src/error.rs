//! Error types for Solidafy Pager
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for Solidafy Pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Cursor Errors
    // ============================================================================
    /// The cursor has no further batches to offer
    #[error("Cursor exhausted: no more data available")]
    Exhausted,

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("Fetch failed: {message}")]
    Fetch { message: String },

    #[error("Page {page} fetch failed: {message}")]
    PageFetch { page: usize, message: String },

    #[error("Failed to map listing at '{path}': {message}")]
    Listing { path: String, message: String },

    #[error("Load task failed: {message}")]
    TaskFailed { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a fetch error for a specific page
    pub fn page_fetch(page: usize, message: impl Into<String>) -> Self {
        Self::PageFetch {
            page,
            message: message.into(),
        }
    }

    /// Create a listing mapping error
    pub fn listing(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Listing {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a task failure error
    pub fn task_failed(message: impl Into<String>) -> Self {
        Self::TaskFailed {
            message: message.into(),
        }
    }

    /// Check if this is the cursor exhaustion signal
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Check if repeating the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Fetch { .. } | Error::PageFetch { .. } | Error::TaskFailed { .. } => true,
            Error::Io(_) | Error::Anyhow(_) => true,
            _ => false,
        }
    }
}

/// Result type alias for Solidafy Pager
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::fetch("connection reset");
        assert_eq!(err.to_string(), "Fetch failed: connection reset");

        let err = Error::page_fetch(3, "timeout");
        assert_eq!(err.to_string(), "Page 3 fetch failed: timeout");

        let err = Error::listing("meta.total", "missing field");
        assert_eq!(
            err.to_string(),
            "Failed to map listing at 'meta.total': missing field"
        );

        let err = Error::Exhausted;
        assert_eq!(err.to_string(), "Cursor exhausted: no more data available");
    }

    #[test]
    fn test_is_exhausted() {
        assert!(Error::Exhausted.is_exhausted());
        assert!(!Error::fetch("boom").is_exhausted());
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::fetch("boom").is_retryable());
        assert!(Error::page_fetch(1, "boom").is_retryable());
        assert!(Error::task_failed("panicked").is_retryable());

        assert!(!Error::Exhausted.is_retryable());
        assert!(!Error::listing("results", "not an array").is_retryable());
        assert!(!Error::config("bad").is_retryable());
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: Error = anyhow::anyhow!("upstream said no").into();
        assert_eq!(err.to_string(), "upstream said no");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
