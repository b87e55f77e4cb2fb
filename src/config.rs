//! Configuration types
//!
//! `ModelConfig` tunes a loading model. `ReplayConfig` describes a fixture
//! of JSON pages for the CLI replay command. Both load from YAML or JSON.

use crate::error::{Error, Result};
use crate::listing::{JsonPageConfiguration, ListingPaths};
use crate::types::OverlapPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

// ============================================================================
// Model Config
// ============================================================================

/// Configuration of a loading model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// How overlapping loads are handled
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

impl ModelConfig {
    /// Create a new model config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overlap policy
    #[must_use]
    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }
}

// ============================================================================
// Replay Config
// ============================================================================

/// A fixture of JSON pages served one per page number
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Model configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Where totals and results live in each page
    #[serde(default)]
    pub listing: ListingPaths,

    /// Raw listings; page N is `pages[N - 1]`
    #[serde(default)]
    pub pages: Vec<Value>,

    /// Pages (1-based) whose first fetch fails
    #[serde(default)]
    pub fail_pages: Vec<usize>,
}

impl ReplayConfig {
    /// Create an empty replay config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a file; `.yaml` / `.yml` parse as YAML, anything else as JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        debug!(path = %path.display(), is_yaml, "Loading replay fixture");
        if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Parse from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the pages
    #[must_use]
    pub fn with_pages(mut self, pages: Vec<Value>) -> Self {
        self.pages = pages;
        self
    }

    /// Set the pages whose first fetch fails
    #[must_use]
    pub fn with_fail_pages(mut self, fail_pages: Vec<usize>) -> Self {
        self.fail_pages = fail_pages;
        self
    }

    /// Set the listing paths
    #[must_use]
    pub fn with_listing(mut self, listing: ListingPaths) -> Self {
        self.listing = listing;
        self
    }

    /// Check the fixture is usable
    pub fn validate(&self) -> Result<()> {
        if self.listing.total_count.trim().is_empty() {
            return Err(Error::config("listing.total_count path must not be empty"));
        }
        if self.listing.results.trim().is_empty() {
            return Err(Error::config("listing.results path must not be empty"));
        }
        if self.fail_pages.contains(&0) {
            return Err(Error::config("fail_pages are 1-based, page 0 does not exist"));
        }
        Ok(())
    }

    /// Page configuration serving this fixture
    ///
    /// Pages past the end fail with [`Error::Exhausted`]. Each page listed in
    /// `fail_pages` fails once, shared across cursor resets.
    pub fn page_configuration(&self) -> JsonPageConfiguration {
        let pages = Arc::new(self.pages.clone());
        let failures: Arc<Mutex<HashSet<usize>>> =
            Arc::new(Mutex::new(self.fail_pages.iter().copied().collect()));

        JsonPageConfiguration::new(self.listing.clone(), move |page| {
            let failed = failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&page);

            let result = if failed {
                Err(Error::page_fetch(page, "simulated failure"))
            } else {
                page.checked_sub(1)
                    .and_then(|index| pages.get(index))
                    .cloned()
                    .ok_or(Error::Exhausted)
            };
            futures::future::ready(result)
        })
    }
}
