//! JSON listing adapter
//!
//! A [`TotalCountConfiguration`] over an async page source producing already
//! parsed `serde_json::Value` listings. Totals and results are located in the
//! listing by dotted paths (`$.meta.total`, `data.items`, ...).

use crate::cursor::{ListingResult, TotalCountConfiguration, TotalCountCursor};
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Async page source, called with a 1-based page number
pub type PageSource = Arc<dyn Fn(usize) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Where the total count and the results live in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPaths {
    /// Path to the total element count (number or numeric string)
    #[serde(default = "default_total_count_path")]
    pub total_count: String,

    /// Path to the results array
    #[serde(default = "default_results_path")]
    pub results: String,
}

fn default_total_count_path() -> String {
    "total_count".to_string()
}

fn default_results_path() -> String {
    "results".to_string()
}

impl Default for ListingPaths {
    fn default() -> Self {
        Self {
            total_count: default_total_count_path(),
            results: default_results_path(),
        }
    }
}

impl ListingPaths {
    /// Create listing paths
    pub fn new(total_count: impl Into<String>, results: impl Into<String>) -> Self {
        Self {
            total_count: total_count.into(),
            results: results.into(),
        }
    }
}

/// Paged JSON source for a [`TotalCountCursor`]
#[derive(Clone)]
pub struct JsonPageConfiguration {
    source: PageSource,
    paths: ListingPaths,
}

impl JsonPageConfiguration {
    /// Create a configuration from a page fetch function
    pub fn new<F, Fut>(paths: ListingPaths, fetch: F) -> Self
    where
        F: Fn(usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            source: Arc::new(move |page| fetch(page).boxed()),
            paths,
        }
    }

    /// Listing paths in use
    pub fn paths(&self) -> &ListingPaths {
        &self.paths
    }

    /// Wrap into a cursor starting at page 1
    pub fn into_cursor(self) -> TotalCountCursor<Self> {
        TotalCountCursor::new(self)
    }
}

impl std::fmt::Debug for JsonPageConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonPageConfiguration")
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TotalCountConfiguration for JsonPageConfiguration {
    type Listing = Value;
    type Element = Value;

    async fn fetch_page(&self, page: usize) -> Result<Value> {
        (self.source)(page).await
    }

    fn get_result(&self, listing: Value) -> Result<ListingResult<Value>> {
        map_listing(listing, &self.paths)
    }

    fn reset(&self) -> Self {
        self.clone()
    }
}

/// Map a JSON listing to its total count and results
pub fn map_listing(mut listing: Value, paths: &ListingPaths) -> Result<ListingResult<Value>> {
    let total_count = match extract_path(&listing, &paths.total_count) {
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| Error::listing(&paths.total_count, format!("not a count: {n}")))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<usize>()
            .map_err(|e| Error::listing(&paths.total_count, format!("not a count: {e}")))?,
        Some(other) => {
            return Err(Error::listing(
                &paths.total_count,
                format!("expected a number, got {other}"),
            ))
        }
        None => return Err(Error::listing(&paths.total_count, "missing field")),
    };

    let results = match extract_path_mut(&mut listing, &paths.results) {
        Some(Value::Array(items)) => std::mem::take(items),
        Some(Value::Null) => Vec::new(),
        Some(_) => return Err(Error::listing(&paths.results, "expected an array")),
        None => return Err(Error::listing(&paths.results, "missing field")),
    };

    Ok(ListingResult::new(total_count, results))
}

/// Resolve a dotted path (optionally prefixed with `$.`) in a JSON value
pub fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    value.pointer(&to_pointer(path))
}

fn extract_path_mut<'a>(value: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    value.pointer_mut(&to_pointer(path))
}

/// Convert `$.a.b` / `a.b` into the JSON pointer `/a/b`
fn to_pointer(path: &str) -> String {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return String::new();
    }

    path.split('.')
        .map(|part| format!("/{}", part.replace('~', "~0").replace('/', "~1")))
        .collect()
}

#[cfg(test)]
mod tests;
