//! Cursor types and traits
//!
//! Defines the core cursor abstractions used by the loading models.

use crate::error::Result;
use async_trait::async_trait;

/// Core trait for batched data sources
#[async_trait]
pub trait Cursor: Send + Sync + 'static {
    /// Element materialized by the cursor
    type Element: Clone + Send + Sync + 'static;

    /// Value produced by one successful `load_next_batch` call
    type Batch: Clone + Send + Sync + 'static;

    /// Number of elements materialized so far
    fn count(&self) -> usize;

    /// Whether no further batches are obtainable
    fn exhausted(&self) -> bool;

    /// Element at `index`, if it has been materialized
    fn element(&self, index: usize) -> Option<Self::Element>;

    /// Fetch the next batch.
    ///
    /// Fails with [`crate::Error::Exhausted`] when the cursor has nothing more
    /// to give. A failed call leaves the cursor untouched.
    async fn load_next_batch(&self) -> Result<Self::Batch>;
}

/// A cursor that can produce a fresh copy of itself
pub trait ResettableCursor: Cursor + Sized {
    /// New cursor with cleared accumulation and the same fetch configuration
    #[must_use]
    fn reset(&self) -> Self;
}

/// A raw listing mapped to its total count and page results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingResult<E> {
    /// Total number of elements the source reports
    pub total_count: usize,
    /// Elements contained in this page
    pub results: Vec<E>,
}

impl<E> ListingResult<E> {
    /// Create a listing result
    pub fn new(total_count: usize, results: Vec<E>) -> Self {
        Self {
            total_count,
            results,
        }
    }

    /// Check if this page has no results
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
