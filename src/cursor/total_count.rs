//! Total-count cursor over a paged source
//!
//! Pages are requested by 1-based number. Each page reports the total number
//! of elements the source holds; the cursor is exhausted once it has
//! accumulated at least that many. Exhaustion is only reported; every
//! `load_next_batch` call still requests the current page.

use super::types::{Cursor, ListingResult, ResettableCursor};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Total count used until the first page reports a real one
pub const UNKNOWN_TOTAL_COUNT: usize = usize::MAX;

const FIRST_PAGE: usize = 1;

/// Describes how to fetch page N and how to read a raw listing
#[async_trait]
pub trait TotalCountConfiguration: Send + Sync + 'static {
    /// Raw response for one page
    type Listing: Send;

    /// Element contained in a listing
    type Element: Clone + Send + Sync + 'static;

    /// Fetch the raw listing for `page` (1-based)
    async fn fetch_page(&self, page: usize) -> Result<Self::Listing>;

    /// Map a raw listing to its total count and results
    fn get_result(&self, listing: Self::Listing) -> Result<ListingResult<Self::Element>>;

    /// Configuration with page counters and cached filters restored
    #[must_use]
    fn reset(&self) -> Self
    where
        Self: Sized;
}

#[derive(Debug)]
struct Accumulation<E> {
    elements: Vec<E>,
    current_page: usize,
    total_count: usize,
}

impl<E> Default for Accumulation<E> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            current_page: FIRST_PAGE,
            total_count: UNKNOWN_TOTAL_COUNT,
        }
    }
}

/// Cursor that accumulates pages until the reported total is reached
///
/// Fetches are not serialized here; the accumulation lock is only held while
/// reading or applying a finished page.
pub struct TotalCountCursor<CC: TotalCountConfiguration> {
    configuration: CC,
    accumulation: Mutex<Accumulation<CC::Element>>,
}

impl<CC: TotalCountConfiguration> TotalCountCursor<CC> {
    /// Create a cursor starting at page 1
    pub fn new(configuration: CC) -> Self {
        Self {
            configuration,
            accumulation: Mutex::new(Accumulation::default()),
        }
    }

    /// The fetch configuration
    pub fn configuration(&self) -> &CC {
        &self.configuration
    }

    /// Next page to fetch (1-based)
    pub fn current_page(&self) -> usize {
        self.accumulation().current_page
    }

    /// Total reported by the last page, or [`UNKNOWN_TOTAL_COUNT`]
    pub fn total_count(&self) -> usize {
        self.accumulation().total_count
    }

    /// Snapshot of all elements accumulated so far
    pub fn elements(&self) -> Vec<CC::Element> {
        self.accumulation().elements.clone()
    }

    fn accumulation(&self) -> MutexGuard<'_, Accumulation<CC::Element>> {
        self.accumulation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<CC: TotalCountConfiguration> std::fmt::Debug for TotalCountCursor<CC> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let accumulation = self.accumulation();
        f.debug_struct("TotalCountCursor")
            .field("count", &accumulation.elements.len())
            .field("current_page", &accumulation.current_page)
            .field("total_count", &accumulation.total_count)
            .finish()
    }
}

#[async_trait]
impl<CC: TotalCountConfiguration> Cursor for TotalCountCursor<CC> {
    type Element = CC::Element;
    type Batch = Vec<CC::Element>;

    fn count(&self) -> usize {
        self.accumulation().elements.len()
    }

    fn exhausted(&self) -> bool {
        let accumulation = self.accumulation();
        accumulation.elements.len() >= accumulation.total_count
    }

    fn element(&self, index: usize) -> Option<CC::Element> {
        self.accumulation().elements.get(index).cloned()
    }

    async fn load_next_batch(&self) -> Result<Vec<CC::Element>> {
        let page = self.current_page();
        debug!(page, "Fetching page");

        let listing = self.configuration.fetch_page(page).await?;
        let ListingResult {
            total_count,
            results,
        } = self.configuration.get_result(listing)?;

        let mut accumulation = self.accumulation();
        accumulation.total_count = total_count;
        accumulation.elements.extend(results.iter().cloned());
        accumulation.current_page += 1;

        debug!(
            page,
            fetched = results.len(),
            count = accumulation.elements.len(),
            total_count,
            "Page applied"
        );

        Ok(results)
    }
}

impl<CC: TotalCountConfiguration> ResettableCursor for TotalCountCursor<CC> {
    fn reset(&self) -> Self {
        Self::new(self.configuration.reset())
    }
}
