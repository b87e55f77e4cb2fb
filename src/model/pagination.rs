//! Pagination loading model
//!
//! Reload, retry and load-more over a resettable cursor, with exhaustion and
//! empty-result detection layered on the generic engine.

use super::strategy::{EmptyResultChecker, FailureTransition, LoadingStrategy, SuccessTransition};
use super::{DataLoadingModel, DataLoadingModelBuilder, Entry, LoadTask};
use crate::cursor::{Cursor, ResettableCursor};
use crate::error::Error;
use crate::state::{LoadingState, StateKind};
use std::sync::Arc;
use tokio::sync::watch;

/// Kind of load requested from a [`PaginationDataLoadingModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadType {
    /// Reset the cursor and load the first page
    Reload,
    /// Like `Reload`, but always starting over from `Initial`
    Retry,
    /// Load the next page from the same cursor
    Next,
}

/// Strategy used by [`PaginationDataLoadingModel`]
///
/// - a non-empty batch that exhausts the cursor ends in `Exhausted`
/// - `Exhausted` failing the very first load ends in `Empty`
pub struct PaginationStrategy<R> {
    empty_result_checker: EmptyResultChecker<R>,
}

impl<R> PaginationStrategy<R> {
    /// Create a strategy with the given emptiness predicate
    pub fn new(empty_result_checker: impl Fn(&R) -> bool + Send + Sync + 'static) -> Self {
        Self {
            empty_result_checker: Box::new(empty_result_checker),
        }
    }
}

impl<E: 'static> Default for PaginationStrategy<Vec<E>> {
    fn default() -> Self {
        Self::new(Vec::is_empty)
    }
}

impl<C: Cursor> LoadingStrategy<C> for PaginationStrategy<C::Batch> {
    fn is_result_empty(&self, result: &C::Batch) -> bool {
        (self.empty_result_checker)(result)
    }

    fn on_success_transition(&self, cursor: &C) -> SuccessTransition {
        if cursor.exhausted() {
            SuccessTransition::Exhausted
        } else {
            SuccessTransition::Loaded
        }
    }

    fn classify_failure(&self, error: &Error, state: &LoadingState<C::Batch>) -> FailureTransition {
        match (error, state) {
            // Cursor was exhausted right after creation
            (Error::Exhausted, LoadingState::InitialLoading { after })
                if matches!(**after, LoadingState::Initial | LoadingState::Empty) =>
            {
                FailureTransition::Empty
            }
            _ => FailureTransition::Error,
        }
    }
}

impl<R> std::fmt::Debug for PaginationStrategy<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationStrategy").finish_non_exhaustive()
    }
}

/// Paginated loading model
///
/// ```rust,ignore
/// let model = PaginationDataLoadingModel::new(cursor);
/// model.reload().await?;
/// while !model.state().is_exhausted() {
///     model.load_more().await?;
/// }
/// ```
pub struct PaginationDataLoadingModel<C: ResettableCursor> {
    engine: DataLoadingModel<C, PaginationStrategy<C::Batch>>,
}

impl<C: ResettableCursor> Clone for PaginationDataLoadingModel<C> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

impl<C> PaginationDataLoadingModel<C>
where
    C: ResettableCursor<Batch = Vec<<C as Cursor>::Element>>,
{
    /// Create a model treating an empty batch as no data
    pub fn new(cursor: C) -> Self {
        Self::builder(cursor).build().into()
    }

    /// Start building a model treating an empty batch as no data
    pub fn builder(cursor: C) -> DataLoadingModelBuilder<C, PaginationStrategy<C::Batch>> {
        DataLoadingModel::builder(cursor, PaginationStrategy::default())
    }
}

impl<C: ResettableCursor> PaginationDataLoadingModel<C> {
    /// Create a model with a custom emptiness predicate
    pub fn with_empty_checker(
        cursor: C,
        empty_result_checker: impl Fn(&C::Batch) -> bool + Send + Sync + 'static,
    ) -> Self {
        DataLoadingModel::new(cursor, PaginationStrategy::new(empty_result_checker)).into()
    }

    /// Reset the cursor and load the first page
    pub fn reload(&self) -> LoadTask {
        self.load(LoadType::Reload)
    }

    /// Start over from scratch after an error or empty result
    pub fn retry(&self) -> LoadTask {
        self.load(LoadType::Retry)
    }

    /// Load the next page
    ///
    /// # Panics
    ///
    /// Panics if the model is already `Exhausted`; there is nothing left to
    /// load and asking for more is a caller bug.
    pub fn load_more(&self) -> LoadTask {
        self.load(LoadType::Next)
    }

    /// Start a load of the given type
    ///
    /// # Panics
    ///
    /// Panics for [`LoadType::Next`] while the model is `Exhausted`.
    pub fn load(&self, load_type: LoadType) -> LoadTask {
        match load_type {
            LoadType::Reload => self.engine.start(Entry::Reset),
            LoadType::Retry => self.engine.start(Entry::ResetFromScratch),
            LoadType::Next => {
                if self.engine.state_kind() == StateKind::Exhausted {
                    panic!("load_more() called after the model reached the exhausted state");
                }
                self.engine.start(Entry::Continue)
            }
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> LoadingState<C::Batch> {
        self.engine.state()
    }

    /// Discriminant of the current state
    pub fn state_kind(&self) -> StateKind {
        self.engine.state_kind()
    }

    /// Subscribe to published states
    pub fn subscribe(&self) -> watch::Receiver<LoadingState<C::Batch>> {
        self.engine.subscribe()
    }

    /// The live cursor
    pub fn cursor(&self) -> Arc<C> {
        self.engine.cursor()
    }

    /// The underlying engine
    pub fn engine(&self) -> &DataLoadingModel<C, PaginationStrategy<C::Batch>> {
        &self.engine
    }
}

impl<C: ResettableCursor> From<DataLoadingModel<C, PaginationStrategy<C::Batch>>>
    for PaginationDataLoadingModel<C>
{
    fn from(engine: DataLoadingModel<C, PaginationStrategy<C::Batch>>) -> Self {
        Self { engine }
    }
}
