//! Loading strategies
//!
//! A strategy supplies the decisions the engine leaves open: what counts as
//! an empty result, what a successful non-empty batch turns into, and how a
//! failure is classified.

use crate::cursor::Cursor;
use crate::error::Error;
use crate::state::LoadingState;

/// Caller-supplied emptiness predicate over a batch
pub type EmptyResultChecker<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// What a successful, non-empty batch turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessTransition {
    /// `Loaded` with the accumulated history
    Loaded,
    /// `Exhausted`
    Exhausted,
}

/// What a failed load turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureTransition {
    /// `Error` carrying the rollback state
    Error,
    /// `Empty`
    Empty,
}

/// Decision hooks of a [`super::DataLoadingModel`]
pub trait LoadingStrategy<C: Cursor>: Send + Sync + 'static {
    /// Check if `result` counts as "no data"
    fn is_result_empty(&self, result: &C::Batch) -> bool;

    /// Transition after a non-empty batch; `cursor` already holds it
    fn on_success_transition(&self, _cursor: &C) -> SuccessTransition {
        SuccessTransition::Loaded
    }

    /// Classify a failure against the state current at completion time
    fn classify_failure(
        &self,
        _error: &Error,
        _state: &LoadingState<C::Batch>,
    ) -> FailureTransition {
        FailureTransition::Error
    }
}

/// Strategy with only an emptiness predicate; every failure is an error
pub struct BasicStrategy<R> {
    empty_result_checker: EmptyResultChecker<R>,
}

impl<R> BasicStrategy<R> {
    /// Create a strategy with the given emptiness predicate
    pub fn new(empty_result_checker: impl Fn(&R) -> bool + Send + Sync + 'static) -> Self {
        Self {
            empty_result_checker: Box::new(empty_result_checker),
        }
    }
}

impl<E: 'static> BasicStrategy<Vec<E>> {
    /// Strategy treating an empty vector as no data
    pub fn vec_is_empty() -> Self {
        Self::new(Vec::is_empty)
    }
}

impl<C: Cursor> LoadingStrategy<C> for BasicStrategy<C::Batch> {
    fn is_result_empty(&self, result: &C::Batch) -> bool {
        (self.empty_result_checker)(result)
    }
}

impl<R> std::fmt::Debug for BasicStrategy<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicStrategy").finish_non_exhaustive()
    }
}
