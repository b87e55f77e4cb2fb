//! Data loading model module
//!
//! The loading state machine that sits between consumer actions and a cursor.
//!
//! # Overview
//!
//! The model module provides:
//! - `DataLoadingModel` - Generic engine parameterized by a `LoadingStrategy`
//! - `PaginationDataLoadingModel` - Reload / retry / load-more on top of it
//! - `LoadTask` - Handle to a spawned fetch
//!
//! Entering a loading state happens synchronously inside the call that
//! requests the load. The fetch then runs on a tokio task, and its completion
//! publishes the resulting state. Every state is published whole through a
//! `tokio::sync::watch` channel.

mod pagination;
mod strategy;

pub use pagination::{LoadType, PaginationDataLoadingModel, PaginationStrategy};
pub use strategy::{
    BasicStrategy, EmptyResultChecker, FailureTransition, LoadingStrategy, SuccessTransition,
};

use crate::activity::{ActivityCounter, ActivityGuard};
use crate::config::ModelConfig;
use crate::cursor::{Cursor, ResettableCursor};
use crate::error::{Error, Result};
use crate::state::{LoadingState, StateKind};
use crate::types::OverlapPolicy;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

// ============================================================================
// Load Task
// ============================================================================

/// Handle to a load started by the model
///
/// Awaiting it waits for the fetch and the state update that follows. Dropping
/// the handle does not cancel anything; [`LoadTask::abort`] does.
#[derive(Debug)]
pub struct LoadTask {
    handle: Option<JoinHandle<()>>,
}

impl LoadTask {
    fn spawned(handle: JoinHandle<()>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    fn skipped() -> Self {
        Self { handle: None }
    }

    /// Check if the overlap policy ignored this load
    pub fn is_skipped(&self) -> bool {
        self.handle.is_none()
    }

    /// Check if the fetch and its state update are done
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Abort the fetch; the model settles in a `TaskFailed` error unless a
    /// newer load has already superseded this one
    pub fn abort(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

impl Future for LoadTask {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(handle) = self.handle.as_mut() else {
            return Poll::Ready(Ok(()));
        };

        match Pin::new(handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(())) => Poll::Ready(Ok(())),
            // Superseded by a newer load
            Poll::Ready(Err(e)) if e.is_cancelled() => Poll::Ready(Ok(())),
            Poll::Ready(Err(e)) => Poll::Ready(Err(Error::task_failed(e.to_string()))),
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// How a load enters its loading state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    /// Reset the cursor, then `InitialLoading { after: current }`
    Reset,
    /// Reset the cursor, force `Initial`, then `InitialLoading { after: Initial }`
    ResetFromScratch,
    /// Keep the cursor, then `LoadingMore { after: current }`
    Continue,
}

struct Slot<C> {
    cursor: Arc<C>,
    in_flight: Option<AbortHandle>,
}

struct Shared<C: Cursor, S> {
    slot: Mutex<Slot<C>>,
    state: watch::Sender<LoadingState<C::Batch>>,
    strategy: S,
    config: ModelConfig,
    activity: Option<ActivityCounter>,
    generation: AtomicU64,
}

/// Generic loading state machine over one cursor
///
/// Cloning yields another handle to the same model.
pub struct DataLoadingModel<C: ResettableCursor, S: LoadingStrategy<C>> {
    shared: Arc<Shared<C, S>>,
}

impl<C: ResettableCursor, S: LoadingStrategy<C>> Clone for DataLoadingModel<C, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<C: ResettableCursor, S: LoadingStrategy<C>> DataLoadingModel<C, S> {
    /// Create a model with the default configuration
    pub fn new(cursor: C, strategy: S) -> Self {
        Self::builder(cursor, strategy).build()
    }

    /// Start building a model
    pub fn builder(cursor: C, strategy: S) -> DataLoadingModelBuilder<C, S> {
        DataLoadingModelBuilder {
            cursor,
            strategy,
            config: ModelConfig::default(),
            activity: None,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> LoadingState<C::Batch> {
        self.shared.state.borrow().clone()
    }

    /// Discriminant of the current state
    pub fn state_kind(&self) -> StateKind {
        self.shared.state.borrow().kind()
    }

    /// Subscribe to published states
    pub fn subscribe(&self) -> watch::Receiver<LoadingState<C::Batch>> {
        self.shared.state.subscribe()
    }

    /// The live cursor
    pub fn cursor(&self) -> Arc<C> {
        Arc::clone(&self.lock_slot().cursor)
    }

    /// Model configuration
    pub fn config(&self) -> &ModelConfig {
        &self.shared.config
    }

    /// Attached activity counter
    pub fn activity(&self) -> Option<&ActivityCounter> {
        self.shared.activity.as_ref()
    }

    /// Replace the cursor with a fresh one and load its first batch
    pub fn reload(&self) -> LoadTask {
        self.start(Entry::Reset)
    }

    pub(crate) fn start(&self, entry: Entry) -> LoadTask {
        let shared = &self.shared;
        let mut slot = self.lock_slot();

        if shared.config.overlap == OverlapPolicy::IgnoreWhileLoading {
            let loading = shared.state.borrow().is_loading();
            if loading {
                debug!(?entry, "Load ignored, another one is in flight");
                return LoadTask::skipped();
            }
        }

        if entry != Entry::Continue {
            slot.cursor = Arc::new(slot.cursor.reset());
        }
        if entry == Entry::ResetFromScratch {
            shared.state.send_replace(LoadingState::Initial);
        }

        let generation = shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        shared.state.send_modify(|state| {
            let current = std::mem::take(state);
            let next = match entry {
                Entry::Continue => LoadingState::loading_more(current),
                Entry::Reset | Entry::ResetFromScratch => LoadingState::initial_loading(current),
            };
            debug!(generation, state = %next, "Load started");
            *state = next;
        });

        if shared.config.overlap.discards_stale() {
            if let Some(previous) = slot.in_flight.take() {
                previous.abort();
            }
        }

        let completion = Completion {
            shared: Arc::clone(shared),
            cursor: Arc::clone(&slot.cursor),
            generation,
            applied: false,
            _activity: shared.activity.as_ref().map(ActivityCounter::track),
        };
        let handle = tokio::spawn(Self::request_result(completion));
        slot.in_flight = Some(handle.abort_handle());

        LoadTask::spawned(handle)
    }

    async fn request_result(completion: Completion<C, S>) {
        let outcome = AssertUnwindSafe(completion.cursor.load_next_batch())
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(Error::task_failed(panic_message(payload.as_ref()))));

        completion.finish(outcome);
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot<C>> {
        self.shared
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: ResettableCursor, S: LoadingStrategy<C>> Shared<C, S> {
    fn apply(&self, outcome: Result<C::Batch>, cursor: &C, generation: u64) {
        let discards_stale = self.config.overlap.discards_stale();

        self.state.send_if_modified(|state| {
            if discards_stale && self.generation.load(Ordering::SeqCst) != generation {
                debug!(generation, "Discarding stale load completion");
                return false;
            }

            let current = std::mem::take(state);
            let next = self.next_state(current, outcome, cursor);
            debug!(generation, state = %next, "Load finished");
            *state = next;
            true
        });
    }

    fn next_state(
        &self,
        current: LoadingState<C::Batch>,
        outcome: Result<C::Batch>,
        cursor: &C,
    ) -> LoadingState<C::Batch> {
        match outcome {
            Ok(result) if self.strategy.is_result_empty(&result) => LoadingState::Empty,
            Ok(result) => match self.strategy.on_success_transition(cursor) {
                SuccessTransition::Exhausted => LoadingState::Exhausted,
                SuccessTransition::Loaded => {
                    let mut history = accumulated_history(&current);
                    history.push(result.clone());
                    LoadingState::loaded(result, history)
                }
            },
            Err(error) => match self.strategy.classify_failure(&error, &current) {
                FailureTransition::Empty => LoadingState::Empty,
                FailureTransition::Error => {
                    warn!(error = %error, "Load failed");
                    LoadingState::error(error, current.into_rollback_target())
                }
            },
        }
    }
}

/// Outcome slot of one spawned load
///
/// Publishes a `TaskFailed` error if the task is dropped before the fetch
/// finishes. The activity guard is released after the state is published.
struct Completion<C: ResettableCursor, S: LoadingStrategy<C>> {
    shared: Arc<Shared<C, S>>,
    cursor: Arc<C>,
    generation: u64,
    applied: bool,
    _activity: Option<ActivityGuard>,
}

impl<C: ResettableCursor, S: LoadingStrategy<C>> Completion<C, S> {
    fn finish(mut self, outcome: Result<C::Batch>) {
        self.applied = true;
        self.shared.apply(outcome, &self.cursor, self.generation);
    }
}

impl<C: ResettableCursor, S: LoadingStrategy<C>> Drop for Completion<C, S> {
    fn drop(&mut self) {
        if self.applied {
            return;
        }
        debug!(generation = self.generation, "Load dropped before completing");
        self.shared.apply(
            Err(Error::task_failed("load aborted before completing")),
            &self.cursor,
            self.generation,
        );
    }
}

/// Batches a load builds on: the history of the `Loaded` state a load-more
/// started from, nothing for an initial load
fn accumulated_history<R: Clone>(current: &LoadingState<R>) -> Vec<R> {
    match current {
        LoadingState::LoadingMore { after } => after.rollback_target().previous_results().to_vec(),
        _ => Vec::new(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "fetch panicked".to_string()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`DataLoadingModel`]
pub struct DataLoadingModelBuilder<C, S> {
    cursor: C,
    strategy: S,
    config: ModelConfig,
    activity: Option<ActivityCounter>,
}

impl<C: ResettableCursor, S: LoadingStrategy<C>> DataLoadingModelBuilder<C, S> {
    /// Set the model configuration
    #[must_use]
    pub fn config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the overlap policy
    #[must_use]
    pub fn overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.config.overlap = overlap;
        self
    }

    /// Track every fetch on `counter`
    #[must_use]
    pub fn activity(mut self, counter: ActivityCounter) -> Self {
        self.activity = Some(counter);
        self
    }

    /// Build the model in the `Initial` state
    pub fn build(self) -> DataLoadingModel<C, S> {
        let (state, _rx) = watch::channel(LoadingState::Initial);
        DataLoadingModel {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot {
                    cursor: Arc::new(self.cursor),
                    in_flight: None,
                }),
                state,
                strategy: self.strategy,
                config: self.config,
                activity: self.activity,
                generation: AtomicU64::new(0),
            }),
        }
    }
}
