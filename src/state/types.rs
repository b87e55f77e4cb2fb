//! Loading state types

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Where a sequence of loads against one cursor currently stands
///
/// `R` is the cursor's batch type. Loading and error states keep the state
/// they were entered from so a failed attempt can roll back to it.
#[derive(Debug, Clone)]
pub enum LoadingState<R> {
    /// No load attempted yet
    Initial,
    /// A first or refresh load is in flight
    InitialLoading {
        /// State the load was started from
        after: Box<LoadingState<R>>,
    },
    /// At least one batch loaded successfully
    Loaded {
        /// Newest batch
        result: R,
        /// Every batch loaded since the last initial load, `result` included
        previous_results: Vec<R>,
    },
    /// A subsequent page is in flight
    LoadingMore {
        /// State the load was started from
        after: Box<LoadingState<R>>,
    },
    /// The cursor has no more data
    Exhausted,
    /// The first successful load returned nothing
    Empty,
    /// A load attempt failed
    Error {
        /// The failure
        error: Arc<Error>,
        /// Settled state the failed attempt started from
        after: Box<LoadingState<R>>,
    },
}

impl<R> Default for LoadingState<R> {
    fn default() -> Self {
        Self::Initial
    }
}

impl<R> LoadingState<R> {
    /// Create an initial-loading state
    pub fn initial_loading(after: Self) -> Self {
        Self::InitialLoading {
            after: Box::new(after),
        }
    }

    /// Create a loading-more state
    pub fn loading_more(after: Self) -> Self {
        Self::LoadingMore {
            after: Box::new(after),
        }
    }

    /// Create a loaded state
    pub fn loaded(result: R, previous_results: Vec<R>) -> Self {
        Self::Loaded {
            result,
            previous_results,
        }
    }

    /// Create an error state
    pub fn error(error: impl Into<Arc<Error>>, after: Self) -> Self {
        Self::Error {
            error: error.into(),
            after: Box::new(after),
        }
    }

    /// Field-less discriminant
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Initial => StateKind::Initial,
            Self::InitialLoading { .. } => StateKind::InitialLoading,
            Self::Loaded { .. } => StateKind::Loaded,
            Self::LoadingMore { .. } => StateKind::LoadingMore,
            Self::Exhausted => StateKind::Exhausted,
            Self::Empty => StateKind::Empty,
            Self::Error { .. } => StateKind::Error,
        }
    }

    /// Check if a load is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::InitialLoading { .. } | Self::LoadingMore { .. })
    }

    /// Check if this is neither a loading nor an error state
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            Self::Initial | Self::Loaded { .. } | Self::Exhausted | Self::Empty
        )
    }

    /// Check if this is the exhausted state
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// State this one was entered from, for loading and error states
    pub fn after(&self) -> Option<&Self> {
        match self {
            Self::InitialLoading { after }
            | Self::LoadingMore { after }
            | Self::Error { after, .. } => Some(after.as_ref()),
            _ => None,
        }
    }

    /// Nearest settled state found by following `after` links
    pub fn rollback_target(&self) -> &Self {
        match self.after() {
            Some(after) => after.rollback_target(),
            None => self,
        }
    }

    /// Owned variant of [`Self::rollback_target`]
    pub fn into_rollback_target(self) -> Self {
        match self {
            Self::InitialLoading { after }
            | Self::LoadingMore { after }
            | Self::Error { after, .. } => after.into_rollback_target(),
            settled => settled,
        }
    }

    /// Newest batch, for loaded states
    pub fn result(&self) -> Option<&R> {
        match self {
            Self::Loaded { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Batch history, empty unless loaded
    pub fn previous_results(&self) -> &[R] {
        match self {
            Self::Loaded {
                previous_results, ..
            } => previous_results,
            _ => &[],
        }
    }

    /// Failure, for error states
    pub fn error_ref(&self) -> Option<&Error> {
        match self {
            Self::Error { error, .. } => Some(error.as_ref()),
            _ => None,
        }
    }
}

/// Errors compare by message; everything else structurally.
impl<R: PartialEq> PartialEq for LoadingState<R> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Initial, Self::Initial)
            | (Self::Exhausted, Self::Exhausted)
            | (Self::Empty, Self::Empty) => true,
            (Self::InitialLoading { after: a }, Self::InitialLoading { after: b })
            | (Self::LoadingMore { after: a }, Self::LoadingMore { after: b }) => a == b,
            (
                Self::Loaded {
                    result: ra,
                    previous_results: pa,
                },
                Self::Loaded {
                    result: rb,
                    previous_results: pb,
                },
            ) => ra == rb && pa == pb,
            (
                Self::Error {
                    error: ea,
                    after: aa,
                },
                Self::Error {
                    error: eb,
                    after: ab,
                },
            ) => (Arc::ptr_eq(ea, eb) || ea.to_string() == eb.to_string()) && aa == ab,
            _ => false,
        }
    }
}

impl<R> fmt::Display for LoadingState<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitialLoading { after } | Self::LoadingMore { after } => {
                write!(f, "{}(after: {after})", self.kind())
            }
            Self::Loaded {
                previous_results, ..
            } => write!(f, "{}(batches: {})", self.kind(), previous_results.len()),
            Self::Error { error, after } => {
                write!(f, "{}({error}, after: {after})", self.kind())
            }
            _ => write!(f, "{}", self.kind()),
        }
    }
}

/// Discriminant of [`LoadingState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateKind {
    /// No load requested yet
    Initial,
    /// First page in flight
    InitialLoading,
    /// Data available, more may follow
    Loaded,
    /// Next page in flight
    LoadingMore,
    /// All data loaded
    Exhausted,
    /// Source holds no data
    Empty,
    /// Last load failed
    Error,
}

impl StateKind {
    /// Name used in logs and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::InitialLoading => "initialLoading",
            Self::Loaded => "loaded",
            Self::LoadingMore => "loadingMore",
            Self::Exhausted => "exhausted",
            Self::Empty => "empty",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
