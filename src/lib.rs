// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Solidafy Pager
//!
//! Cursor-driven loading state machine for paged data sources.
//!
//! ## Features
//!
//! - **Cursors**: In-memory and total-count paged cursors with exhaustion detection
//! - **Loading States**: Immutable, nested state values observable through a watch channel
//! - **Pagination Model**: Reload, retry and load-more with empty / exhausted detection
//! - **Activity Tracking**: Shared counter of in-flight fetches
//! - **JSON Listings**: Map parsed JSON pages to totals and results by path
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_pager::{ListingPaths, JsonPageConfiguration, PaginationDataLoadingModel, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let pages = JsonPageConfiguration::new(ListingPaths::default(), |page| fetch_page(page));
//!     let model = PaginationDataLoadingModel::new(pages.into_cursor());
//!
//!     let mut states = model.subscribe();
//!     model.reload().await?;
//!     while !model.state().is_exhausted() {
//!         model.load_more().await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 PaginationDataLoadingModel                   │
//! │       reload()     retry()     load_more()     subscribe()   │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────────┬───────────┴──────────┬────────────────────┐
//! │  DataLoadingModel│   LoadingStrategy    │  ActivityCounter   │
//! ├──────────────────┼──────────────────────┼────────────────────┤
//! │  watch<State>    │   empty checker      │  RAII guards       │
//! │  overlap policy  │   success / failure  │  watch<usize>      │
//! └──────────────────┴──────────────────────┴────────────────────┘
//!                                │
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │          Cursor: StaticCursor | TotalCountCursor             │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Cursors over sequential data sources
pub mod cursor;

/// Loading states
pub mod state;

/// Loading state machines
pub mod model;

/// In-flight fetch counting
pub mod activity;

/// JSON listing mapping
pub mod listing;

/// Model and fixture configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use activity::{ActivityCounter, ActivityGuard};
pub use config::{ModelConfig, ReplayConfig};
pub use cursor::{
    Cursor, ListingResult, ResettableCursor, StaticCursor, TotalCountConfiguration,
    TotalCountCursor,
};
pub use listing::{JsonPageConfiguration, ListingPaths};
pub use model::{
    BasicStrategy, DataLoadingModel, LoadTask, LoadType, LoadingStrategy,
    PaginationDataLoadingModel,
};
pub use state::{LoadingState, StateKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
