//! Cursor module
//!
//! Supports: Static (fixed in-memory content), Total Count (paged source with
//! a server-reported total)
//!
//! # Overview
//!
//! A cursor is a sequential source of batches. Each successful
//! `load_next_batch` call materializes more elements until the cursor reports
//! itself exhausted. Cursors are never rewound in place: `reset` hands back a
//! fresh instance over the same configuration.

mod static_cursor;
mod total_count;
mod types;

pub use static_cursor::StaticCursor;
pub use total_count::{TotalCountConfiguration, TotalCountCursor, UNKNOWN_TOTAL_COUNT};
pub use types::{Cursor, ListingResult, ResettableCursor};
