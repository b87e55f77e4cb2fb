//! Loading state module
//!
//! Describes where a sequence of load operations against one cursor stands.
//!
//! # Overview
//!
//! The state module provides:
//! - `LoadingState` - The closed set of loading states
//! - `StateKind` - Field-less discriminant for logging and matching

mod types;

pub use types::{LoadingState, StateKind};
