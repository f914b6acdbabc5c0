//! Unified error types for filesniff.
//!
//! This module provides the single error type surfaced by every fallible
//! entry point of the crate.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
