//! Shared configuration, error and text decoding utilities.

// Submodule declarations
pub mod config;
pub mod encoding;
pub mod error;

// Re-exports for convenience
pub use config::{DetectorConfig, Scoring};
pub use error::{Error, Result};
