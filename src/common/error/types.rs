//! Unified error types for filesniff.
//!
//! Detection itself is total: an unrecognized buffer resolves to the default
//! text response instead of an error. The variants below cover the boundaries
//! around it: registry configuration, the path adapters and the ZIP container.
use thiserror::Error;

use crate::definition::DefinitionId;

/// Main error type for filesniff operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The input handed to an entry point is not a usable buffer source
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A type definition violates a registry invariant
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    /// A definition carries an id that is already registered
    #[error("Duplicate definition id: {0}")]
    DuplicateId(DefinitionId),

    /// The buffer could not be opened as a ZIP archive
    #[error("ZIP error: {0}")]
    ContainerOpen(String),

    /// Configuration could not be parsed or compiled
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for filesniff operations.
pub type Result<T> = std::result::Result<T, Error>;
