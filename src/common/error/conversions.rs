//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from dependency
//! error types to the unified Error type.

use super::types::Error;

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidDefinition(format!("invalid pattern: {}", err))
    }
}

#[cfg(feature = "container")]
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ContainerOpen(err.to_string())
    }
}

#[cfg(feature = "container")]
impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::ContainerOpen(format!("archive inspection task failed: {}", err))
    }
}
