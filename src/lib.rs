//! Filesniff - multi-heuristic file type detection
//!
//! This library classifies a byte buffer, optionally accompanied by a file
//! name, into a file type: a coarse category, a variant name, its extensions
//! and a MIME type.
//!
//! # Features
//!
//! - **Magic numbers**: byte signatures with wildcard positions
//! - **Content patterns**: regular expressions over a decoded text prefix
//! - **Extensions**: case-insensitive matching on the file name
//! - **ZIP verification**: archive entry checks that tell DOCX, XLSX and
//!   PPTX apart from a plain ZIP (`container` feature, async)
//! - **Custom definitions**: extend the built-in table in code or from YAML
//!
//! Detection never fails: when nothing matches, the generic `text/plain`
//! type is returned.
//!
//! # Example - Classifying a buffer
//!
//! ```rust
//! let gif = b"GIF89a\x01\x00\x01\x00";
//! let response = filesniff::parse(gif, None);
//! assert_eq!(response.tag.as_str(), "image");
//! assert_eq!(response.kind, "gif89a");
//! assert_eq!(response.mime, "image/gif");
//! assert_eq!(response.ext.as_deref(), Some("gif"));
//! ```
//!
//! # Example - Verifying an Office archive
//!
//! ```no_run
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("report.docx")?;
//!
//! // The synchronous pass only sees a ZIP signature
//! assert_eq!(filesniff::parse(&bytes, None).kind, "zip");
//!
//! // The async pass looks inside the archive
//! let response = filesniff::parse_async(bytes, None).await;
//! assert_eq!(response.kind, "word");
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Custom definitions
//!
//! ```rust
//! use filesniff::{Detector, Tag, TypeDefinition};
//!
//! # fn main() -> filesniff::Result<()> {
//! let mut detector = Detector::new();
//! detector.add_definitions([
//!     TypeDefinition::new(Tag::Code, "toml", ["toml"], "application/toml")
//!         .try_with_pattern(r"^\s*\[[a-z]+\]")?,
//! ])?;
//!
//! assert_eq!(detector.parse(b"[package]\n", None).kind, "toml");
//! # Ok(())
//! # }
//! ```

use once_cell::sync::Lazy;

/// Shared infrastructure: errors, configuration and text decoding
pub mod common;

/// Type definitions and the built-in table
pub mod definition;

/// Evidence matchers and score ranking
///
/// Each matcher adds its weight to a per-call score table; ranking turns
/// the table into an ordered candidate list.
pub mod detection;

/// The detector that runs the matchers over a registry
pub mod detector;

/// Ordered, append-only definition storage
pub mod registry;

/// Public classification result
pub mod response;

// Re-export commonly used types for convenience
pub use common::{DetectorConfig, Error, Result, Scoring};
pub use definition::{DefinitionId, DefinitionSpec, Tag, TypeDefinition, Zipped};
pub use detection::{Magic, MagicByte, Match, Signature};
pub use detector::Detector;
pub use registry::Registry;
pub use response::Response;

static DEFAULT_DETECTOR: Lazy<Detector> = Lazy::new(Detector::new);

/// The process-wide detector with built-in definitions and default weights.
pub fn default_detector() -> &'static Detector {
    &DEFAULT_DETECTOR
}

/// Classify `buffer` with the default detector. See [`Detector::parse`].
pub fn parse(buffer: &[u8], name: Option<&str>) -> Response {
    DEFAULT_DETECTOR.parse(buffer, name)
}

/// All matches for `buffer` with the default detector, best first.
pub fn parse_all(buffer: &[u8], name: Option<&str>) -> Vec<Response> {
    DEFAULT_DETECTOR.parse_all(buffer, name)
}

/// Classify a file name with the default detector.
pub fn from_name(path: &str) -> Response {
    DEFAULT_DETECTOR.from_name(path)
}

/// Classify `buffer` with the default detector, verifying ZIP-based
/// candidates. See [`Detector::parse_async`].
#[cfg(feature = "container")]
pub async fn parse_async(buffer: impl Into<bytes::Bytes>, name: Option<&str>) -> Response {
    DEFAULT_DETECTOR.parse_async(buffer, name).await
}
