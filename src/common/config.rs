//! Detector configuration.
//!
//! Scoring weights, the sniffed prefix size and custom definitions can be
//! supplied in code or loaded from YAML:
//!
//! ```yaml
//! scoring:
//!   magic: 50
//!   zip_header: 10
//! prefix_len: 256
//! definitions:
//!   - tag: office
//!     type: word-macro
//!     ext: docm
//!     mime: application/vnd.ms-word.document.macroEnabled.12
//!     magic: "50 4B 03 04"
//!     zipped: ["[Content_Types].xml", "word/vbaProject.bin"]
//! ```

use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};
use crate::definition::DefinitionSpec;

/// Weight of a magic number match.
pub const MAGIC_NUMBER_SCORE: u32 = 50;

/// Bonus for a ZIP archive containing every entry a variant requires.
pub const ZIP_HEADER_SCORE: u32 = 10;

/// Weight of a content pattern or file extension match.
pub const WEAK_SIGNAL_SCORE: u32 = 1;

/// Number of leading bytes decoded for content sniffing.
pub const BUFFER_CHECK_SIZE: usize = 100;

/// Evidence weights per matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scoring {
    pub magic: u32,
    pub content: u32,
    pub file_extension: u32,
    pub zip_header: u32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            magic: MAGIC_NUMBER_SCORE,
            content: WEAK_SIGNAL_SCORE,
            file_extension: WEAK_SIGNAL_SCORE,
            zip_header: ZIP_HEADER_SCORE,
        }
    }
}

/// Full detector configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub scoring: Scoring,
    /// Bytes decoded for content sniffing
    pub prefix_len: usize,
    /// Definitions appended after the built-in table
    pub definitions: Vec<DefinitionSpec>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            scoring: Scoring::default(),
            prefix_len: BUFFER_CHECK_SIZE,
            definitions: Vec::new(),
        }
    }
}

impl DetectorConfig {
    /// Parse a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse detector configuration: {}", e)))
    }

    /// Serialize this configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize detector configuration: {}", e)))
    }
}
