//! Public result shape.
//!
//! A [`Response`] is a narrowed projection of a definition: ids, signatures,
//! patterns and scores stay internal.

use serde::{Deserialize, Serialize};

use crate::definition::{Tag, TypeDefinition};

/// Classification result handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Response {
    pub tag: Tag,
    #[serde(rename = "type")]
    pub kind: String,
    /// Canonical extension
    pub ext: Option<String>,
    /// Every accepted extension, canonical first
    pub exts: Vec<String>,
    pub mime: String,
}

impl Response {
    /// Project an optional definition; no definition yields no response.
    pub fn from_definition(definition: Option<&TypeDefinition>) -> Option<Self> {
        definition.map(Self::from)
    }

    /// Top-level media type, e.g. `image` for `image/png`.
    pub fn media(&self) -> &str {
        self.mime.split('/').next().unwrap_or(&self.mime)
    }
}

impl From<&TypeDefinition> for Response {
    fn from(definition: &TypeDefinition) -> Self {
        Self {
            tag: definition.tag().clone(),
            kind: definition.kind().to_string(),
            ext: definition.primary_extension().map(str::to_owned),
            exts: definition.extensions().to_vec(),
            mime: definition.mime().to_string(),
        }
    }
}
