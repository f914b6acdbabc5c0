//! Type definitions: the unit of knowledge about one file type variant.
//!
//! A definition bundles the surface facts (category, variant name, extensions,
//! MIME type) with the evidence sources the matchers consult: an optional
//! magic spec, an optional text pattern and an optional ZIP marker.

// Submodule declarations
pub mod builtin;
pub mod spec;

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::detection::magic::Magic;

// Re-exports
pub use spec::{DefinitionSpec, MagicSpec, OneOrMany, ZippedSpec};

/// Registry-assigned key of a definition.
///
/// Ids are handed out by a monotonic counter, so identical registration
/// sequences always yield identical ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionId(u32);

impl DefinitionId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse category of a file type.
///
/// The built-in table uses the named variants; custom definitions may bring
/// any other category, which round-trips through [`Tag::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tag {
    Image,
    Video,
    Audio,
    Compressed,
    Office,
    Code,
    Text,
    /// A category outside the built-in set, stored lowercase
    Other(String),
}

impl Tag {
    pub fn as_str(&self) -> &str {
        match self {
            Tag::Image => "image",
            Tag::Video => "video",
            Tag::Audio => "audio",
            Tag::Compressed => "compressed",
            Tag::Office => "office",
            Tag::Code => "code",
            Tag::Text => "text",
            Tag::Other(name) => name,
        }
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "image" => Tag::Image,
            "video" => Tag::Video,
            "audio" => Tag::Audio,
            "compressed" => Tag::Compressed,
            "office" => Tag::Office,
            "code" => Tag::Code,
            "text" => Tag::Text,
            other => Tag::Other(other.to_string()),
        }
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Tag::from(name.as_str())
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ZIP-family marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Zipped {
    /// Any ZIP archive qualifies
    Any,
    /// Every listed entry path must exist in the archive
    Entries(Vec<String>),
}

impl Zipped {
    /// Build an entry requirement from paths.
    pub fn entries<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Zipped::Entries(paths.into_iter().map(Into::into).collect())
    }

    /// Required entry paths, if this marker names any.
    pub fn required_entries(&self) -> Option<&[String]> {
        match self {
            Zipped::Any => None,
            Zipped::Entries(paths) => Some(paths),
        }
    }
}

/// One file type variant.
///
/// Fields are read through accessors; definitions change only while being
/// built or when the registry assigns their id.
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    id: Option<DefinitionId>,
    tag: Tag,
    kind: String,
    extensions: Vec<String>,
    mime: String,
    magic: Option<Magic>,
    pattern: Option<Regex>,
    zipped: Option<Zipped>,
}

impl TypeDefinition {
    /// Create a definition from its surface facts.
    ///
    /// The first extension is the canonical one.
    pub fn new<K, I, S, M>(tag: Tag, kind: K, extensions: I, mime: M) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
        M: Into<String>,
    {
        Self {
            id: None,
            tag,
            kind: kind.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
            mime: mime.into(),
            magic: None,
            pattern: None,
            zipped: None,
        }
    }

    /// Request a specific id; the registry rejects it if already taken.
    pub fn with_id(mut self, id: DefinitionId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_magic(mut self, magic: impl Into<Magic>) -> Self {
        self.magic = Some(magic.into());
        self
    }

    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Compile `pattern` and attach it.
    pub fn try_with_pattern(self, pattern: &str) -> Result<Self> {
        Ok(self.with_pattern(Regex::new(pattern)?))
    }

    pub fn with_zipped(mut self, zipped: Zipped) -> Self {
        self.zipped = Some(zipped);
        self
    }

    pub(crate) fn assign_id(&mut self, id: DefinitionId) {
        self.id = Some(id);
    }

    /// Registry id; `None` until the definition is registered.
    #[inline]
    pub fn id(&self) -> Option<DefinitionId> {
        self.id
    }

    #[inline]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Variant name, e.g. `jpeg` or `gif89a`.
    #[inline]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[inline]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// The canonical extension.
    pub fn primary_extension(&self) -> Option<&str> {
        self.extensions.first().map(String::as_str)
    }

    /// Check if this definition lists `ext`, ignoring ASCII case.
    pub fn has_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    #[inline]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    #[inline]
    pub fn magic(&self) -> Option<&Magic> {
        self.magic.as_ref()
    }

    #[inline]
    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    #[inline]
    pub fn zipped(&self) -> Option<&Zipped> {
        self.zipped.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::magic::Signature;

    #[test]
    fn test_builder_sets_fields() {
        let definition = TypeDefinition::new(Tag::Image, "jpeg", ["jpg", "jpeg"], "image/jpeg")
            .with_magic(Signature::exact(&[0xFF, 0xD8, 0xFF]));
        assert_eq!(definition.id(), None);
        assert_eq!(definition.tag(), &Tag::Image);
        assert_eq!(definition.primary_extension(), Some("jpg"));
        assert!(definition.has_extension("JPEG"));
        assert!(!definition.has_extension("png"));
        assert!(definition.magic().is_some());
        assert!(definition.pattern().is_none());
    }

    #[test]
    fn test_try_with_pattern_reports_bad_regex() {
        let definition = TypeDefinition::new(Tag::Code, "broken", ["x"], "text/x-broken");
        assert!(definition.try_with_pattern("(unclosed").is_err());
    }

    #[test]
    fn test_zipped_required_entries() {
        assert_eq!(Zipped::Any.required_entries(), None);
        let docx = Zipped::entries(["[Content_Types].xml", "word/document.xml"]);
        assert_eq!(docx.required_entries().map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_tag_display_matches_serde_name() {
        assert_eq!(Tag::Compressed.to_string(), "compressed");
        assert_eq!(Tag::Office.as_str(), "office");
    }

    #[test]
    fn test_tag_from_name_keeps_unknown_categories() {
        assert_eq!(Tag::from("IMAGE"), Tag::Image);
        assert_eq!(Tag::from("Font"), Tag::Other("font".to_string()));
        assert_eq!(String::from(Tag::from("font")), "font");
        assert_eq!(String::from(Tag::Code), "code");
    }
}
