//! Declarative definitions for configuration files.
//!
//! [`DefinitionSpec`] is the serde face of [`TypeDefinition`]: signatures are
//! hex strings, patterns are regex strings, and `zipped` is either a boolean
//! or a list of entry paths. Conversion validates and compiles everything.

use serde::{Deserialize, Serialize};

use super::{DefinitionId, Tag, TypeDefinition, Zipped};
use crate::common::{Error, Result};
use crate::detection::magic::{Magic, Signature};

/// A single value or a list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Magic spec in hex notation: one signature or a list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MagicSpec {
    Single(String),
    AnyOf(Vec<String>),
}

impl TryFrom<MagicSpec> for Magic {
    type Error = Error;

    fn try_from(spec: MagicSpec) -> Result<Self> {
        match spec {
            MagicSpec::Single(hex) => Ok(Magic::Single(hex.parse()?)),
            MagicSpec::AnyOf(alternatives) => {
                if alternatives.is_empty() {
                    return Err(Error::InvalidDefinition(
                        "magic alternative list is empty".to_string(),
                    ));
                }
                let signatures = alternatives
                    .iter()
                    .map(|hex| hex.parse::<Signature>())
                    .collect::<Result<Vec<_>>>()?;
                Ok(Magic::AnyOf(signatures))
            },
        }
    }
}

/// `true` for any ZIP, or the entry paths a variant requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZippedSpec {
    Any(bool),
    Entries(Vec<String>),
}

/// Serializable form of a type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub tag: Tag,
    #[serde(rename = "type")]
    pub kind: String,
    pub ext: OneOrMany,
    pub mime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic: Option<MagicSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zipped: Option<ZippedSpec>,
}

impl TryFrom<DefinitionSpec> for TypeDefinition {
    type Error = Error;

    fn try_from(spec: DefinitionSpec) -> Result<Self> {
        let mut definition = TypeDefinition::new(spec.tag, spec.kind, spec.ext.into_vec(), spec.mime);

        if let Some(id) = spec.id {
            definition = definition.with_id(DefinitionId::new(id));
        }
        if let Some(magic) = spec.magic {
            definition = definition.with_magic(Magic::try_from(magic)?);
        }
        if let Some(pattern) = spec.pattern {
            definition = definition.try_with_pattern(&pattern)?;
        }
        match spec.zipped {
            Some(ZippedSpec::Any(true)) => definition = definition.with_zipped(Zipped::Any),
            Some(ZippedSpec::Entries(paths)) => definition = definition.with_zipped(Zipped::Entries(paths)),
            Some(ZippedSpec::Any(false)) | None => {},
        }

        Ok(definition)
    }
}
