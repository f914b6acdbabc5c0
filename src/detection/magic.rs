//! Magic number matching.
//!
//! A signature is a flat run of bytes anchored at offset zero, where any
//! position may be a wildcard. A definition's [`Magic`] is either one
//! signature or a set of alternatives, of which any single one has to match.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use super::score::ScoreTable;
use crate::common::{Error, Result};
use crate::registry::Registry;

/// A single position in a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagicByte {
    /// Exact byte value
    Exact(u8),
    /// Any byte (wildcard)
    Any,
}

impl MagicByte {
    /// Check if this position accepts `byte`.
    #[inline]
    pub fn matches(self, byte: u8) -> bool {
        match self {
            MagicByte::Exact(b) => b == byte,
            MagicByte::Any => true,
        }
    }
}

impl fmt::Display for MagicByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MagicByte::Exact(b) => write!(f, "{:02X}", b),
            MagicByte::Any => write!(f, "??"),
        }
    }
}

/// A flat byte signature anchored at the start of the buffer.
///
/// Most signatures are a handful of bytes, so they live inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    bytes: SmallVec<[MagicByte; 16]>,
}

impl Signature {
    /// Create a signature made only of exact bytes.
    pub fn exact(bytes: &[u8]) -> Self {
        Self::default().then_exact(bytes)
    }

    /// Append exact bytes.
    pub fn then_exact(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend(bytes.iter().copied().map(MagicByte::Exact));
        self
    }

    /// Append `count` wildcard positions.
    pub fn then_any(mut self, count: usize) -> Self {
        self.bytes.extend(std::iter::repeat_n(MagicByte::Any, count));
        self
    }

    /// The positions of this signature.
    #[inline]
    pub fn bytes(&self) -> &[MagicByte] {
        &self.bytes
    }

    /// Minimum buffer size needed to check this signature.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Check whether `buf` starts with this signature.
    ///
    /// Buffers shorter than the signature never match. An empty signature
    /// never matches either, otherwise it would vouch for every buffer.
    pub fn matches(&self, buf: &[u8]) -> bool {
        if self.bytes.is_empty() || buf.len() < self.bytes.len() {
            return false;
        }

        self.bytes
            .iter()
            .zip(buf)
            .all(|(position, &byte)| position.matches(byte))
    }
}

/// Parse a signature from hex notation, e.g. `"52 49 46 46 ?? ?? ?? ?? 57 41 56 45"`.
///
/// Tokens are separated by whitespace; `??`, `?` and `*` are wildcards.
impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = s
            .split_whitespace()
            .map(|token| match token {
                "??" | "?" | "*" => Ok(MagicByte::Any),
                _ => u8::from_str_radix(token, 16)
                    .map(MagicByte::Exact)
                    .map_err(|_| Error::InvalidDefinition(format!("invalid hex byte: {}", token))),
            })
            .collect::<Result<SmallVec<_>>>()?;

        if bytes.is_empty() {
            return Err(Error::InvalidDefinition("empty magic signature".to_string()));
        }

        Ok(Self { bytes })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.bytes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", byte)?;
        }
        Ok(())
    }
}

/// The magic specification of one definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Magic {
    /// One flat signature
    Single(Signature),
    /// Alternative signatures; a match on any of them counts
    AnyOf(Vec<Signature>),
}

impl Magic {
    /// Build an alternative set from several signatures.
    pub fn any_of<I: IntoIterator<Item = Signature>>(signatures: I) -> Self {
        Magic::AnyOf(signatures.into_iter().collect())
    }

    /// All signatures of this spec, in declaration order.
    pub fn signatures(&self) -> &[Signature] {
        match self {
            Magic::Single(signature) => std::slice::from_ref(signature),
            Magic::AnyOf(signatures) => signatures,
        }
    }

    /// Check whether the buffer matches this spec.
    #[inline]
    pub fn matches(&self, buf: &[u8]) -> bool {
        self.signatures().iter().any(|signature| signature.matches(buf))
    }
}

impl From<Signature> for Magic {
    fn from(signature: Signature) -> Self {
        Magic::Single(signature)
    }
}

/// Award the magic weight to every definition whose magic matches `buf`.
///
/// The weight is added once per definition, however many alternatives match.
/// Returns the number of matching definitions.
pub fn score(registry: &Registry, buf: &[u8], weight: u32, table: &mut ScoreTable) -> usize {
    let mut matched = 0;
    for definition in registry.iter() {
        if let (Some(id), Some(magic)) = (definition.id(), definition.magic())
            && magic.matches(buf)
        {
            table.add(id, weight);
            matched += 1;
        }
    }
    matched
}
