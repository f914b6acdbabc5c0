//! Definition registry.
//!
//! The registry is an ordered, append-only collection. Built-in definitions
//! are loaded at construction; callers may append more with
//! [`Registry::extend`]. Nothing is ever removed or overwritten, so a custom
//! definition can only outrank a built-in one by earning a higher score.

use std::collections::HashMap;
use std::collections::HashSet;

use tracing::debug;

use crate::common::{Error, Result};
use crate::definition::{DefinitionId, TypeDefinition, builtin};

/// Ordered collection of type definitions with unique ids.
#[derive(Debug, Clone)]
pub struct Registry {
    definitions: Vec<TypeDefinition>,
    index: HashMap<DefinitionId, usize>,
    next_id: u32,
    default_id: DefinitionId,
}

impl Registry {
    /// Create a registry holding the built-in definitions.
    pub fn new() -> Self {
        let mut definitions = builtin::definitions();
        let mut index = HashMap::with_capacity(definitions.len());
        for (position, definition) in definitions.iter_mut().enumerate() {
            let id = DefinitionId::new(position as u32);
            definition.assign_id(id);
            index.insert(id, position);
        }

        let default_id = definitions
            .iter()
            .find(|definition| builtin::is_default(definition))
            .and_then(TypeDefinition::id)
            .expect("Built-in table lacks the text/plain definition");

        Self {
            next_id: definitions.len() as u32,
            definitions,
            index,
            default_id,
        }
    }

    /// Append definitions, returning the id of each in input order.
    ///
    /// Definitions without an id get the next free one. The batch is
    /// validated as a whole first, so on error the registry is unchanged.
    pub fn extend<I>(&mut self, definitions: I) -> Result<Vec<DefinitionId>>
    where
        I: IntoIterator<Item = TypeDefinition>,
    {
        let batch: Vec<TypeDefinition> = definitions.into_iter().collect();

        let mut requested = HashSet::new();
        for definition in &batch {
            validate(definition)?;
            let Some(id) = definition.id() else { continue };
            if id.get() == u32::MAX {
                return Err(Error::InvalidDefinition(format!(
                    "'{}' requests reserved id {id}",
                    definition.kind()
                )));
            }
            if self.index.contains_key(&id) || !requested.insert(id) {
                return Err(Error::DuplicateId(id));
            }
        }

        // Generated ids start past every id in use or requested
        let mut next_id = requested
            .iter()
            .map(|id| id.get() + 1)
            .fold(self.next_id, u32::max);
        let generated = batch.iter().filter(|definition| definition.id().is_none()).count();
        u32::try_from(generated)
            .ok()
            .and_then(|count| next_id.checked_add(count))
            .ok_or_else(|| Error::InvalidDefinition("definition id space exhausted".to_string()))?;
        let mut ids = Vec::with_capacity(batch.len());
        for mut definition in batch {
            let id = match definition.id() {
                Some(id) => id,
                None => {
                    let id = DefinitionId::new(next_id);
                    next_id += 1;
                    definition.assign_id(id);
                    id
                },
            };
            self.index.insert(id, self.definitions.len());
            self.definitions.push(definition);
            ids.push(id);
        }
        self.next_id = next_id;

        debug!(added = ids.len(), total = self.definitions.len(), "registry extended");
        Ok(ids)
    }

    /// Definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.iter()
    }

    /// Definitions listing `ext`, in insertion order.
    pub fn by_extension<'a>(&'a self, ext: &'a str) -> impl Iterator<Item = &'a TypeDefinition> {
        self.definitions
            .iter()
            .filter(move |definition| definition.has_extension(ext))
    }

    /// The generic `text/plain` definition used when nothing scores.
    pub fn default_definition(&self) -> &TypeDefinition {
        &self.definitions[self.index[&self.default_id]]
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(definition: &TypeDefinition) -> Result<()> {
    if definition.extensions().is_empty() {
        return Err(Error::InvalidDefinition(format!(
            "'{}' has no extension",
            definition.kind()
        )));
    }
    if definition.extensions().iter().any(|ext| ext.is_empty() || ext.starts_with('.')) {
        return Err(Error::InvalidDefinition(format!(
            "'{}' has an empty or dotted extension",
            definition.kind()
        )));
    }
    if let Some(magic) = definition.magic()
        && (magic.signatures().is_empty() || magic.signatures().iter().any(|s| s.is_empty()))
    {
        return Err(Error::InvalidDefinition(format!(
            "'{}' has an empty magic signature",
            definition.kind()
        )));
    }
    Ok(())
}
