//! Score aggregation and ranking.
//!
//! A [`ScoreTable`] is created per top-level call and dropped with it, so
//! concurrent calls against one registry never see each other's evidence.

use std::collections::HashMap;

use crate::definition::{DefinitionId, TypeDefinition};
use crate::registry::Registry;

/// Accumulated evidence per definition for a single call.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    scores: HashMap<DefinitionId, u32>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to the score of `id`, saturating at `u32::MAX`.
    #[inline]
    pub fn add(&mut self, id: DefinitionId, weight: u32) {
        let score = self.scores.entry(id).or_insert(0);
        *score = score.saturating_add(weight);
    }

    /// Current score of `id`; zero when it earned nothing.
    #[inline]
    pub fn get(&self, id: DefinitionId) -> u32 {
        self.scores.get(&id).copied().unwrap_or(0)
    }

    /// Whether no definition has a positive score.
    pub fn is_empty(&self) -> bool {
        self.scores.values().all(|&score| score == 0)
    }
}

/// A ranked candidate: a definition with its final score.
#[derive(Debug, Clone, Copy)]
pub struct Match<'r> {
    pub definition: &'r TypeDefinition,
    pub score: u32,
}

/// Rank every positively scored definition, best first.
///
/// The sort is stable over registry order, so equal scores keep insertion
/// order and the result is reproducible for identical inputs.
pub fn rank<'r>(registry: &'r Registry, table: &ScoreTable) -> Vec<Match<'r>> {
    let mut ranked: Vec<Match<'r>> = registry
        .iter()
        .filter_map(|definition| {
            let score = table.get(definition.id()?);
            (score > 0).then_some(Match { definition, score })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}
