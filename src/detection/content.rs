//! Content sniffing against textual patterns.

use tracing::trace;

use super::score::ScoreTable;
use crate::common::encoding::decode_prefix;
use crate::registry::Registry;

/// Award the content weight to every definition whose pattern matches the
/// decoded prefix of `buf`.
///
/// Returns the number of matching definitions.
pub fn score(
    registry: &Registry,
    buf: &[u8],
    prefix_len: usize,
    weight: u32,
    table: &mut ScoreTable,
) -> usize {
    let text = decode_prefix(buf, prefix_len);
    let mut matched = 0;
    for definition in registry.iter() {
        if let (Some(id), Some(pattern)) = (definition.id(), definition.pattern())
            && pattern.is_match(&text)
        {
            trace!(kind = definition.kind(), "content pattern matched");
            table.add(id, weight);
            matched += 1;
        }
    }
    matched
}
