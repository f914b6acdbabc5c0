//! File name extension matching.

use super::score::ScoreTable;
use crate::definition::TypeDefinition;
use crate::registry::Registry;

/// Extract the extension of the last path segment, without the dot.
///
/// Both `/` and `\` separate segments. Returns an empty string when the last
/// segment has no dot.
///
/// # Examples
///
/// ```
/// use filesniff::detection::name::extension_of;
///
/// assert_eq!(extension_of("archive.tar.gz"), "gz");
/// assert_eq!(extension_of("/srv/files.d/README"), "");
/// assert_eq!(extension_of(r"C:\Users\me\report.DOCX"), "DOCX");
/// ```
pub fn extension_of(path: &str) -> &str {
    let segment = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match segment.rfind('.') {
        Some(dot) => &segment[dot + 1..],
        None => "",
    }
}

/// Award the extension weight to every definition that lists the extension
/// of `name`.
///
/// Returns the number of matching definitions.
pub fn score(registry: &Registry, name: &str, weight: u32, table: &mut ScoreTable) -> usize {
    let ext = extension_of(name);
    if ext.is_empty() {
        return 0;
    }

    let mut matched = 0;
    for id in registry.by_extension(ext).filter_map(TypeDefinition::id) {
        table.add(id, weight);
        matched += 1;
    }
    matched
}
