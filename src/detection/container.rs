//! ZIP container verification.
//!
//! OOXML documents, EPUB books and plain archives all share the ZIP local
//! file header, so magic matching alone ties them. Opening the central
//! directory and checking for the entries a format requires breaks the tie.

use std::collections::HashSet;
use std::io::Cursor;

use bytes::Bytes;
use tracing::trace;

use super::score::{Match, ScoreTable};
use crate::common::Result;

/// Entry names of an opened archive.
#[derive(Debug, Clone, Default)]
pub struct ArchiveIndex {
    names: HashSet<String>,
}

impl ArchiveIndex {
    /// Read the central directory of `buffer`.
    ///
    /// Only the index is parsed; no entry is decompressed.
    pub fn open(buffer: &[u8]) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(buffer))?;
        let names = archive.file_names().map(str::to_owned).collect();
        Ok(Self { names })
    }

    /// Read the central directory on the blocking pool.
    pub async fn open_async(buffer: Bytes) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::open(&buffer)).await?
    }

    /// Whether an entry with exactly this path exists.
    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.names.contains(path)
    }

    /// Whether every path in `paths` exists.
    pub fn contains_all<S: AsRef<str>>(&self, paths: &[S]) -> bool {
        paths.iter().all(|path| self.contains(path.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Award the zip header weight to candidates whose required entries are all
/// present in `index`.
///
/// Candidates marked as any-ZIP earn nothing here; their magic match already
/// counts. Returns the number of candidates that earned the bonus.
pub fn score(candidates: &[Match<'_>], index: &ArchiveIndex, weight: u32, table: &mut ScoreTable) -> usize {
    let mut matched = 0;
    for candidate in candidates {
        let definition = candidate.definition;
        if let (Some(id), Some(required)) = (
            definition.id(),
            definition.zipped().and_then(|zipped| zipped.required_entries()),
        ) && index.contains_all(required)
        {
            trace!(kind = definition.kind(), "zip entries verified");
            table.add(id, weight);
            matched += 1;
        }
    }
    matched
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::detection::score::rank;
    use crate::registry::Registry;
    use std::io::Write;

    /// Build an in-memory archive holding `entries` as small stored files.
    pub(crate) fn archive_with(entries: &[&str]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for entry in entries {
            writer.start_file(*entry, options).unwrap();
            writer.write_all(b"<xml/>").unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_open_lists_entries() {
        let buffer = archive_with(&["[Content_Types].xml", "word/document.xml"]);
        let index = ArchiveIndex::open(&buffer).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.contains("word/document.xml"));
        assert!(!index.contains("xl/workbook.xml"));
        assert!(index.contains_all(&["[Content_Types].xml", "word/document.xml"]));
        assert!(!index.contains_all(&["[Content_Types].xml", "ppt/presentation.xml"]));
    }

    #[test]
    fn test_open_rejects_non_archive() {
        assert!(ArchiveIndex::open(b"PK\x03\x04 but not really a zip").is_err());
        assert!(ArchiveIndex::open(b"").is_err());
    }

    #[test]
    fn test_score_rewards_only_complete_entry_lists() {
        let registry = Registry::new();
        let buffer = archive_with(&["[Content_Types].xml", "xl/workbook.xml"]);
        let index = ArchiveIndex::open(&buffer).unwrap();

        let mut table = ScoreTable::new();
        crate::detection::magic::score(&registry, &buffer, 50, &mut table);
        let candidates = rank(&registry, &table);
        assert_eq!(candidates.len(), 4);

        assert_eq!(score(&candidates, &index, 10, &mut table), 1);
        let ranked = rank(&registry, &table);
        assert_eq!(ranked[0].definition.kind(), "excel");
        assert_eq!(ranked[0].score, 60);
        // generic zip keeps its magic score only
        assert_eq!(ranked[1].definition.kind(), "zip");
        assert_eq!(ranked[1].score, 50);
    }

    #[tokio::test]
    async fn test_open_async() {
        let buffer = Bytes::from(archive_with(&["mimetype", "META-INF/container.xml"]));
        let index = ArchiveIndex::open_async(buffer).await.unwrap();
        assert!(index.contains("META-INF/container.xml"));

        let garbage = Bytes::from_static(b"not an archive");
        assert!(ArchiveIndex::open_async(garbage).await.is_err());
    }
}
