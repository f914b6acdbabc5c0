//! The scoring detector.
//!
//! A [`Detector`] owns a [`Registry`] and the scoring weights. Every entry
//! point allocates its own [`ScoreTable`], so one detector can serve any
//! number of concurrent calls; only [`Detector::add_definitions`] mutates it,
//! and that needs `&mut self`.
//!
//! # Example
//!
//! ```rust
//! use filesniff::Detector;
//!
//! let detector = Detector::new();
//!
//! let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
//! assert_eq!(detector.parse(&png, None).mime, "image/png");
//!
//! // Nothing recognizable: the generic text type, never an error
//! assert_eq!(detector.parse(&[0x00, 0x13, 0x37], None).mime, "text/plain");
//!
//! assert_eq!(detector.from_name("backup.tar.gz").kind, "gzip");
//! ```

use std::path::Path;

#[cfg(feature = "container")]
use bytes::Bytes;
use tracing::{debug, trace};

use crate::common::{DetectorConfig, Error, Result, Scoring, config::BUFFER_CHECK_SIZE};
use crate::definition::{DefinitionId, TypeDefinition};
use crate::detection::score::{self, Match, ScoreTable};
use crate::detection::{content, magic, name};
use crate::registry::Registry;
use crate::response::Response;

#[cfg(feature = "container")]
use crate::detection::container::{self, ArchiveIndex};

/// Multi-heuristic file type detector.
#[derive(Debug, Clone)]
pub struct Detector {
    registry: Registry,
    scoring: Scoring,
    prefix_len: usize,
}

impl Detector {
    /// Create a detector with the built-in definitions and default weights.
    pub fn new() -> Self {
        Self::with_scoring(Scoring::default())
    }

    /// Create a detector with the built-in definitions and custom weights.
    pub fn with_scoring(scoring: Scoring) -> Self {
        Self {
            registry: Registry::new(),
            scoring,
            prefix_len: BUFFER_CHECK_SIZE,
        }
    }

    /// Create a detector from a configuration, compiling its definitions.
    pub fn from_config(config: DetectorConfig) -> Result<Self> {
        let definitions = config
            .definitions
            .into_iter()
            .map(TypeDefinition::try_from)
            .collect::<Result<Vec<_>>>()?;

        let mut detector = Self {
            registry: Registry::new(),
            scoring: config.scoring,
            prefix_len: config.prefix_len,
        };
        detector.add_definitions(definitions)?;
        Ok(detector)
    }

    /// Append custom definitions to the registry.
    ///
    /// This is a configuration-time operation: it borrows the detector
    /// mutably, so it cannot race with in-flight parses.
    pub fn add_definitions<I>(&mut self, definitions: I) -> Result<Vec<DefinitionId>>
    where
        I: IntoIterator<Item = TypeDefinition>,
    {
        self.registry.extend(definitions)
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn scoring(&self) -> Scoring {
        self.scoring
    }

    /// Number of leading bytes decoded for content sniffing.
    #[inline]
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Run the synchronous matchers into a fresh table.
    fn score_sync(&self, buffer: &[u8], name: Option<&str>) -> ScoreTable {
        let mut table = ScoreTable::new();
        let magic = magic::score(&self.registry, buffer, self.scoring.magic, &mut table);
        let content = content::score(
            &self.registry,
            buffer,
            self.prefix_len,
            self.scoring.content,
            &mut table,
        );
        let named = name.map_or(0, |file_name| {
            name::score(&self.registry, file_name, self.scoring.file_extension, &mut table)
        });
        trace!(len = buffer.len(), magic, content, named, "synchronous pass");
        table
    }

    /// All positively scored definitions, best first. May be empty.
    pub fn rank(&self, buffer: &[u8], name: Option<&str>) -> Vec<Match<'_>> {
        score::rank(&self.registry, &self.score_sync(buffer, name))
    }

    /// Best match, or `None` when no matcher found any evidence.
    pub fn detect(&self, buffer: &[u8], name: Option<&str>) -> Option<Response> {
        Response::from_definition(self.rank(buffer, name).first().map(|m| m.definition))
    }

    /// Best match, falling back to the generic text type.
    pub fn parse(&self, buffer: &[u8], name: Option<&str>) -> Response {
        self.detect(buffer, name)
            .unwrap_or_else(|| self.default_response())
    }

    /// Every positively scored match, best first; the generic text type alone
    /// when nothing scored.
    pub fn parse_all(&self, buffer: &[u8], name: Option<&str>) -> Vec<Response> {
        let ranked = self.rank(buffer, name);
        debug!(candidates = ranked.len(), "ranked buffer");
        if ranked.is_empty() {
            return vec![self.default_response()];
        }
        ranked.iter().map(|m| Response::from(m.definition)).collect()
    }

    /// Classify from a file name alone.
    pub fn from_name(&self, path: &str) -> Response {
        let mut table = ScoreTable::new();
        name::score(&self.registry, path, self.scoring.file_extension, &mut table);
        self.best_or_default(&table)
    }

    /// Like [`parse`](Self::parse), but when several candidates remain and
    /// some are ZIP based, the archive index is inspected to confirm the
    /// specific variant.
    ///
    /// A buffer that is not a readable archive keeps the synchronous ranking.
    /// No timeout is applied; wrap the call in `tokio::time::timeout` when
    /// latency must be bounded.
    #[cfg(feature = "container")]
    pub async fn parse_async(&self, buffer: impl Into<Bytes>, name: Option<&str>) -> Response {
        let buffer = buffer.into();
        let mut table = self.score_sync(&buffer, name);
        let ranked = score::rank(&self.registry, &table);

        let Some(best) = ranked.first() else {
            debug!("no candidates, using default");
            return self.default_response();
        };
        let zipped: Vec<Match<'_>> = ranked
            .iter()
            .filter(|m| m.definition.zipped().is_some())
            .copied()
            .collect();
        if ranked.len() == 1 || zipped.is_empty() {
            return Response::from(best.definition);
        }

        match ArchiveIndex::open_async(buffer).await {
            Ok(index) => {
                let verified = container::score(&zipped, &index, self.scoring.zip_header, &mut table);
                debug!(entries = index.len(), candidates = zipped.len(), verified, "zip verification");
            },
            Err(err) => {
                debug!(%err, "buffer is not a readable ZIP archive, keeping synchronous ranking");
                return Response::from(best.definition);
            },
        }

        self.best_or_default(&table)
    }

    /// Read a file and classify it, using its name as extra evidence.
    pub fn parse_path<P: AsRef<Path>>(&self, path: P) -> Result<Response> {
        let path = path.as_ref();
        ensure_regular_file(&std::fs::metadata(path)?, path)?;
        let buffer = std::fs::read(path)?;
        Ok(self.parse(&buffer, path.to_str()))
    }

    /// Read a file on the tokio runtime and classify it with
    /// [`parse_async`](Self::parse_async).
    #[cfg(feature = "container")]
    pub async fn parse_path_async<P: AsRef<Path>>(&self, path: P) -> Result<Response> {
        let path = path.as_ref();
        ensure_regular_file(&tokio::fs::metadata(path).await?, path)?;
        let buffer = tokio::fs::read(path).await?;
        Ok(self.parse_async(buffer, path.to_str()).await)
    }

    /// The generic `text/plain` response.
    pub fn default_response(&self) -> Response {
        Response::from(self.registry.default_definition())
    }

    fn best_or_default(&self, table: &ScoreTable) -> Response {
        score::rank(&self.registry, table)
            .first()
            .map(|m| Response::from(m.definition))
            .unwrap_or_else(|| self.default_response())
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_regular_file(metadata: &std::fs::Metadata, path: &Path) -> Result<()> {
    if metadata.is_file() {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{} is not a regular file",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{Tag, Zipped};
    use crate::detection::magic::Signature;
    use proptest::prelude::*;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
    const GIF89A: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00";
    const WAV: &[u8] = b"RIFF\x24\x08\x00\x00WAVEfmt \x10\x00\x00\x00";
    const MP3: &[u8] = b"ID3\x03\x00\x00\x00\x00\x00\x21";
    const GZIP: &[u8] = &[0x1F, 0x8B, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
    const PDF: &[u8] = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n";
    const RTF: &[u8] = b"{\\rtf1\\ansi\\deff0 {\\fonttbl {\\f0 Times;}} Hello}";
    const MKV: &[u8] = &[0x1A, 0x45, 0xDF, 0xA3, 0x9F, 0x42, 0x86, 0x81];
    const NOISE: &[u8] = &[0x00, 0x13, 0x37, 0xFE, 0x80, 0x81, 0x42, 0x99, 0x07];

    #[test]
    fn test_parse_binary_signatures() {
        let detector = Detector::new();
        let cases: [(&[u8], &str, &str); 8] = [
            (PNG, "png", "image/png"),
            (GIF89A, "gif89a", "image/gif"),
            (WAV, "wav", "audio/wav"),
            (MP3, "mp3", "audio/mpeg"),
            (GZIP, "gzip", "application/gzip"),
            (PDF, "pdf", "application/pdf"),
            (RTF, "rtf", "application/rtf"),
            (MKV, "mkv", "video/x-matroska"),
        ];
        for (buffer, kind, mime) in cases {
            let response = detector.parse(buffer, None);
            assert_eq!(response.kind, kind);
            assert_eq!(response.mime, mime);
        }
    }

    #[test]
    fn test_jpeg_canonical_extension() {
        let response = Detector::new().parse(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10], None);
        assert_eq!(response.tag, Tag::Image);
        assert_eq!(response.ext.as_deref(), Some("jpg"));
        assert_eq!(response.exts, ["jpg", "jpeg"]);
    }

    #[test]
    fn test_unknown_bytes_fall_back_to_text() {
        let detector = Detector::new();
        let response = detector.parse(NOISE, None);
        assert_eq!(response.tag, Tag::Text);
        assert_eq!(response.kind, "text");
        assert_eq!(response.mime, "text/plain");
        assert_eq!(detector.parse_all(NOISE, None), [response]);
        assert!(detector.rank(NOISE, None).is_empty());
        assert_eq!(detector.detect(NOISE, None), None);
    }

    #[test]
    fn test_empty_buffer() {
        let detector = Detector::new();
        assert_eq!(detector.detect(&[], None), None);
        assert_eq!(detector.parse(&[], None).mime, "text/plain");
        assert_eq!(detector.parse_all(&[], None).len(), 1);
        assert_eq!(detector.parse(&[], Some("notes.md")).kind, "markdown");
    }

    #[test]
    fn test_from_name() {
        let detector = Detector::new();
        assert_eq!(detector.from_name("archive.tar.gz").kind, "gzip");
        assert_eq!(detector.from_name("/home/me/music.mp3").mime, "audio/mpeg");
        assert_eq!(detector.from_name("unknown").mime, "text/plain");
        assert_eq!(detector.from_name("word-doc.docx").ext.as_deref(), Some("docx"));
    }

    #[test]
    fn test_name_breaks_content_ties() {
        let detector = Detector::new();
        let source = b"const answer = 42;\n";
        assert_eq!(detector.parse(source, None).kind, "javascript");
        assert_eq!(detector.parse(source, Some("answer.ts")).kind, "typescript");
    }

    #[test]
    fn test_shared_signature_ties_and_name_disambiguation() {
        let detector = Detector::new();
        let all = detector.parse_all(MKV, None);
        let kinds: Vec<_> = all.iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(kinds, ["mkv", "webm"]);
        assert_eq!(detector.parse(MKV, Some("clip.webm")).kind, "webm");
    }

    #[test]
    fn test_parse_all_is_deterministic() {
        let detector = Detector::new();
        let source = b"import os\nclass Foo: pass\n";
        let first = detector.parse_all(source, Some("foo.py"));
        let second = detector.parse_all(source, Some("foo.py"));
        assert_eq!(first, second);
        assert_eq!(first[0].kind, "python");
    }

    #[test]
    fn test_custom_scoring_weights() {
        let detector = Detector::with_scoring(Scoring {
            file_extension: 100,
            ..Scoring::default()
        });
        let response = detector.parse(PNG, Some("really.gif"));
        assert_eq!(response.ext.as_deref(), Some("gif"));
        assert_eq!(Detector::new().parse(PNG, Some("really.gif")).kind, "png");
    }

    #[test]
    fn test_custom_definition_competes_by_score() {
        let mut detector = Detector::new();
        detector
            .add_definitions([TypeDefinition::new(Tag::Image, "png-custom", ["png"], "image/x-custom-png")
                .with_magic(Signature::exact(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]))])
            .unwrap();
        // Equal evidence: the built-in entry comes first
        assert_eq!(detector.parse(PNG, None).kind, "png");
        assert_eq!(detector.parse_all(PNG, None).len(), 2);
    }

    #[test]
    fn test_from_config() {
        let config = DetectorConfig::from_yaml(
            r#"
scoring:
  content: 5
definitions:
  - tag: code
    type: toml
    ext: toml
    mime: application/toml
    pattern: '^\s*\[[a-z]+\]'
"#,
        )
        .unwrap();
        let detector = Detector::from_config(config).unwrap();
        assert_eq!(detector.scoring().content, 5);
        assert_eq!(detector.parse(b"[package]\nname = \"x\"\n", None).kind, "toml");
    }

    #[test]
    fn test_extreme_weights_do_not_overflow() {
        let detector = Detector::with_scoring(Scoring {
            magic: u32::MAX,
            ..Scoring::default()
        });
        assert_eq!(detector.parse(RTF, None).kind, "rtf");
        let ranked = detector.rank(RTF, Some("letter.rtf"));
        assert_eq!(ranked[0].score, u32::MAX);
    }

    #[test]
    fn test_add_definitions_rejects_max_id() {
        let mut detector = Detector::new();
        let edge = TypeDefinition::new(Tag::Code, "edge", ["edge"], "text/x-edge")
            .with_id(DefinitionId::new(u32::MAX));
        assert!(matches!(detector.add_definitions([edge]), Err(Error::InvalidDefinition(_))));
        assert_eq!(detector.registry().len(), Detector::new().registry().len());
    }

    #[test]
    fn test_from_config_accepts_custom_category() {
        let config = DetectorConfig::from_yaml(
            r#"
definitions:
  - tag: font
    type: woff
    ext: woff
    mime: font/woff
    magic: "77 4F 46 46"
"#,
        )
        .unwrap();
        let detector = Detector::from_config(config).unwrap();
        let response = detector.parse(b"wOFF\x00\x01\x00\x00", None);
        assert_eq!(response.tag, Tag::Other("font".to_string()));
        assert_eq!(response.tag.as_str(), "font");
        assert_eq!(response.kind, "woff");
        assert_eq!(response.media(), "font");
        assert_eq!(detector.from_name("icons.WOFF").kind, "woff");
    }

    #[test]
    fn test_from_config_rejects_bad_definitions() {
        let config = DetectorConfig {
            definitions: vec![crate::definition::DefinitionSpec {
                id: None,
                tag: Tag::Code,
                kind: "broken".into(),
                ext: crate::definition::OneOrMany::Many(vec![]),
                mime: "text/x-broken".into(),
                magic: None,
                pattern: None,
                zipped: None,
            }],
            ..DetectorConfig::default()
        };
        assert!(matches!(Detector::from_config(config), Err(Error::InvalidDefinition(_))));
    }

    #[test]
    fn test_concurrent_calls_do_not_share_scores() {
        let detector = Detector::new();
        let cases: [(&[u8], &str); 4] = [(PNG, "png"), (WAV, "wav"), (NOISE, "text"), (GZIP, "gzip")];
        std::thread::scope(|scope| {
            for (buffer, kind) in cases {
                let detector = &detector;
                scope.spawn(move || {
                    for _ in 0..200 {
                        assert_eq!(detector.parse(buffer, None).kind, kind);
                        assert_eq!(detector.parse_all(buffer, None).len(), 1);
                    }
                });
            }
        });
    }

    #[test]
    fn test_detector_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Detector>();
    }

    #[test]
    fn test_parse_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, MP3).unwrap();
        assert_eq!(Detector::new().parse_path(&path).unwrap().kind, "mp3");

        let noise = dir.path().join("blob.gz");
        std::fs::write(&noise, NOISE).unwrap();
        assert_eq!(Detector::new().parse_path(&noise).unwrap().kind, "gzip");
    }

    #[test]
    fn test_parse_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let detector = Detector::new();
        assert!(matches!(detector.parse_path(dir.path()), Err(Error::InvalidInput(_))));
        assert!(matches!(detector.parse_path(dir.path().join("missing")), Err(Error::Io(_))));
    }

    #[cfg(feature = "container")]
    mod archives {
        use super::*;
        use crate::detection::container::tests::archive_with;
        use tracing_test::traced_test;

        const DOCX: &[&str] = &["[Content_Types].xml", "_rels/.rels", "word/document.xml"];
        const XLSX: &[&str] = &["[Content_Types].xml", "xl/workbook.xml", "xl/worksheets/sheet1.xml"];
        const PPTX: &[&str] = &["[Content_Types].xml", "ppt/presentation.xml"];
        const EPUB: &[&str] = &["mimetype", "META-INF/container.xml", "OEBPS/content.opf"];

        #[test]
        fn test_sync_parse_cannot_tell_ooxml_from_zip() {
            let detector = Detector::new();
            let buffer = archive_with(DOCX);
            let response = detector.parse(&buffer, None);
            assert_eq!(response.kind, "zip");
            assert_eq!(response.mime, "application/zip");

            let kinds: Vec<_> = detector
                .parse_all(&buffer, None)
                .into_iter()
                .map(|r| r.ext.unwrap_or_default())
                .collect();
            assert_eq!(kinds, ["zip", "docx", "xlsx", "pptx"]);
        }

        #[tokio::test]
        async fn test_async_parse_resolves_ooxml() {
            let detector = Detector::new();
            for (entries, kind, ext) in [(DOCX, "word", "docx"), (XLSX, "excel", "xlsx"), (PPTX, "powerpoint", "pptx")] {
                let response = detector.parse_async(archive_with(entries), None).await;
                assert_eq!(response.tag, Tag::Office);
                assert_eq!(response.kind, kind);
                assert_eq!(response.ext.as_deref(), Some(ext));
                assert_eq!(response.mime, "application/vnd.openxmlformats-officedocument");
            }
        }

        #[tokio::test]
        async fn test_async_parse_keeps_plain_zip_and_epub() {
            let detector = Detector::new();
            let epub = detector.parse_async(archive_with(EPUB), None).await;
            assert_eq!(epub.kind, "zip");
            assert_eq!(epub.exts, ["zip", "epub"]);

            let plain = detector.parse_async(archive_with(&["readme.txt"]), Some("bundle.zip")).await;
            assert_eq!(plain.kind, "zip");
        }

        #[tokio::test]
        async fn test_async_parse_without_zip_candidates() {
            let detector = Detector::new();
            assert_eq!(detector.parse_async(GZIP.to_vec(), None).await.kind, "gzip");
            assert_eq!(detector.parse_async(MKV.to_vec(), None).await.kind, "mkv");
            assert_eq!(detector.parse_async(NOISE.to_vec(), None).await.mime, "text/plain");
            assert_eq!(detector.parse_async(Vec::new(), None).await.mime, "text/plain");
        }

        #[tokio::test]
        #[traced_test]
        async fn test_async_parse_recovers_from_broken_archive() {
            let detector = Detector::new();
            let broken = b"PK\x03\x04\x14\x00\x00\x00truncated".to_vec();
            let response = detector.parse_async(broken, None).await;
            assert_eq!(response.kind, "zip");
            assert!(logs_contain("not a readable ZIP archive"));
        }

        #[tokio::test]
        async fn test_async_custom_zipped_definition() {
            let mut detector = Detector::new();
            detector
                .add_definitions([TypeDefinition::new(
                    Tag::Office,
                    "word-macro",
                    ["docm"],
                    "application/vnd.ms-word.document.macroEnabled.12",
                )
                .with_magic(Signature::exact(b"PK\x03\x04"))
                .with_zipped(Zipped::entries(["[Content_Types].xml", "word/vbaProject.bin"]))])
                .unwrap();

            let buffer = archive_with(&["[Content_Types].xml", "word/document.xml", "word/vbaProject.bin"]);
            // Both verify; the built-in docx wins the tie
            assert_eq!(detector.parse_async(buffer.clone(), None).await.ext.as_deref(), Some("docx"));
            // The extension tips it
            assert_eq!(
                detector.parse_async(buffer, Some("macro.docm")).await.kind,
                "word-macro"
            );
        }

        #[tokio::test]
        async fn test_parse_path_async() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("report.bin");
            std::fs::write(&path, archive_with(XLSX)).unwrap();
            let detector = Detector::new();
            assert_eq!(detector.parse_path_async(&path).await.unwrap().ext.as_deref(), Some("xlsx"));
            assert!(matches!(
                detector.parse_path_async(dir.path()).await,
                Err(Error::InvalidInput(_))
            ));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_parse_is_total_and_deterministic(buf in prop::collection::vec(any::<u8>(), 0..256)) {
            let detector = Detector::new();
            let all = detector.parse_all(&buf, None);
            prop_assert!(!all.is_empty());
            prop_assert_eq!(&all, &detector.parse_all(&buf, None));
            prop_assert_eq!(&detector.parse(&buf, None), &all[0]);
        }
    }
}
