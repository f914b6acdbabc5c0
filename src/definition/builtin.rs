//! Built-in definition table.
//!
//! Order matters only as the ranking tie-break: when several definitions earn
//! the same score, the one listed first here wins.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Tag, TypeDefinition, Zipped};
use crate::detection::magic::{Magic, Signature};

/// Variant name of the fallback definition.
pub const DEFAULT_KIND: &str = "text";

/// MIME type of the fallback definition.
pub const DEFAULT_MIME: &str = "text/plain";

const OFFICE_MIME: &str = "application/vnd.openxmlformats-officedocument";

static BUILTIN: Lazy<Vec<TypeDefinition>> = Lazy::new(build);

/// A fresh copy of the built-in table, without ids.
pub fn definitions() -> Vec<TypeDefinition> {
    BUILTIN.clone()
}

fn def(tag: Tag, kind: &str, exts: &[&str], mime: &str) -> TypeDefinition {
    TypeDefinition::new(tag, kind, exts.iter().copied(), mime)
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("Invalid built-in content pattern")
}

fn zip_magic() -> Magic {
    Magic::any_of([
        Signature::exact(b"PK\x03\x04"),
        Signature::exact(b"PK\x05\x06"),
        Signature::exact(b"PK\x07\x08"),
    ])
}

fn ole_magic() -> Signature {
    Signature::exact(&[0xD0, 0xCF, 0x11, 0xE0])
}

fn build() -> Vec<TypeDefinition> {
    vec![
        // Images
        def(Tag::Image, "jpeg", &["jpg", "jpeg"], "image/jpeg").with_magic(Signature::exact(&[0xFF, 0xD8, 0xFF])),
        def(Tag::Image, "png", &["png"], "image/png").with_magic(Signature::exact(&[0x89, 0x50, 0x4E, 0x47])),
        def(Tag::Image, "gif87a", &["gif"], "image/gif").with_magic(Signature::exact(b"GIF87a")),
        def(Tag::Image, "gif89a", &["gif"], "image/gif").with_magic(Signature::exact(b"GIF89a")),
        // TIFF, little then big endian
        def(Tag::Image, "tif", &["tif", "tiff"], "image/tiff").with_magic(Signature::exact(&[0x49, 0x49, 0x2A, 0x00])),
        def(Tag::Image, "tif", &["tif", "tiff"], "image/tiff").with_magic(Signature::exact(&[0x4D, 0x4D, 0x00, 0x2A])),
        def(Tag::Image, "bitmap", &["bmp"], "image/bmp").with_magic(Signature::exact(b"BM")),
        def(Tag::Image, "icon", &["ico"], "image/x-icon").with_magic(Signature::exact(&[0x00, 0x00, 0x01, 0x00])),
        def(Tag::Image, "webp", &["webp"], "image/webp").with_magic(Signature::exact(b"RIFF").then_any(4).then_exact(b"WEBP")),
        def(Tag::Image, "pdf", &["pdf"], "application/pdf").with_magic(Signature::exact(b"%PDF")),
        def(Tag::Image, "svg", &["svg"], "image/svg+xml").with_pattern(pattern(r"(?i)^\s*<\s*svg[^>]*>")),
        // Video
        def(Tag::Video, "mp4", &["mp4"], "video/mp4").with_magic(Signature::exact(&[0x00, 0x00, 0x00, 0x1C]).then_exact(b"ftyp")),
        def(Tag::Video, "quicktime", &["mov"], "video/quicktime").with_magic(Signature::exact(&[0x00, 0x00, 0x00, 0x14]).then_exact(b"ftyp")),
        def(Tag::Video, "avi", &["avi"], "video/x-msvideo").with_magic(Signature::exact(b"RIFF").then_any(4).then_exact(b"AVI ")),
        // Matroska and WebM share one signature
        def(Tag::Video, "mkv", &["mkv"], "video/x-matroska").with_magic(Signature::exact(&[0x1A, 0x45, 0xDF, 0xA3])),
        def(Tag::Video, "webm", &["webm"], "video/webm").with_magic(Signature::exact(&[0x1A, 0x45, 0xDF, 0xA3])),
        def(Tag::Video, "flv", &["flv"], "video/x-flv").with_magic(Signature::exact(&[0x46, 0x4C, 0x56, 0x01])),
        // Audio
        def(Tag::Audio, "mp3", &["mp3"], "audio/mpeg").with_magic(Magic::any_of([
            Signature::exact(b"ID3"),
            Signature::exact(&[0xFF, 0xFB]),
            Signature::exact(&[0xFF, 0xF3]),
            Signature::exact(&[0xFF, 0xF2]),
        ])),
        def(Tag::Audio, "ogg", &["ogg"], "audio/ogg").with_magic(Signature::exact(b"OggS")),
        def(Tag::Audio, "wav", &["wav"], "audio/wav").with_magic(Signature::exact(b"RIFF").then_any(4).then_exact(b"WAVE")),
        // Compressed
        def(Tag::Compressed, "zip", &["zip", "epub"], "application/zip")
            .with_magic(zip_magic())
            .with_zipped(Zipped::Any),
        def(Tag::Compressed, "rar", &["rar"], "application/x-rar-compressed").with_magic(Signature::exact(b"Rar!")),
        def(Tag::Compressed, "gzip", &["gz"], "application/gzip").with_magic(Signature::exact(&[0x1F, 0x8B])),
        def(Tag::Compressed, "7zip", &["7z"], "application/x-7z-compressed").with_magic(Signature::exact(&[0x37, 0x7A, 0xBC, 0xAF])),
        def(Tag::Compressed, "tar", &["tar"], "application/x-tar"),
        // Legacy Office (OLE2 compound files)
        def(Tag::Office, "word", &["doc"], "application/vnd.ms-office").with_magic(ole_magic()),
        def(Tag::Office, "excel", &["xls"], "application/vnd.ms-office").with_magic(ole_magic()),
        def(Tag::Office, "powerpoint", &["ppt"], "application/vnd.ms-office").with_magic(ole_magic()),
        // OOXML
        def(Tag::Office, "word", &["docx"], OFFICE_MIME)
            .with_magic(zip_magic())
            .with_zipped(Zipped::entries(["[Content_Types].xml", "word/document.xml"])),
        def(Tag::Office, "excel", &["xlsx"], OFFICE_MIME)
            .with_magic(zip_magic())
            .with_zipped(Zipped::entries(["[Content_Types].xml", "xl/workbook.xml"])),
        def(Tag::Office, "powerpoint", &["pptx"], OFFICE_MIME)
            .with_magic(zip_magic())
            .with_zipped(Zipped::entries(["[Content_Types].xml", "ppt/presentation.xml"])),
        // Code
        def(Tag::Code, "html", &["html", "htm"], "text/html").with_pattern(pattern(r"(?i)^\s*(<!DOCTYPE\s+html|<html)")),
        def(Tag::Code, "shell", &["sh"], "application/x-sh").with_pattern(pattern(r"^\s*#!")),
        def(Tag::Code, "ruby", &["rb"], "text/x-ruby").with_pattern(pattern(r"(?i)^\s*(class|module|require)")),
        def(Tag::Code, "python", &["py"], "text/x-python").with_pattern(pattern(r"(?i)^\s*(def|class|import)")),
        def(Tag::Code, "java", &["java"], "text/x-java-source").with_pattern(pattern(r"(?i)^\s*(package|import)")),
        def(Tag::Code, "css", &["css"], "text/css"),
        def(Tag::Code, "json", &["json"], "application/json").with_pattern(pattern(r#"^\s*\{\s*"name""#)),
        def(Tag::Code, "xml", &["xml"], "application/xml").with_pattern(pattern(r"(?i)^\s*(<?xml)")),
        def(Tag::Code, "csv", &["csv"], "text/csv"),
        def(Tag::Code, "javascript", &["js"], "application/javascript").with_pattern(pattern(r"(?i)^\s*(import|const|let|var|function)")),
        def(Tag::Code, "php", &["php"], "application/x-httpd-php").with_pattern(pattern(r"(?i)^\s*<\?php")),
        def(Tag::Code, "yaml", &["yml", "yaml"], "application/x-yaml").with_pattern(pattern(r"(?i)^\s*---\s*$")),
        def(Tag::Code, "sql", &["sql"], "application/sql").with_pattern(pattern(r"(?i)^\s*(SELECT|FROM|INSERT\s+INTO|UPDATE|DELETE|CREATE\s+TABLE)")),
        def(Tag::Code, "go", &["go"], "text/x-go").with_pattern(pattern(r"(?i)^\s*(package|import|func|var|const)")),
        def(Tag::Code, "groovy", &["groovy"], "text/x-groovy").with_pattern(pattern(r"(?i)^\s*(class|def|if|else|for|while)")),
        def(Tag::Code, "kotlin", &["kt", "kts"], "text/x-kotlin").with_pattern(pattern(r"(?i)^\s*(fun|val|var|class|import)")),
        def(Tag::Code, "rust", &["rs"], "text/x-rust").with_pattern(pattern(r"(?i)^\s*(fn|struct|enum|impl|use)")),
        def(Tag::Code, "typescript", &["ts"], "text/x-typescript").with_pattern(pattern(r"(?i)^\s*(interface|type|function|const|let|var|import|export)")),
        def(Tag::Code, "swift", &["swift"], "text/x-swift").with_pattern(pattern(r"^\s*(@|//)")),
        def(Tag::Code, "perl", &["pl"], "text/x-perl").with_pattern(pattern(r"(?i)^\s*(use|package|my)")),
        def(Tag::Code, "c", &["c"], "text/x-csrc").with_pattern(pattern(r"^\s*(/\*|\*/|\*|#)")),
        def(Tag::Code, "cpp", &["cpp"], "text/x-c++src").with_pattern(pattern(r"^\s*(//|#)")),
        def(Tag::Code, "csharp", &["cs"], "text/x-csharp").with_pattern(pattern(r"(?i)^\s*(public|private|class|import)")),
        def(Tag::Code, "visualbasic", &["vb"], "text/x-vb").with_pattern(pattern(r"(?i)^\s*(using|namespace|public)")),
        def(Tag::Code, "powershell", &["ps"], "application/x-powershell").with_pattern(pattern(r"^\s*%!")),
        def(Tag::Code, "configuration", &["conf"], "text/plain").with_pattern(pattern(r"^\s*%\w+\s*=")),
        def(Tag::Code, "ini", &["ini"], "text/plain").with_pattern(pattern(r"^\s*;\s*module\s*=")),
        def(Tag::Code, "batch", &["bat"], "application/x-bat").with_pattern(pattern(r"^\s*#!")),
        def(Tag::Code, "c-header", &["h"], "text/x-chdr").with_pattern(pattern(r"(?i)^\s*#\s*(include|define)")),
        def(Tag::Code, "pem", &["pem"], "application/x-pem-file").with_pattern(pattern(r"^\s*(BEGIN|END)")),
        def(Tag::Code, "r", &["r"], "text/x-r-source").with_pattern(pattern(r"(?i)^\s*(library|function|if|else|for|while)")),
        // Text
        def(Tag::Text, DEFAULT_KIND, &["txt"], DEFAULT_MIME),
        def(Tag::Text, "markdown", &["md"], "text/markdown")
            .with_pattern(pattern(r"(?i)^\s*(#{1,6}\s+\w+|\*\s+\w+|-\s+\w+|\d+\.\s+\w+|\[.+\]\(http.+)")),
        def(Tag::Text, "latex", &["tex"], "application/x-latex").with_pattern(pattern(r"(?i)^\s*(\\documentclass|\\begin|\\end)")),
        def(Tag::Text, "rtf", &["rtf"], "application/rtf")
            .with_magic(Signature::exact(b"{\\rtf"))
            .with_pattern(pattern(r"(?i)^\{\\rtf")),
    ]
}

/// Whether `definition` is the fallback `text/plain` entry.
pub fn is_default(definition: &TypeDefinition) -> bool {
    *definition.tag() == Tag::Text && definition.kind() == DEFAULT_KIND && definition.mime() == DEFAULT_MIME
}
