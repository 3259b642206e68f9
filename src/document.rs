//! The normalized in-memory document and its per-format metadata.
//!
//! Every decode produces a [`Document`]: the textual payload (plain text, or
//! HTML markup when the source is HTML), the format tag it was decoded as,
//! and whatever extra information the codec reported. The metadata is a
//! closed sum type rather than an open key/value map: each codec has a
//! known, small set of facts to report, and a tagged variant keeps them
//! typed while the reader's return type stays uniform.

use crate::format::Format;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A decoded document, produced per read and owned by the calling operation.
///
/// Invariant: `format` always matches the codec that produced `content`,
/// and is always a member of the supported-input set; unknown formats fail
/// in the reader before a `Document` exists.
#[derive(Debug, Clone)]
pub struct Document {
    /// Decoded textual payload. UTF-8 text for pdf/docx/md/txt sources;
    /// the raw markup for HTML sources (so structural conversions keep
    /// their structure to work with).
    pub content: String,
    /// The format this document was decoded as.
    pub format: Format,
    /// Format-specific facts reported by the codec; may be empty.
    pub metadata: DocMetadata,
}

impl Document {
    /// Construct a document with no codec metadata (md/txt sources).
    pub fn new(content: String, format: Format) -> Self {
        Self {
            content,
            format,
            metadata: DocMetadata::None,
        }
    }

    /// The document title, when any codec reported one.
    pub fn title(&self) -> Option<&str> {
        match &self.metadata {
            DocMetadata::Html(m) => m.title.as_deref(),
            DocMetadata::Pdf(m) => m.info.title.as_deref(),
            _ => None,
        }
    }
}

/// Format-specific metadata attached to a [`Document`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocMetadata {
    /// No format-specific metadata (md/txt sources).
    #[default]
    None,
    /// Reported by the PDF codec.
    Pdf(PdfMetadata),
    /// Reported by the DOCX codec.
    Docx(DocxMetadata),
    /// Reported by the HTML codec.
    Html(HtmlMetadata),
}

/// Page count and document-information block of a PDF source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfMetadata {
    pub page_count: usize,
    pub info: PdfInfo,
}

/// The `/Info` dictionary of a PDF, with empty entries dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
}

/// Non-fatal messages the DOCX codec emitted while flattening the document
/// (tables collapsed to text, embedded graphics skipped, and so on).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocxMetadata {
    pub warnings: Vec<String>,
}

/// Title of an HTML source, when a `<title>` element is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HtmlMetadata {
    pub title: Option<String>,
}

/// Payload of the `document_info` operation.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    pub format: Format,
    /// On-disk size in KiB, rounded to one decimal place.
    pub size_kb: f64,
    /// Length in bytes of the decoded content.
    pub content_length: usize,
    pub metadata: DocMetadata,
    pub last_modified: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_prefers_codec_metadata() {
        let mut doc = Document::new("x".into(), Format::Html);
        assert_eq!(doc.title(), None);

        doc.metadata = DocMetadata::Html(HtmlMetadata {
            title: Some("Hello".into()),
        });
        assert_eq!(doc.title(), Some("Hello"));

        doc.metadata = DocMetadata::Pdf(PdfMetadata {
            page_count: 3,
            info: PdfInfo {
                title: Some("Paper".into()),
                ..PdfInfo::default()
            },
        });
        assert_eq!(doc.title(), Some("Paper"));
    }

    #[test]
    fn metadata_serializes_tagged() {
        let m = DocMetadata::Docx(DocxMetadata {
            warnings: vec!["table content flattened to plain text".into()],
        });
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"kind\":\"docx\""), "got: {json}");
        assert!(json.contains("flattened"), "got: {json}");
    }
}
