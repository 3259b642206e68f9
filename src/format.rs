//! Format tags and extension-based detection.
//!
//! [`Format`] is a closed enum over the five supported document formats.
//! Keeping the set closed lets every conversion path be an exhaustive
//! `match` checked at compile time; "unknown" is represented by the `None`
//! arm of [`Format::detect`] rather than a sentinel variant, so no code past
//! the reader boundary ever has to handle an unrecognised tag.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A recognised document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Portable Document Format (`.pdf`).
    Pdf,
    /// Office Open XML word-processing document (`.docx`).
    Docx,
    /// HTML markup (`.html`, `.htm`).
    Html,
    /// Markdown text (`.md`, `.markdown`).
    #[serde(rename = "md")]
    Markdown,
    /// Plain UTF-8 text (`.txt`).
    #[serde(rename = "txt")]
    Text,
}

impl Format {
    /// All five supported formats, in a stable display order.
    pub const ALL: [Format; 5] = [
        Format::Pdf,
        Format::Docx,
        Format::Html,
        Format::Markdown,
        Format::Text,
    ];

    /// Detect the format of a file from its path extension.
    ///
    /// Pure function of the extension, case-insensitive, never does I/O and
    /// never fails; an unrecognised or missing extension yields `None`.
    pub fn detect(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?;
        Format::from_extension(ext)
    }

    /// Map a bare extension (without the dot) to a format tag.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Format::Pdf),
            "docx" => Some(Format::Docx),
            "html" | "htm" => Some(Format::Html),
            "md" | "markdown" => Some(Format::Markdown),
            "txt" => Some(Format::Text),
            _ => None,
        }
    }

    /// The canonical output-file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Docx => "docx",
            Format::Html => "html",
            Format::Markdown => "md",
            Format::Text => "txt",
        }
    }

    /// The format tag as used in configuration and reports.
    pub fn as_str(&self) -> &'static str {
        self.extension()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ConvertError;

    /// Parse a format tag. Accepts the alternate extensions (`htm`,
    /// `markdown`) so CLI input matches whatever users type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::from_extension(s).ok_or_else(|| ConvertError::UnsupportedFormat {
            format: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_all_supported_extensions() {
        let cases = [
            ("report.pdf", Format::Pdf),
            ("letter.DOCX", Format::Docx),
            ("page.html", Format::Html),
            ("page.htm", Format::Html),
            ("notes.md", Format::Markdown),
            ("notes.markdown", Format::Markdown),
            ("plain.TXT", Format::Text),
        ];
        for (name, expected) in cases {
            assert_eq!(
                Format::detect(&PathBuf::from(name)),
                Some(expected),
                "wrong detection for {name}"
            );
        }
    }

    #[test]
    fn unknown_extension_is_none() {
        assert_eq!(Format::detect(&PathBuf::from("image.png")), None);
        assert_eq!(Format::detect(&PathBuf::from("archive.tar.gz")), None);
        assert_eq!(Format::detect(&PathBuf::from("no_extension")), None);
        assert_eq!(Format::detect(&PathBuf::from(".hidden")), None);
    }

    #[test]
    fn tags_round_trip_through_from_str() {
        for f in Format::ALL {
            assert_eq!(f.as_str().parse::<Format>().unwrap(), f);
        }
        assert_eq!("HTML".parse::<Format>().unwrap(), Format::Html);
        assert!("xlsx".parse::<Format>().is_err());
    }

    #[test]
    fn serde_uses_short_tags() {
        assert_eq!(serde_json::to_string(&Format::Markdown).unwrap(), "\"md\"");
        assert_eq!(serde_json::to_string(&Format::Text).unwrap(), "\"txt\"");
        let f: Format = serde_json::from_str("\"pdf\"").unwrap();
        assert_eq!(f, Format::Pdf);
    }
}
