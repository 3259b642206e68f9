//! Reading files into normalized [`Document`]s.
//!
//! The reader owns the input-side gauntlet that every operation shares:
//! detect the format from the extension, check it against the configured
//! input set, stat the file and enforce the size limit, then hand the bytes
//! to the right codec. CPU-heavy decodes (pdf, docx) run on a blocking
//! thread so the async caller is never stalled by a large parse.

use crate::codec;
use crate::config::ConversionConfig;
use crate::document::{DocMetadata, Document};
use crate::error::ConvertError;
use crate::format::Format;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read and decode a document, applying format and size gates first.
///
/// The size limit is checked against the on-disk size before any content is
/// read, so an oversized file fails with [`ConvertError::SizeLimitExceeded`]
/// and never reaches a codec.
pub async fn read_document(
    path: &Path,
    config: &ConversionConfig,
) -> Result<Document, ConvertError> {
    let format = Format::detect(path).ok_or_else(|| ConvertError::UnsupportedFormat {
        format: describe_extension(path),
    })?;

    if !config.input_formats.contains(&format) {
        return Err(ConvertError::UnsupportedFormat {
            format: format.to_string(),
        });
    }

    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| map_io(path, e))?;
    if meta.len() > config.max_file_size {
        return Err(ConvertError::SizeLimitExceeded {
            path: path.to_path_buf(),
            size: meta.len(),
            limit: config.max_file_size,
        });
    }

    debug!(path = %path.display(), %format, size = meta.len(), "reading document");

    match format {
        Format::Pdf | Format::Docx => {
            let bytes = tokio::fs::read(path).await.map_err(|e| map_io(path, e))?;
            let handle = tokio::task::spawn_blocking(move || decode_bytes(&bytes, format));
            handle
                .await
                .map_err(|e| ConvertError::Internal(format!("decode task failed: {e}")))?
        }
        Format::Html => {
            let markup = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| map_io(path, e))?;
            // Content keeps the raw markup so structural conversions still
            // have structure to work with; only the title is extracted here.
            let (_, metadata) = codec::html::extract(&markup)?;
            Ok(Document {
                content: markup,
                format,
                metadata: DocMetadata::Html(metadata),
            })
        }
        Format::Markdown | Format::Text => {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| map_io(path, e))?;
            Ok(Document::new(content, format))
        }
    }
}

/// Decode an in-memory byte buffer as the given format. Shared by the
/// file reader and [`crate::convert_bytes`].
pub(crate) fn decode_bytes(bytes: &[u8], format: Format) -> Result<Document, ConvertError> {
    match format {
        Format::Pdf => {
            let (content, metadata) = codec::pdf::decode(bytes)?;
            Ok(Document {
                content,
                format,
                metadata: DocMetadata::Pdf(metadata),
            })
        }
        Format::Docx => {
            let (content, metadata) = codec::docx::decode(bytes)?;
            Ok(Document {
                content,
                format,
                metadata: DocMetadata::Docx(metadata),
            })
        }
        Format::Html => {
            let markup = utf8(bytes, format)?;
            let (_, metadata) = codec::html::extract(&markup)?;
            Ok(Document {
                content: markup,
                format,
                metadata: DocMetadata::Html(metadata),
            })
        }
        Format::Markdown | Format::Text => Ok(Document::new(utf8(bytes, format)?, format)),
    }
}

fn utf8(bytes: &[u8], format: Format) -> Result<String, ConvertError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ConvertError::Codec {
        format,
        detail: format!("invalid UTF-8: {e}"),
    })
}

/// Classify an I/O error at a path into the error taxonomy.
pub(crate) fn map_io(path: &Path, e: std::io::Error) -> ConvertError {
    match e.kind() {
        std::io::ErrorKind::NotFound => ConvertError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => ConvertError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ConvertError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    }
}

/// A human-readable description of an unrecognised extension for error
/// messages (`"xlsx"`, or `"(none)"` for extensionless paths).
fn describe_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| "(none)".to_string())
}
