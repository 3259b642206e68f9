//! The conversion engine: single-document conversion and inspection.
//!
//! Every pairwise conversion routes through HTML as the intermediate
//! representation. Sources are rendered (or wrapped) into HTML, and targets
//! are derived from that one representation, so adding a format means one
//! decoder and one encoder instead of a new row and column of pairwise
//! paths. The two exceptions are deliberate: Markdown to Markdown is a
//! byte-identical copy, and text-flavoured targets take the direct route
//! when no structure would survive the detour anyway.

use crate::codec;
use crate::config::ConversionConfig;
use crate::document::{Document, DocumentInfo};
use crate::error::ConvertError;
use crate::format::Format;
use crate::reader::{self, read_document};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output of a single conversion, before it is written anywhere.
#[derive(Debug, Clone)]
pub enum Rendered {
    /// Textual target (html, md, txt).
    Text(String),
    /// Binary target (pdf).
    Binary(Vec<u8>),
}

impl Rendered {
    /// The rendered output as bytes, consuming the value.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Rendered::Text(s) => s.into_bytes(),
            Rendered::Binary(b) => b,
        }
    }

    /// The rendered output as text, when the target was textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Rendered::Text(s) => Some(s),
            Rendered::Binary(_) => None,
        }
    }
}

/// Convert a single document file to the target format.
///
/// Steps:
/// 1. Check the target against the configured output set.
/// 2. Read and decode the input (format gate, size gate, codec).
/// 3. Resolve the output path (explicit override, or the configured output
///    directory with the source stem and the target's extension).
/// 4. Render and write atomically (temp file + rename).
///
/// Returns the path the converted document was written to.
pub async fn convert_document(
    input: &Path,
    target: Format,
    output: Option<&Path>,
    config: &ConversionConfig,
) -> Result<PathBuf, ConvertError> {
    if !config.output_formats.contains(&target) {
        return Err(ConvertError::UnsupportedOutputFormat { format: target });
    }

    let doc = read_document(input, config).await?;
    info!(
        input = %input.display(),
        source = %doc.format,
        %target,
        "converting document"
    );

    let dest = resolve_output_path(input, target, output, config);
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| reader::map_io(parent, e))?;
        }
    }

    let rendered = render(&doc, target).await?;
    write_atomic(&dest, rendered.into_bytes()).await?;

    info!(dest = %dest.display(), "conversion complete");
    Ok(dest)
}

/// Convert an in-memory byte buffer, returning the rendered output instead
/// of writing a file. The same format and size gates apply as for files.
pub async fn convert_bytes(
    bytes: &[u8],
    source: Format,
    target: Format,
    config: &ConversionConfig,
) -> Result<Rendered, ConvertError> {
    if !config.input_formats.contains(&source) {
        return Err(ConvertError::UnsupportedFormat {
            format: source.to_string(),
        });
    }
    if !config.output_formats.contains(&target) {
        return Err(ConvertError::UnsupportedOutputFormat { format: target });
    }
    if bytes.len() as u64 > config.max_file_size {
        return Err(ConvertError::SizeLimitExceeded {
            path: PathBuf::from("(in-memory)"),
            size: bytes.len() as u64,
            limit: config.max_file_size,
        });
    }

    let doc = if matches!(source, Format::Pdf | Format::Docx) {
        let owned = bytes.to_vec();
        tokio::task::spawn_blocking(move || reader::decode_bytes(&owned, source))
            .await
            .map_err(|e| ConvertError::Internal(format!("decode task failed: {e}")))??
    } else {
        reader::decode_bytes(bytes, source)?
    };

    render(&doc, target).await
}

/// Inspect a document without converting it: format, sizes, codec metadata,
/// and the filesystem modification time.
pub async fn document_info(
    path: &Path,
    config: &ConversionConfig,
) -> Result<DocumentInfo, ConvertError> {
    let doc = read_document(path, config).await?;
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| reader::map_io(path, e))?;

    let size_kb = (meta.len() as f64 / 1024.0 * 10.0).round() / 10.0;
    let last_modified = meta
        .modified()
        .ok()
        .map(|t| DateTime::<Utc>::from(t));

    Ok(DocumentInfo {
        format: doc.format,
        size_kb,
        content_length: doc.content.len(),
        metadata: doc.metadata,
        last_modified,
    })
}

// ── Rendering matrix ─────────────────────────────────────────────────────

/// Render a decoded document into the target format.
async fn render(doc: &Document, target: Format) -> Result<Rendered, ConvertError> {
    debug!(source = %doc.format, %target, "rendering");
    match target {
        Format::Html => Ok(Rendered::Text(to_html(doc)?)),
        Format::Markdown => Ok(Rendered::Text(to_markdown(doc)?)),
        Format::Text => Ok(Rendered::Text(to_text(doc)?)),
        Format::Pdf => {
            let html = to_html(doc)?;
            let title = doc.title().map(str::to_string);
            let bytes =
                tokio::task::spawn_blocking(move || {
                    codec::pdf::encode_html(&html, title.as_deref())
                })
                .await
                .map_err(|e| ConvertError::Internal(format!("encode task failed: {e}")))??;
            Ok(Rendered::Binary(bytes))
        }
        Format::Docx => Err(ConvertError::ConversionNotImplemented { target }),
    }
}

/// The HTML intermediate for any source.
fn to_html(doc: &Document) -> Result<String, ConvertError> {
    Ok(match doc.format {
        // HTML passes through untouched.
        Format::Html => doc.content.clone(),
        Format::Markdown => codec::markdown::to_html(&doc.content),
        // Plain text keeps its exact spacing in a preformatted block.
        Format::Text => codec::html::wrap_preformatted(&doc.content),
        // pdf/docx content is already a flat text extraction.
        Format::Pdf | Format::Docx => codec::html::wrap_flattened(&doc.content),
    })
}

fn to_markdown(doc: &Document) -> Result<String, ConvertError> {
    match doc.format {
        // Identity conversion is byte-exact.
        Format::Markdown => Ok(doc.content.clone()),
        Format::Html => codec::html::to_markdown(&doc.content),
        // Flat text is already valid Markdown.
        Format::Text | Format::Pdf | Format::Docx => Ok(doc.content.clone()),
    }
}

fn to_text(doc: &Document) -> Result<String, ConvertError> {
    match doc.format {
        Format::Html => {
            let (text, _) = codec::html::extract(&doc.content)?;
            Ok(text)
        }
        _ => Ok(doc.content.clone()),
    }
}

// ── Output plumbing ──────────────────────────────────────────────────────

fn resolve_output_path(
    input: &Path,
    target: Format,
    output: Option<&Path>,
    config: &ConversionConfig,
) -> PathBuf {
    if let Some(explicit) = output {
        return explicit.to_path_buf();
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "converted".to_string());
    config
        .output_directory
        .join(format!("{stem}.{}", target.extension()))
}

/// Write via a temp file in the destination directory, then rename. A crash
/// mid-write leaves a temp file behind, never a truncated destination.
async fn write_atomic(dest: &Path, bytes: Vec<u8>) -> Result<(), ConvertError> {
    let file_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let tmp = dest.with_file_name(format!(".{file_name}.tmp"));

    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|e| reader::map_io(&tmp, e))?;
    tokio::fs::rename(&tmp, dest)
        .await
        .map_err(|e| reader::map_io(dest, e))?;
    Ok(())
}
