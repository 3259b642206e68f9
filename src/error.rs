//! Error types for the docshift library.
//!
//! A single [`ConvertError`] covers the whole failure taxonomy. Every failure
//! inside a single-document conversion surfaces to the immediate caller
//! unchanged, with no silent recovery and no retries. The one place errors
//! are
//! caught rather than propagated is batch processing, where a per-file
//! failure becomes a [`crate::batch::BatchOutcome::Failed`] record so the
//! rest of the batch keeps going.

use crate::format::Format;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the docshift library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file is larger than the configured `max_file_size`.
    ///
    /// Raised before any decode work so oversized inputs cost nothing.
    #[error("'{path}' is {size} bytes, over the {limit}-byte limit\nRaise max_file_size to convert larger documents.")]
    SizeLimitExceeded { path: PathBuf, size: u64, limit: u64 },

    /// The path's extension maps to no supported input format, or the
    /// format is excluded by the configured input set.
    #[error("unsupported input format '{format}'\nSupported inputs: pdf, docx, html, md, txt.")]
    UnsupportedFormat { format: String },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// The requested output format is not in the configured output set.
    #[error("unsupported output format '{format}'")]
    UnsupportedOutputFormat { format: Format },

    /// The (source, target) pair is declared but has no conversion path.
    #[error("conversion to {target} is not implemented")]
    ConversionNotImplemented { target: Format },

    /// A format codec failed to decode, encode, or render.
    #[error("{format} codec error: {detail}")]
    Codec { format: Format, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Filesystem-level failure (stat, read, write, rename, mkdir).
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or file-load validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a panicked worker task).
    #[error("internal error: {0}")]
    Internal(String),
}
