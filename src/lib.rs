//! # docshift
//!
//! Convert documents between pdf, docx, html, md, and txt.
//!
//! Every conversion routes through a normalized in-memory [`Document`] and
//! an HTML intermediate:
//!
//! ```text
//!   input file ──▶ reader ──▶ Document ──▶ HTML intermediate ──▶ target
//!   (format +      (size      (content +                        (html, md,
//!    extension      gate,      metadata)                         txt, pdf)
//!    detection)     codec)
//! ```
//!
//! Single files convert with [`convert_document`], whole directories with
//! [`batch_convert`] (per-file failures are recorded, never fatal), and
//! [`document_info`] inspects without converting.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use docshift::{convert_document, ConversionConfig, Format};
//!
//! # async fn run() -> Result<(), docshift::ConvertError> {
//! let config = ConversionConfig::builder()
//!     .output_directory("out")
//!     .build()?;
//!
//! let dest = convert_document("notes.md".as_ref(), Format::Html, None, &config).await?;
//! println!("wrote {}", dest.display());
//! # Ok(())
//! # }
//! ```
//!
//! The optional `cli` feature builds the `docshift` binary on top of this
//! library.

pub mod batch;
pub mod codec;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod format;
pub mod progress;
pub mod reader;

pub use batch::{
    batch_convert, batch_convert_with_progress, BatchOutcome, BatchResult, FilePattern,
};
pub use config::{ConversionConfig, ConversionConfigBuilder, SupportedFormats};
pub use convert::{convert_bytes, convert_document, document_info, Rendered};
pub use document::{
    DocMetadata, Document, DocumentInfo, DocxMetadata, HtmlMetadata, PdfInfo, PdfMetadata,
};
pub use error::ConvertError;
pub use format::Format;
pub use progress::{BatchProgressCallback, NoopBatchProgress};
pub use reader::read_document;
