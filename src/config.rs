//! Configuration for document conversion.
//!
//! All behaviour is controlled through [`ConversionConfig`], built via its
//! [`ConversionConfigBuilder`] (or deserialized from a JSON file). The value
//! is immutable after construction and passed explicitly into every
//! operation; there is no ambient global config, which keeps tests
//! deterministic under varied settings.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on documented defaults for
//! the rest; adding a field later breaks nobody.

use crate::error::ConvertError;
use crate::format::Format;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Default size limit: 10 MiB.
const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Process-wide conversion configuration.
///
/// # Example
/// ```rust
/// use docshift::{ConversionConfig, Format};
///
/// let config = ConversionConfig::builder()
///     .max_file_size(2 * 1024 * 1024)
///     .output_directory("out")
///     .build()
///     .unwrap();
/// assert!(config.input_formats.contains(&Format::Pdf));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Maximum input file size in bytes. Default: 10 MiB.
    ///
    /// Checked against the file's on-disk size before any decode work, so an
    /// oversized input fails fast instead of burning a full parse.
    pub max_file_size: u64,

    /// Formats accepted as conversion input. Default: all five.
    pub input_formats: BTreeSet<Format>,

    /// Formats offered as conversion output. Default: all five.
    ///
    /// `docx` is in the default set but has no conversion path; requesting
    /// it fails with [`ConvertError::ConversionNotImplemented`] at use.
    pub output_formats: BTreeSet<Format>,

    /// Advisory flag carried from the configuration surface. The current
    /// conversion paths do not consult it; it is surfaced through
    /// [`SupportedFormats`] so callers can see the setting. Default: true.
    pub preserve_formatting: bool,

    /// Base directory for default output paths. Created on demand.
    /// Default: `./converted_documents`.
    pub output_directory: PathBuf,

    /// Bounded worker count for per-file batch conversion. Default: 4.
    ///
    /// Batch items are embarrassingly parallel; a small bound keeps file
    /// handles and codec memory in check while the report stays in
    /// directory-listing order regardless of completion order.
    pub batch_concurrency: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            input_formats: Format::ALL.into_iter().collect(),
            output_formats: Format::ALL.into_iter().collect(),
            preserve_formatting: true,
            output_directory: PathBuf::from("./converted_documents"),
            batch_concurrency: 4,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder seeded with the defaults.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// defaults; the result is validated like a built config.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConvertError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parse a configuration from a JSON string and validate it.
    pub fn from_json_str(raw: &str) -> Result<Self, ConvertError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| ConvertError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Projection of the configuration for `list_supported_formats`.
    /// Pure, no I/O.
    pub fn supported_formats(&self) -> SupportedFormats {
        SupportedFormats {
            input: self.input_formats.iter().copied().collect(),
            output: self.output_formats.iter().copied().collect(),
            max_file_size: self.max_file_size,
            preserve_formatting: self.preserve_formatting,
            output_directory: self.output_directory.clone(),
        }
    }

    fn validate(&self) -> Result<(), ConvertError> {
        if self.max_file_size == 0 {
            return Err(ConvertError::InvalidConfig(
                "max_file_size must be positive".into(),
            ));
        }
        if self.input_formats.is_empty() {
            return Err(ConvertError::InvalidConfig(
                "input_formats must not be empty".into(),
            ));
        }
        if self.output_formats.is_empty() {
            return Err(ConvertError::InvalidConfig(
                "output_formats must not be empty".into(),
            ));
        }
        if self.batch_concurrency == 0 {
            return Err(ConvertError::InvalidConfig(
                "batch_concurrency must be ≥ 1".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn input_formats(mut self, formats: impl IntoIterator<Item = Format>) -> Self {
        self.config.input_formats = formats.into_iter().collect();
        self
    }

    pub fn output_formats(mut self, formats: impl IntoIterator<Item = Format>) -> Self {
        self.config.output_formats = formats.into_iter().collect();
        self
    }

    pub fn preserve_formatting(mut self, v: bool) -> Self {
        self.config.preserve_formatting = v;
        self
    }

    pub fn output_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_directory = dir.into();
        self
    }

    pub fn batch_concurrency(mut self, n: usize) -> Self {
        self.config.batch_concurrency = n.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Read-only projection answering `list_supported_formats`.
#[derive(Debug, Clone, Serialize)]
pub struct SupportedFormats {
    pub input: Vec<Format>,
    pub output: Vec<Format>,
    pub max_file_size: u64,
    pub preserve_formatting: bool,
    pub output_directory: PathBuf,
}
