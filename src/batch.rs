//! Batch conversion: convert every matching file in a directory.
//!
//! The batch driver is tolerant by construction. Each file is converted
//! independently; a failure is recorded as a [`BatchOutcome::Failed`] entry
//! and never stops the rest of the batch. Files run through a bounded
//! concurrent stream, and because the stream preserves input order, the
//! result list and report always follow directory-listing order (sorted by
//! name) regardless of which file finished first.

use crate::config::ConversionConfig;
use crate::convert::convert_document;
use crate::error::ConvertError;
use crate::format::Format;
use crate::progress::BatchProgressCallback;
use crate::reader::map_io;
use futures::stream::{self, StreamExt};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// A compiled filename filter supporting `*` wildcards (`*.md`,
/// `report-*.pdf`). Matching is case-insensitive and anchored to the whole
/// file name.
#[derive(Debug, Clone)]
pub struct FilePattern {
    regex: Regex,
}

impl FilePattern {
    /// Compile a wildcard pattern. Every `*` matches any run of characters
    /// (including none); everything else is literal.
    pub fn compile(pattern: &str) -> Result<Self, ConvertError> {
        let escaped: Vec<String> = pattern.split('*').map(|p| regex::escape(p)).collect();
        let source = format!("(?i)^{}$", escaped.join(".*"));
        let regex = Regex::new(&source)
            .map_err(|e| ConvertError::InvalidConfig(format!("bad pattern '{pattern}': {e}")))?;
        Ok(Self { regex })
    }

    /// Whether a file name matches the pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// The fate of one file in a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Converted and written to `dest`.
    Converted { source: PathBuf, dest: PathBuf },
    /// Failed; `reason` is the rendered error.
    Failed { source: PathBuf, reason: String },
}

impl BatchOutcome {
    pub fn source(&self) -> &Path {
        match self {
            BatchOutcome::Converted { source, .. } | BatchOutcome::Failed { source, .. } => source,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, BatchOutcome::Converted { .. })
    }
}

/// Per-file outcomes of a batch run, in directory-listing order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn converted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_converted()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.converted()
    }

    /// Render the human-readable batch report.
    pub fn report(&self, target: Format) -> String {
        let mut out = format!(
            "Converted {}/{} files to {}",
            self.converted(),
            self.total(),
            target
        );
        if self.failed() > 0 {
            out.push_str(&format!(" ({} failed)", self.failed()));
        }
        out.push('\n');

        for outcome in &self.outcomes {
            let name = display_name(outcome.source());
            match outcome {
                BatchOutcome::Converted { dest, .. } => {
                    out.push_str(&format!("  ✓ {name} -> {}\n", dest.display()));
                }
                BatchOutcome::Failed { reason, .. } => {
                    let first_line = reason.lines().next().unwrap_or(reason);
                    out.push_str(&format!("  ✗ {name}: {first_line}\n"));
                }
            }
        }
        out
    }
}

/// Convert every matching file in `dir` to `target`.
///
/// See [`batch_convert_with_progress`]; this variant reports no progress.
pub async fn batch_convert(
    dir: &Path,
    target: Format,
    pattern: Option<&FilePattern>,
    config: &ConversionConfig,
) -> Result<BatchResult, ConvertError> {
    batch_convert_with_progress(dir, target, pattern, config, None).await
}

/// Convert every matching file in `dir` to `target`, reporting per-file
/// progress through the callback.
///
/// Only plain files (and symlinks resolving to files) directly inside `dir`
/// are considered; subdirectories are not descended into. Files run with at
/// most `config.batch_concurrency` conversions in flight. Returns an error
/// only when the directory itself cannot be listed; per-file failures are
/// part of the result.
pub async fn batch_convert_with_progress(
    dir: &Path,
    target: Format,
    pattern: Option<&FilePattern>,
    config: &ConversionConfig,
    progress: Option<Arc<dyn BatchProgressCallback>>,
) -> Result<BatchResult, ConvertError> {
    let files = list_candidates(dir, pattern).await?;
    let total = files.len();

    info!(dir = %dir.display(), %target, total, "starting batch");
    if let Some(cb) = &progress {
        cb.on_batch_start(total);
    }

    let outcomes: Vec<BatchOutcome> = stream::iter(files.into_iter().enumerate())
        .map(|(idx, path)| {
            let progress = progress.clone();
            async move {
                let index = idx + 1;
                if let Some(cb) = &progress {
                    cb.on_file_start(index, total, &path);
                }
                match convert_document(&path, target, None, config).await {
                    Ok(dest) => {
                        if let Some(cb) = &progress {
                            cb.on_file_converted(index, total, &path);
                        }
                        BatchOutcome::Converted { source: path, dest }
                    }
                    Err(e) => {
                        let reason = e.to_string();
                        warn!(file = %path.display(), %reason, "batch item failed");
                        if let Some(cb) = &progress {
                            cb.on_file_failed(index, total, &path, &reason);
                        }
                        BatchOutcome::Failed {
                            source: path,
                            reason,
                        }
                    }
                }
            }
        })
        .buffered(config.batch_concurrency.max(1))
        .collect()
        .await;

    let result = BatchResult { outcomes };
    info!(
        converted = result.converted(),
        failed = result.failed(),
        "batch complete"
    );
    if let Some(cb) = &progress {
        cb.on_batch_complete(total, result.converted());
    }
    Ok(result)
}

/// List the files in `dir` eligible for conversion, sorted by name.
async fn list_candidates(
    dir: &Path,
    pattern: Option<&FilePattern>,
) -> Result<Vec<PathBuf>, ConvertError> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| map_io(dir, e))?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(|e| map_io(dir, e))? {
        let path = entry.path();
        let file_type = entry.file_type().await.map_err(|e| map_io(&path, e))?;

        let is_file = if file_type.is_symlink() {
            // Keep symlinks only when they resolve to a regular file.
            tokio::fs::metadata(&path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
        } else {
            file_type.is_file()
        };
        if !is_file {
            continue;
        }

        if let Some(p) = pattern {
            if !p.matches(&display_name(&path)) {
                continue;
            }
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
