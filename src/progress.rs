//! Progress callbacks for batch conversion.
//!
//! Library code stays silent; front-ends that want per-file feedback (a
//! progress bar, a log line per file) implement [`BatchProgressCallback`]
//! and hand it to [`crate::batch_convert_with_progress`]. All methods have
//! no-op defaults so implementors override only what they display.

use std::path::Path;

/// Observer for batch conversion progress.
///
/// Methods are called from the batch driver task; implementations must be
/// `Send + Sync` and should return quickly.
pub trait BatchProgressCallback: Send + Sync {
    /// A batch of `total` files is about to start.
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// File `index` (1-based) of `total` is starting.
    fn on_file_start(&self, index: usize, total: usize, name: &Path) {
        let _ = (index, total, name);
    }

    /// File `index` converted successfully.
    fn on_file_converted(&self, index: usize, total: usize, name: &Path) {
        let _ = (index, total, name);
    }

    /// File `index` failed; the batch continues.
    fn on_file_failed(&self, index: usize, total: usize, name: &Path, reason: &str) {
        let _ = (index, total, name, reason);
    }

    /// The batch finished with `converted` of `total` successes.
    fn on_batch_complete(&self, total: usize, converted: usize) {
        let _ = (total, converted);
    }
}

/// Callback that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBatchProgress;

impl BatchProgressCallback for NoopBatchProgress {}
