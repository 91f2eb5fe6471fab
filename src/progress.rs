//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the batch processes each file.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a log file, or a GUI — without
//! the library knowing anything about how the host application communicates.
//! The trait is `Send + Sync` so configurations remain shareable across
//! threads even though the batch itself runs sequentially.

use std::path::Path;
use std::sync::Arc;

/// Called by the batch orchestrator as it processes each file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Files are processed one at a time in sorted order,
/// so events for a given batch arrive sequentially.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after discovery, before any file is converted.
    ///
    /// # Arguments
    /// * `total_files` — number of files that will be attempted
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file enters the pipeline.
    ///
    /// # Arguments
    /// * `index`    — 1-indexed position in the batch
    /// * `total`    — total files in the batch
    /// * `relative` — path relative to the HTML root
    fn on_file_start(&self, index: usize, total: usize, relative: &Path) {
        let _ = (index, total, relative);
    }

    /// Called when a file's Markdown has been written.
    ///
    /// # Arguments
    /// * `markdown_len` — byte length of the written Markdown
    fn on_file_complete(&self, index: usize, total: usize, relative: &Path, markdown_len: usize) {
        let _ = (index, total, relative, markdown_len);
    }

    /// Called when a file fails; the batch continues with the next file.
    fn on_file_error(&self, index: usize, total: usize, relative: &Path, error: &str) {
        let _ = (index, total, relative, error);
    }

    /// Called once after every file has been attempted.
    ///
    /// # Arguments
    /// * `total_files`   — files attempted
    /// * `success_count` — files converted without error
    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopBatchCallback;

impl BatchProgressCallback for NoopBatchCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type BatchProgress = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        batch_total: AtomicUsize,
        batch_success: AtomicUsize,
    }

    impl BatchProgressCallback for TrackingCallback {
        fn on_batch_start(&self, total_files: usize) {
            self.batch_total.store(total_files, Ordering::SeqCst);
        }

        fn on_file_start(&self, _index: usize, _total: usize, _relative: &Path) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_complete(
            &self,
            _index: usize,
            _total: usize,
            _relative: &Path,
            _markdown_len: usize,
        ) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_error(&self, _index: usize, _total: usize, _relative: &Path, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_batch_complete(&self, _total_files: usize, success_count: usize) {
            self.batch_success.store(success_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopBatchCallback;
        cb.on_batch_start(3);
        cb.on_file_start(1, 3, Path::new("a.html"));
        cb.on_file_complete(1, 3, Path::new("a.html"), 42);
        cb.on_file_error(2, 3, Path::new("b.html"), "some error");
        cb.on_batch_complete(3, 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            batch_total: AtomicUsize::new(0),
            batch_success: AtomicUsize::new(0),
        };

        tracker.on_batch_start(3);
        assert_eq!(tracker.batch_total.load(Ordering::SeqCst), 3);

        let rel = PathBuf::from("guide/page.html");
        tracker.on_file_start(1, 3, &rel);
        tracker.on_file_complete(1, 3, &rel, 100);
        tracker.on_file_start(2, 3, &rel);
        tracker.on_file_error(2, 3, &rel, "read failed");
        tracker.on_file_start(3, 3, &rel);
        tracker.on_file_complete(3, 3, &rel, 200);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);

        tracker.on_batch_complete(3, 2);
        assert_eq!(tracker.batch_success.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn BatchProgressCallback> = Arc::new(NoopBatchCallback);
        cb.on_batch_start(10);
        cb.on_file_start(1, 10, Path::new("index.html"));
        cb.on_file_complete(1, 10, Path::new("index.html"), 512);
    }
}
