//! Output types: per-file results and batch statistics.
//!
//! A batch run never aborts on a single bad file, so its outcome is not a
//! plain `Result` — it is a list of [`FileResult`]s, one per discovered file,
//! each either carrying the written destination or the [`FileError`] that
//! stopped it. [`BatchOutput`] bundles the list with aggregate
//! [`BatchStats`] for summary lines and `--json` reports.

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of converting one source file.
///
/// Exactly one of `destination` / `error` is `Some` after a batch run:
/// either the full Markdown text was written or nothing was.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    /// The source file as discovered.
    pub source: PathBuf,

    /// Path relative to the HTML root; the destination mirrors this.
    pub relative: PathBuf,

    /// The written Markdown file, on success.
    pub destination: Option<PathBuf>,

    /// Encoding candidate that decoded the source, or `None` when the
    /// lossy UTF-8 fallback was used.
    pub encoding: Option<String>,

    /// Byte length of the written Markdown. Zero on failure.
    pub markdown_len: usize,

    /// The failure, if any. `None` means the file converted and was written.
    pub error: Option<FileError>,
}

impl FileResult {
    /// True when the file converted and its Markdown was written.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate statistics for one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStats {
    /// Files discovered under the root (after extension and subdir filters).
    pub discovered: usize,
    /// Files converted and written.
    pub converted: usize,
    /// Files that failed with a per-file error.
    pub failed: usize,
    /// Wall-clock duration of the whole batch in milliseconds.
    pub duration_ms: u64,
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    /// One entry per discovered file, in processing (sorted path) order.
    pub files: Vec<FileResult>,
    /// Aggregate counters.
    pub stats: BatchStats,
}

impl BatchOutput {
    /// Iterate over the files that failed, for end-of-run reporting.
    pub fn failures(&self) -> impl Iterator<Item = &FileResult> {
        self.files.iter().filter(|f| !f.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_result(name: &str) -> FileResult {
        FileResult {
            source: PathBuf::from(format!("html/{name}.html")),
            relative: PathBuf::from(format!("{name}.html")),
            destination: Some(PathBuf::from(format!("md/{name}.md"))),
            encoding: Some("utf-8".into()),
            markdown_len: 42,
            error: None,
        }
    }

    #[test]
    fn failures_iterator_skips_successes() {
        let failed = FileResult {
            source: PathBuf::from("html/b.html"),
            relative: PathBuf::from("b.html"),
            destination: None,
            encoding: None,
            markdown_len: 0,
            error: Some(FileError::Read {
                path: PathBuf::from("html/b.html"),
                detail: "permission denied".into(),
            }),
        };
        let output = BatchOutput {
            files: vec![ok_result("a"), failed, ok_result("c")],
            stats: BatchStats {
                discovered: 3,
                converted: 2,
                failed: 1,
                duration_ms: 7,
            },
        };
        let failures: Vec<_> = output.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].relative, PathBuf::from("b.html"));
    }

    #[test]
    fn batch_output_serialises_to_json() {
        let output = BatchOutput {
            files: vec![ok_result("a")],
            stats: BatchStats {
                discovered: 1,
                converted: 1,
                failed: 0,
                duration_ms: 3,
            },
        };
        let json = serde_json::to_string_pretty(&output).unwrap();
        assert!(json.contains("\"converted\": 1"));
        assert!(json.contains("a.md"));
    }
}
