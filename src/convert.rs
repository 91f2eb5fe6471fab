//! Batch and per-file conversion entry points.
//!
//! ## The batch contract
//!
//! A single file's failure — unreadable bytes, a converter glitch, an
//! unwritable destination — is caught at the per-file boundary, recorded in
//! its [`FileResult`], logged, and the batch moves on. The run always
//! attempts every discovered file; only a missing input root is fatal.
//! Callers inspect [`BatchOutput::failures`] afterwards to report what was
//! skipped.
//!
//! Files are processed one at a time in deterministic sorted order. Each
//! file's pipeline run is fully independent — no state crosses file
//! boundaries.

use crate::config::ConversionConfig;
use crate::error::{Chm2MdError, FileError};
use crate::output::{BatchOutput, BatchStats, FileResult};
use crate::pipeline::{clean, decode, postprocess, render};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert one in-memory HTML document to Markdown.
///
/// Runs clean → render → postprocess on already-decoded text. This is the
/// core the per-file and batch entry points wrap; it is public so callers
/// with HTML from other sources (tests, archives already in memory) can use
/// the same pipeline.
pub fn convert_html(html: &str, config: &ConversionConfig) -> Result<String, Chm2MdError> {
    let document = clean::clean_document(html, &config.remove_tags);
    let fragment = clean::content_html(&document);
    let markdown = render::render_markdown(&fragment, &config.unwrap_tags)?;
    Ok(postprocess::clean_markdown(&markdown))
}

/// Convert one file from the source tree into the destination tree.
///
/// The destination mirrors the file's path relative to `html_root` under
/// `md_root`, with the extension changed to the configured Markdown
/// extension. Parent directories are created as needed and the write is
/// atomic (temp file + rename), so a failed file leaves nothing behind.
///
/// Never panics and never propagates: every failure is captured in the
/// returned [`FileResult`].
pub fn convert_file(
    src: &Path,
    html_root: &Path,
    md_root: &Path,
    config: &ConversionConfig,
) -> FileResult {
    let relative = src
        .strip_prefix(html_root)
        .unwrap_or(src)
        .to_path_buf();

    let mut result = FileResult {
        source: src.to_path_buf(),
        relative: relative.clone(),
        destination: None,
        encoding: None,
        markdown_len: 0,
        error: None,
    };

    let decoded = match decode::read_decoded(src, &config.encodings) {
        Ok(d) => d,
        Err(e) => {
            result.error = Some(e);
            return result;
        }
    };
    result.encoding = decoded.encoding.clone();

    let markdown = match convert_html(&decoded.text, config) {
        Ok(md) => md,
        Err(Chm2MdError::Render { detail }) => {
            result.error = Some(FileError::Render {
                path: src.to_path_buf(),
                detail,
            });
            return result;
        }
        Err(other) => {
            result.error = Some(FileError::Render {
                path: src.to_path_buf(),
                detail: other.to_string(),
            });
            return result;
        }
    };

    let destination = md_root
        .join(&relative)
        .with_extension(&config.markdown_extension);
    if let Err(e) = write_atomic(&destination, &markdown) {
        result.error = Some(e);
        return result;
    }

    debug!(
        "Converted {} → {} ({} bytes)",
        relative.display(),
        destination.display(),
        markdown.len()
    );
    result.markdown_len = markdown.len();
    result.destination = Some(destination);
    result
}

/// Convert every matching file under `html_root` into a parallel tree under
/// `md_root`.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(BatchOutput)` once every discovered file has been attempted, even if
/// some (or all) of them failed — check `output.stats.failed`. An empty
/// discovery is a successful batch of zero files.
///
/// # Errors
/// Returns `Err(Chm2MdError)` only when the root (or configured subdir)
/// does not exist.
pub fn convert_tree(
    html_root: &Path,
    md_root: &Path,
    config: &ConversionConfig,
) -> Result<BatchOutput, Chm2MdError> {
    let start = Instant::now();

    let files = discover_files(html_root, config.subdir.as_deref(), &config.source_extension)?;
    let total = files.len();
    info!(
        "Discovered {} '{}' file(s) under {}",
        total,
        config.source_extension,
        html_root.display()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut results = Vec::with_capacity(total);
    for (i, src) in files.iter().enumerate() {
        let index = i + 1;
        let relative = src.strip_prefix(html_root).unwrap_or(src);
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(index, total, relative);
        }

        let result = convert_file(src, html_root, md_root, config);

        match &result.error {
            None => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_complete(index, total, relative, result.markdown_len);
                }
            }
            Some(e) => {
                warn!("{}", e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_error(index, total, relative, &e.to_string());
                }
            }
        }
        results.push(result);
    }

    let converted = results.iter().filter(|r| r.is_success()).count();
    let failed = total - converted;
    let stats = BatchStats {
        discovered: total,
        converted,
        failed,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Batch complete: {}/{} files converted in {}ms",
        converted, total, stats.duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, converted);
    }

    Ok(BatchOutput {
        files: results,
        stats,
    })
}

/// Discover source files under `root` (optionally restricted to `subdir`),
/// matching `extension` case-insensitively, in sorted order.
///
/// Sorted order makes batch runs deterministic: logs and `--json` reports
/// from two runs over the same tree are comparable line by line.
pub fn discover_files(
    root: &Path,
    subdir: Option<&Path>,
    extension: &str,
) -> Result<Vec<PathBuf>, Chm2MdError> {
    let base = match subdir {
        Some(sub) => root.join(sub),
        None => root.to_path_buf(),
    };
    if !base.is_dir() {
        return Err(Chm2MdError::RootNotFound { path: base });
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&base)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_extension(e.path(), extension))
        .map(|e| e.into_path())
        .collect();

    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Write `content` to `path` atomically: parent dirs, temp file, rename.
///
/// On any failure the temp file is removed, so the destination tree never
/// contains a partial Markdown file.
fn write_atomic(path: &Path, content: &str) -> Result<(), FileError> {
    let write_err = |e: std::io::Error| FileError::Write {
        path: path.to_path_buf(),
        detail: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| write_err(e))?;
    }

    let tmp = path.with_extension("md.tmp");
    std::fs::write(&tmp, content).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        write_err(e)
    })?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        write_err(e)
    })
}
