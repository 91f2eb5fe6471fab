//! Error types for the chm2md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Chm2MdError`] — **Fatal**: the batch cannot proceed at all
//!   (missing input root, invalid configuration, no help viewer found).
//!   Returned as `Err(Chm2MdError)` from the top-level `convert*` and
//!   `decompile*` functions.
//!
//! * [`FileError`] — **Non-fatal**: a single file failed (unreadable bytes,
//!   conversion glitch, destination not writable) but the rest of the batch
//!   is fine. Stored inside [`crate::output::FileResult`] so callers can
//!   inspect partial success rather than losing the whole tree to one bad
//!   page.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! file failure, log and continue, or collect all errors for a post-run report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the chm2md library.
///
/// File-level failures use [`FileError`] and are stored in
/// [`crate::output::FileResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Chm2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The HTML root (or requested subdirectory) does not exist.
    #[error("HTML root not found: '{path}'\nRun the decompile step first, or pass --root.")]
    RootNotFound { path: PathBuf },

    /// The CHM archive to decompile was not found.
    #[error("CHM file not found: '{path}'\nCheck the path exists and is readable.")]
    ChmNotFound { path: PathBuf },

    // ── Decompile errors ──────────────────────────────────────────────────
    /// `hh.exe` could not be located in PATH or the system directories.
    #[error(
        "HTML Help viewer (hh.exe) not found.\n\
Install the Windows HTML Help viewer or add hh.exe to PATH.\n\
Decompilation only works on Windows; the HTML→Markdown conversion\n\
itself runs anywhere once the HTML tree exists."
    )]
    ViewerNotFound,

    /// The help viewer ran but did not complete successfully.
    #[error("Decompilation failed: {detail}")]
    DecompileFailed { detail: String },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// The HTML→Markdown rendering step raised an internal error.
    ///
    /// Only surfaced by [`crate::convert::convert_html`], which operates on a
    /// single in-memory document. In a batch run the same failure becomes a
    /// per-file [`FileError::Render`] instead.
    #[error("Markdown rendering failed: {detail}")]
    Render { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create a directory the batch needs (e.g. the decompile
    /// output directory).
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single file in a batch.
///
/// Stored alongside [`crate::output::FileResult`] when a file fails.
/// The overall batch always attempts every discovered file.
///
/// Variants carry the error message as a plain `String` (rather than a
/// `std::io::Error` source) so results stay `Clone` and serialisable for
/// `--json` batch reports.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// The source file could not be read at all (missing, permissions).
    ///
    /// Decoding the bytes themselves never fails — the encoding resolver
    /// degrades to lossy UTF-8 — so this is the only "decode" failure that
    /// can actually occur.
    #[error("'{path}': read failed: {detail}")]
    Read { path: PathBuf, detail: String },

    /// The markup could not be parsed into a tree.
    ///
    /// Reserved: the html5ever parser recovers from arbitrary input, so this
    /// variant is kept for taxonomy completeness and future parser backends.
    #[error("'{path}': parse failed: {detail}")]
    Parse { path: PathBuf, detail: String },

    /// The HTML→Markdown conversion step raised an internal error.
    #[error("'{path}': render failed: {detail}")]
    Render { path: PathBuf, detail: String },

    /// The destination could not be created or written.
    #[error("'{path}': write failed: {detail}")]
    Write { path: PathBuf, detail: String },
}

impl FileError {
    /// The path of the file (source or destination) this error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            FileError::Read { path, .. }
            | FileError::Parse { path, .. }
            | FileError::Render { path, .. }
            | FileError::Write { path, .. } => path,
        }
    }
}
