//! # chm2md
//!
//! Convert compiled HTML Help (CHM) archives to Markdown.
//!
//! ## Why this crate?
//!
//! Vendor SDK manuals often ship as a single CHM archive full of HTML pages
//! with inconsistent encodings (UTF-8 mixed with GBK/GB2312/GB18030),
//! navigation scripts, and inline styling. Feeding those pages to tooling
//! that expects Markdown — wikis, static-site generators, LLM ingestion —
//! means decoding each page correctly, stripping the presentation markup,
//! and normalising the text. This crate does exactly that, file by file,
//! without ever letting one broken page abort the batch.
//!
//! ## Pipeline Overview
//!
//! ```text
//! CHM archive
//!  │
//!  ├─ 0. Decompile  hh.exe -decompile (Windows-only, optional step)
//!  │
//!  HTML tree
//!  │
//!  ├─ 1. Decode      candidate encodings: utf-8 → gbk → gb2312 → gb18030
//!  ├─ 2. Clean       detach script/style/noscript/meta/link nodes
//!  ├─ 3. Render      HTML → Markdown (ATX headings, spans unwrapped)
//!  ├─ 4. Polish      NBSP, control chars, .html→.md links, blank lines
//!  └─ 5. Output      mirrored .md tree + per-file results
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chm2md::{convert_tree, ConversionConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert_tree(Path::new("html"), Path::new("md"), &config)?;
//!     println!(
//!         "{}/{} files converted",
//!         output.stats.converted, output.stats.discovered
//!     );
//!     for failure in output.failures() {
//!         eprintln!("failed: {}", failure.relative.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `chm2md` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! chm2md = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod decompile;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert_file, convert_html, convert_tree, discover_files};
pub use decompile::{decompile_chm, find_help_viewer};
pub use error::{Chm2MdError, FileError};
pub use output::{BatchOutput, BatchStats, FileResult};
pub use progress::{BatchProgress, BatchProgressCallback, NoopBatchCallback};
