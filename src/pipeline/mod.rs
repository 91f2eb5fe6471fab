//! Pipeline stages for HTML-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the Markdown backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! decode ──▶ clean ──▶ render ──▶ postprocess
//! (bytes)   (DOM)     (htmd)     (text rules)
//! ```
//!
//! 1. [`decode`] — resolve the unknown source encoding (UTF-8 / GB family)
//!    into a `String`, degrading to lossy UTF-8 rather than failing
//! 2. [`clean`]  — parse into a DOM tree and detach non-content nodes
//!    (scripts, styles, metadata)
//! 3. [`render`] — convert the cleaned subtree to Markdown with ATX headings
//!    and unwrapped inline spans
//! 4. [`postprocess`] — deterministic text-cleanup rules (NBSP, control
//!    characters, internal link extensions, blank lines, final newline)

pub mod clean;
pub mod decode;
pub mod postprocess;
pub mod render;
