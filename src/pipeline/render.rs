//! Markdown rendering: convert the cleaned DOM subtree to Markdown text.
//!
//! The tag-to-Markdown mapping itself is delegated to [`htmd`] — paragraphs,
//! lists, emphasis, links, and images follow its standard conventions. Two
//! choices are ours:
//!
//! * **ATX headings.** Underlined (setext) headings break when the heading
//!   text itself contains Markdown punctuation, and they diff poorly. Every
//!   heading level renders as `#`-prefixed.
//! * **Unwrapped spans.** Vendor help pages wrap nearly every phrase in a
//!   styled `<span>`; mapping those to emphasis would produce unreadable
//!   output. A custom handler returns the span content verbatim, so the
//!   wrapper disappears without adding any Markdown construct.

use crate::error::Chm2MdError;
use htmd::element_handler::Handlers;
use htmd::options::{HeadingStyle, Options};
use htmd::{Element, HtmlToMarkdown};

/// Render an HTML fragment (typically the cleaned `<body>`) to Markdown.
///
/// Tags listed in `unwrap_tags` are stripped with their content preserved.
/// Internal converter errors surface as [`Chm2MdError::Render`]; the
/// per-file caller downgrades them to a non-fatal
/// [`crate::error::FileError::Render`].
pub fn render_markdown(html: &str, unwrap_tags: &[String]) -> Result<String, Chm2MdError> {
    let mut builder = HtmlToMarkdown::builder().options(Options {
        heading_style: HeadingStyle::Atx,
        ..Default::default()
    });

    if !unwrap_tags.is_empty() {
        let tags: Vec<&str> = unwrap_tags.iter().map(String::as_str).collect();
        // Emit the converted children only: the wrapper disappears without
        // adding any Markdown construct.
        builder = builder.add_handler(tags, |handlers: &dyn Handlers, el: Element| {
            Some(handlers.walk_children(el.node))
        });
    }

    builder
        .build()
        .convert(html)
        .map_err(|e| Chm2MdError::Render {
            detail: e.to_string(),
        })
}
