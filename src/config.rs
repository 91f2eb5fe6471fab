//! Configuration types for HTML-to-Markdown conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across calls, serialise them for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A constructor with half a dozen list arguments is unreadable and breaks on
//! every new field. The builder lets callers set only what they care about and
//! rely on well-documented defaults for the rest.

use crate::error::Chm2MdError;
use crate::progress::BatchProgress;
use std::fmt;
use std::path::PathBuf;

/// Encoding candidates tried in order, matching the corpus this tool targets:
/// vendor help files are either UTF-8 or one of the Chinese GB family.
pub const DEFAULT_ENCODINGS: [&str; 4] = ["utf-8", "gbk", "gb2312", "gb18030"];

/// Element kinds removed outright before conversion. These carry no content:
/// scripts, styles, and document metadata.
pub const DEFAULT_REMOVE_TAGS: [&str; 5] = ["script", "style", "noscript", "meta", "link"];

/// Inline wrapper tags unwrapped during rendering (content kept, tag dropped).
pub const DEFAULT_UNWRAP_TAGS: [&str; 1] = ["span"];

/// Configuration for an HTML-to-Markdown batch conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use chm2md::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .source_extension("htm")
///     .subdir("structs")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Candidate encodings tried in order when decoding source bytes.
    /// Default: `utf-8`, `gbk`, `gb2312`, `gb18030`.
    ///
    /// The first candidate that decodes the entire byte stream without error
    /// wins. Order matters: UTF-8 is strict enough to reject GB-encoded text,
    /// while GB18030 accepts almost anything, so broad encodings must come
    /// last. If every candidate fails, the resolver falls back to lossy UTF-8
    /// so decoding itself never aborts a file.
    pub encodings: Vec<String>,

    /// Source file extension to match, without the dot. Default: `html`.
    ///
    /// Matched case-insensitively, so `INDEX.HTML` is picked up too —
    /// decompiled archives are inconsistent about filename casing.
    pub source_extension: String,

    /// Extension given to output files, without the dot. Default: `md`.
    pub markdown_extension: String,

    /// Element kinds removed (subtree and all) before rendering.
    /// Default: `script`, `style`, `noscript`, `meta`, `link`.
    pub remove_tags: Vec<String>,

    /// Inline tags unwrapped during rendering: their content is kept verbatim
    /// and no Markdown construct is emitted. Default: `span`.
    ///
    /// Vendor help pages wrap nearly every phrase in styled spans; converting
    /// them to emphasis would produce unreadable Markdown.
    pub unwrap_tags: Vec<String>,

    /// Restrict conversion to one subdirectory (relative to the HTML root).
    /// Default: `None` (whole tree).
    pub subdir: Option<PathBuf>,

    /// Progress callback fired per file. Default: `None`.
    pub progress_callback: Option<BatchProgress>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            encodings: DEFAULT_ENCODINGS.iter().map(|s| s.to_string()).collect(),
            source_extension: "html".to_string(),
            markdown_extension: "md".to_string(),
            remove_tags: DEFAULT_REMOVE_TAGS.iter().map(|s| s.to_string()).collect(),
            unwrap_tags: DEFAULT_UNWRAP_TAGS.iter().map(|s| s.to_string()).collect(),
            subdir: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("encodings", &self.encodings)
            .field("source_extension", &self.source_extension)
            .field("markdown_extension", &self.markdown_extension)
            .field("remove_tags", &self.remove_tags)
            .field("unwrap_tags", &self.unwrap_tags)
            .field("subdir", &self.subdir)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    /// Replace the ordered encoding candidate list.
    pub fn encodings<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.encodings = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Source extension to match, with or without a leading dot.
    pub fn source_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.source_extension = normalise_extension(ext.into());
        self
    }

    /// Output extension, with or without a leading dot.
    pub fn markdown_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.markdown_extension = normalise_extension(ext.into());
        self
    }

    /// Replace the set of element kinds removed before rendering.
    pub fn remove_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.remove_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the set of inline tags unwrapped during rendering.
    pub fn unwrap_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.unwrap_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Only convert files under this subdirectory of the HTML root.
    pub fn subdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.subdir = Some(dir.into());
        self
    }

    /// Receive per-file progress events during a batch run.
    pub fn progress_callback(mut self, cb: BatchProgress) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Chm2MdError> {
        let c = &self.config;
        if c.encodings.is_empty() {
            return Err(Chm2MdError::InvalidConfig(
                "Encoding candidate list must not be empty".into(),
            ));
        }
        if c.source_extension.is_empty() {
            return Err(Chm2MdError::InvalidConfig(
                "Source extension must not be empty".into(),
            ));
        }
        if c.markdown_extension.is_empty() {
            return Err(Chm2MdError::InvalidConfig(
                "Markdown extension must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Strip a leading dot so both `.html` and `html` are accepted.
fn normalise_extension(ext: String) -> String {
    ext.trim_start_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_target_corpus() {
        let c = ConversionConfig::default();
        assert_eq!(c.encodings, vec!["utf-8", "gbk", "gb2312", "gb18030"]);
        assert_eq!(c.source_extension, "html");
        assert_eq!(c.markdown_extension, "md");
        assert!(c.remove_tags.contains(&"script".to_string()));
        assert!(c.remove_tags.contains(&"link".to_string()));
        assert_eq!(c.unwrap_tags, vec!["span"]);
        assert!(c.subdir.is_none());
    }

    #[test]
    fn builder_strips_leading_dot_from_extensions() {
        let c = ConversionConfig::builder()
            .source_extension(".htm")
            .markdown_extension(".markdown")
            .build()
            .unwrap();
        assert_eq!(c.source_extension, "htm");
        assert_eq!(c.markdown_extension, "markdown");
    }

    #[test]
    fn empty_encoding_list_is_rejected() {
        let result = ConversionConfig::builder()
            .encodings(Vec::<String>::new())
            .build();
        assert!(matches!(result, Err(Chm2MdError::InvalidConfig(_))));
    }

    #[test]
    fn empty_extension_is_rejected() {
        let result = ConversionConfig::builder().source_extension(".").build();
        assert!(matches!(result, Err(Chm2MdError::InvalidConfig(_))));
    }

    #[test]
    fn debug_does_not_require_callback_debug() {
        let c = ConversionConfig::default();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("source_extension"));
    }
}
