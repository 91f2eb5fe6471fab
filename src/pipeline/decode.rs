//! Encoding resolution: turn raw bytes of unknown encoding into a `String`.
//!
//! ## Why candidate encodings instead of charset sniffing?
//!
//! The corpus is narrow: CHM archives from a single vendor, authored either
//! in UTF-8 or one of the Chinese GB encodings. A fixed, ordered candidate
//! list is deterministic and explainable — the first encoding that decodes
//! the *entire* byte stream without error wins, and a debug log names it.
//! Content-based charset guessers can disagree between runs on short files;
//! a fixed list never does.
//!
//! Order matters: UTF-8 is strict enough to reject GB-encoded bytes, but
//! GB18030 accepts nearly any byte sequence, so the broad encodings must be
//! tried last. If every candidate rejects the input, we decode as UTF-8 with
//! replacement characters — a file is never skipped just because its bytes
//! are mangled.

use crate::error::FileError;
use encoding_rs::{Encoding, UTF_8};
use std::path::Path;
use tracing::{debug, warn};

/// Text decoded from raw bytes, plus which candidate produced it.
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// The decoded document text.
    pub text: String,
    /// The candidate label that decoded without error, or `None` when the
    /// lossy UTF-8 fallback was used.
    pub encoding: Option<String>,
}

/// Decode `bytes` with the first candidate encoding that accepts the whole
/// stream; fall back to lossy UTF-8 when none do.
///
/// Candidate labels are resolved via the WHATWG label registry
/// ([`Encoding::for_label`]), so `gb2312` resolves to the GBK decoder exactly
/// as browsers treat it. Unknown labels are skipped with a warning rather
/// than aborting, keeping the guarantee that this function always returns
/// text.
pub fn decode_text(bytes: &[u8], candidates: &[String]) -> DecodedText {
    for label in candidates {
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            warn!("Unknown encoding label '{}', skipped", label);
            continue;
        };
        let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
        if !had_errors {
            debug!("Decoded {} bytes as {}", bytes.len(), label);
            return DecodedText {
                text: text.into_owned(),
                encoding: Some(label.clone()),
            };
        }
    }

    // Every candidate rejected the stream. Substitute invalid sequences so
    // the file still converts instead of being dropped from the batch.
    warn!(
        "No candidate encoding decoded cleanly, using lossy UTF-8 ({} bytes)",
        bytes.len()
    );
    let (text, _) = UTF_8.decode_without_bom_handling(bytes);
    DecodedText {
        text: text.into_owned(),
        encoding: None,
    }
}

/// Read a file and decode it with [`decode_text`].
///
/// The only failure here is the raw read itself (file missing, permission
/// denied); it surfaces as [`FileError::Read`] for the per-file caller to
/// report without aborting the batch.
pub fn read_decoded(path: &Path, candidates: &[String]) -> Result<DecodedText, FileError> {
    let bytes = std::fs::read(path).map_err(|e| FileError::Read {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    Ok(decode_text(&bytes, candidates))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_candidates() -> Vec<String> {
        crate::config::ConversionConfig::default().encodings
    }

    #[test]
    fn ascii_decodes_as_first_candidate() {
        let decoded = decode_text(b"hello world", &default_candidates());
        assert_eq!(decoded.text, "hello world");
        assert_eq!(decoded.encoding.as_deref(), Some("utf-8"));
    }

    #[test]
    fn utf8_chinese_decodes_as_utf8() {
        let decoded = decode_text("设备网络".as_bytes(), &default_candidates());
        assert_eq!(decoded.text, "设备网络");
        assert_eq!(decoded.encoding.as_deref(), Some("utf-8"));
    }

    #[test]
    fn gbk_bytes_fall_through_to_gbk() {
        // "设备" in GBK is invalid UTF-8, so the first candidate rejects it.
        let (gbk_bytes, _, _) = encoding_rs::GBK.encode("设备");
        let decoded = decode_text(&gbk_bytes, &default_candidates());
        assert_eq!(decoded.text, "设备");
        assert_eq!(decoded.encoding.as_deref(), Some("gbk"));
    }

    #[test]
    fn first_matching_candidate_wins() {
        // ASCII decodes under every candidate; order says UTF-8 claims it.
        let decoded = decode_text(b"plain", &default_candidates());
        assert_eq!(decoded.encoding.as_deref(), Some("utf-8"));

        // With GBK listed first, GBK claims the same bytes.
        let reordered: Vec<String> = ["gbk", "utf-8"].iter().map(|s| s.to_string()).collect();
        let decoded = decode_text(b"plain", &reordered);
        assert_eq!(decoded.encoding.as_deref(), Some("gbk"));
    }

    #[test]
    fn undecodable_bytes_use_lossy_fallback() {
        // 0x81 is invalid UTF-8 and a GB lead byte with no trailing byte, so
        // truncating the input after it makes every candidate report errors.
        let decoded = decode_text(&[b'A', 0x81], &default_candidates());
        assert_eq!(decoded.encoding, None);
        assert_eq!(decoded.text, "A\u{FFFD}");
    }

    #[test]
    fn unknown_label_is_skipped() {
        let candidates: Vec<String> =
            ["not-a-charset", "utf-8"].iter().map(|s| s.to_string()).collect();
        let decoded = decode_text(b"ok", &candidates);
        assert_eq!(decoded.encoding.as_deref(), Some("utf-8"));
    }

    #[test]
    fn read_decoded_reports_missing_file() {
        let err = read_decoded(
            Path::new("/definitely/not/a/real/page.html"),
            &default_candidates(),
        )
        .unwrap_err();
        assert!(matches!(err, FileError::Read { .. }));
        assert!(err.to_string().contains("page.html"));
    }
}
