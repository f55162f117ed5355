//! Permissive text decoding.
//!
//! Files are read as raw bytes and decoded as UTF-8 without ever
//! failing. What happens to invalid sequences and to line endings
//! depends on the options.

use serde::{Deserialize, Serialize};

/// What to do with byte sequences that aren't valid UTF-8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Remove them.
    #[default]
    Drop,
    /// Put U+FFFD in their place.
    Replace,
}

/// Line ending handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewlineMode {
    /// `\r\n` and lone `\r` become `\n`.
    #[default]
    Translate,
    /// Line endings are left as they are on disk.
    Keep,
}

/// How file bytes become text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub invalid: DecodePolicy,
    pub newlines: NewlineMode,
}

/// Decoded file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    /// True if at least one invalid sequence was dropped or replaced.
    pub lossy: bool,
}

/// Decodes bytes as UTF-8 under the given options.
///
/// A BOM is kept as U+FEFF. Newlines are translated after decoding,
/// so a `\r` and `\n` separated only by dropped bytes still pair up.
pub fn decode_text(bytes: &[u8], options: DecodeOptions) -> Decoded {
    let (text, lossy) = match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), false),
        Err(_) => decode_lossy(bytes, options.invalid),
    };

    let text = match options.newlines {
        NewlineMode::Translate if text.contains('\r') => translate_newlines(&text),
        _ => text,
    };

    Decoded { text, lossy }
}

fn decode_lossy(bytes: &[u8], policy: DecodePolicy) -> (String, bool) {
    let mut text = String::with_capacity(bytes.len());
    let mut lossy = false;

    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        if !chunk.invalid().is_empty() {
            lossy = true;
            if policy == DecodePolicy::Replace {
                text.push(char::REPLACEMENT_CHARACTER);
            }
        }
    }

    (text, lossy)
}

fn translate_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEEP: DecodeOptions = DecodeOptions {
        invalid: DecodePolicy::Drop,
        newlines: NewlineMode::Keep,
    };

    const REPLACE: DecodeOptions = DecodeOptions {
        invalid: DecodePolicy::Replace,
        newlines: NewlineMode::Translate,
    };

    #[test]
    fn test_valid_utf8_is_untouched_when_keeping_newlines() {
        let src = "const s = \"héllo 世界\";\r\n";
        let decoded = decode_text(src.as_bytes(), KEEP);
        assert_eq!(decoded.text, src);
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_newlines_translated_by_default() {
        let decoded = decode_text(b"a\r\nb\rc\n", DecodeOptions::default());
        assert_eq!(decoded.text, "a\nb\nc\n");
        assert!(!decoded.lossy);

        let decoded = decode_text(b"a\r\nb\rc\n", KEEP);
        assert_eq!(decoded.text, "a\r\nb\rc\n");
    }

    #[test]
    fn test_cr_lf_joined_across_dropped_bytes() {
        let decoded = decode_text(b"a\r\xFF\nb", DecodeOptions::default());
        assert_eq!(decoded.text, "a\nb");
        assert!(decoded.lossy);
    }

    #[test]
    fn test_bom_is_kept() {
        let decoded = decode_text(b"\xEF\xBB\xBFx", DecodeOptions::default());
        assert_eq!(decoded.text, "\u{FEFF}x");
    }

    #[test]
    fn test_drop_removes_invalid_bytes() {
        let decoded = decode_text(b"ab\xFFcd\xC3", DecodeOptions::default());
        assert_eq!(decoded.text, "abcd");
        assert!(decoded.lossy);
    }

    #[test]
    fn test_replace_inserts_replacement_char() {
        let decoded = decode_text(b"ab\xFFcd", REPLACE);
        assert_eq!(decoded.text, "ab\u{FFFD}cd");
        assert!(decoded.lossy);
    }

    #[test]
    fn test_empty_input() {
        let decoded = decode_text(b"", REPLACE);
        assert_eq!(decoded.text, "");
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_policy_serde_names() {
        assert_eq!(serde_json::to_string(&DecodePolicy::Drop).unwrap(), "\"drop\"");
        let p: DecodePolicy = serde_json::from_str("\"replace\"").unwrap();
        assert_eq!(p, DecodePolicy::Replace);
        let n: NewlineMode = serde_json::from_str("\"keep\"").unwrap();
        assert_eq!(n, NewlineMode::Keep);
    }
}
