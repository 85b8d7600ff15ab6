//! Text normalization applied before vectorization
//!
//! The cleaning steps must match the ones the vectorizer was trained on:
//! lowercase, drop `http...` runs, keep only ASCII letters and whitespace,
//! collapse whitespace, trim. Whitespace includes the ASCII separators
//! U+001C..U+001F, which Unicode `White_Space` leaves out.

use regex::Regex;
use std::sync::OnceLock;
use veritas_core::Result;

/// Regex-backed text normalizer
pub struct TextNormalizer {
    url_regex: Regex,
    non_alpha_regex: Regex,
    whitespace_regex: Regex,
}

impl TextNormalizer {
    /// Create a new normalizer
    pub fn new() -> Result<Self> {
        Ok(Self {
            url_regex: Regex::new(r"http\S+")
                .map_err(|e| veritas_core::Error::classifier(format!("Failed to compile URL regex: {}", e)))?,
            non_alpha_regex: Regex::new(r"[^a-zA-Z\s\x1c-\x1f]")
                .map_err(|e| veritas_core::Error::classifier(format!("Failed to compile letter regex: {}", e)))?,
            whitespace_regex: Regex::new(r"[\s\x1c-\x1f]+")
                .map_err(|e| veritas_core::Error::classifier(format!("Failed to compile whitespace regex: {}", e)))?,
        })
    }

    /// Normalize raw text into cleaned text.
    ///
    /// The cleaning pass is repeated until it reaches a fixed point, so the
    /// result is stable under re-normalization even when removing a
    /// character joins a fresh `http...` run together.
    pub fn normalize(&self, raw: &str) -> String {
        let mut text = self.clean_once(&raw.to_lowercase());
        loop {
            let next = self.clean_once(&text);
            if next == text {
                return text;
            }
            text = next;
        }
    }

    /// Steps 2-5 of the cleaning pipeline, on already lowercased text
    fn clean_once(&self, text: &str) -> String {
        let text = self.url_regex.replace_all(text, "");
        let text = self.non_alpha_regex.replace_all(&text, "");
        let text = self.whitespace_regex.replace_all(&text, " ");
        text.trim().to_string()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new().expect("Failed to create text normalizer")
    }
}

/// Whitespace as the cleaning regexes see it
pub fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Normalize `raw` with a process-wide [`TextNormalizer`]
pub fn normalize(raw: &str) -> String {
    static NORMALIZER: OnceLock<TextNormalizer> = OnceLock::new();
    NORMALIZER.get_or_init(TextNormalizer::default).normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_cleaning() {
        assert_eq!(normalize("Check http://example.com NOW!!"), "check now");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n "), "");
        assert_eq!(normalize("COVID-19 cases rose 20%"), "covid cases rose");
        assert_eq!(normalize("Line one.\n\nLine   two"), "line one line two");
    }

    #[test]
    fn test_ascii_separators_are_whitespace() {
        assert_eq!(normalize("alpha\x1cbeta"), "alpha beta");
        assert_eq!(normalize("\x1fone\x1d\x1etwo\x1c"), "one two");
        assert!(is_space('\x1e'));
        assert!(!is_space('\x1b'));
    }

    #[test]
    fn test_url_removal() {
        assert_eq!(normalize("see https://t.co/abc123 for more"), "see for more");
        assert_eq!(normalize("HTTP://SHOUTING.COM/x end"), "end");
        // `http` alone is not followed by anything to strip
        assert_eq!(normalize("the http protocol"), "the http protocol");
        assert_eq!(normalize("prefixhttp://x.y tail"), "prefix tail");
    }

    #[test]
    fn test_non_ascii_letters_removed() {
        assert_eq!(normalize("Café naïve résumé"), "caf nave rsum");
        assert_eq!(normalize("日本 news"), "news");
    }

    #[test]
    fn test_spliced_url_is_stable() {
        // Punctuation removal joins "ht" and "tpx" into a URL-like run
        let once = normalize("read ht-tpx now");
        assert_eq!(once, "read now");
        assert_eq!(normalize(&once), once);
    }

    proptest! {
        #[test]
        fn prop_idempotent(s in "\\PC{0,80}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_idempotent_on_url_heavy_input(s in "[hHtTpP:/ .!0-9a-z-]{0,60}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_output_alphabet(s in "\\PC{0,80}") {
            let out = normalize(&s);
            prop_assert!(out.chars().all(|c| c.is_ascii_lowercase() || c == ' '));
            prop_assert!(!out.contains("  "));
            prop_assert!(!out.starts_with(' '));
            prop_assert!(!out.ends_with(' '));
        }
    }
}
