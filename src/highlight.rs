//! Keyword highlighting for subtitle text.
//!
//! The timestamp list shows each subtitle appearance with the matched search
//! term emphasised. [`highlight`] splits the text into plain and matched
//! spans; matching ignores case, and spans borrow the original text so the
//! displayed casing is preserved.

use regex::RegexBuilder;

/// A run of subtitle text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan<'a> {
    pub text: &'a str,
    /// `true` when this run matches the keyword.
    pub matched: bool,
}

/// Split `text` around every case-insensitive occurrence of `keyword`.
///
/// The keyword is matched literally. An empty keyword yields the whole text
/// as a single plain span; empty text yields no spans.
///
/// ```
/// use vidsift::highlight;
///
/// let spans = highlight("The Cat and the cat", "cat");
/// let marked: Vec<_> = spans.iter().filter(|s| s.matched).map(|s| s.text).collect();
/// assert_eq!(marked, ["Cat", "cat"]);
/// ```
pub fn highlight<'a>(text: &'a str, keyword: &str) -> Vec<HighlightSpan<'a>> {
    if text.is_empty() {
        return Vec::new();
    }
    if keyword.is_empty() {
        return vec![HighlightSpan { text, matched: false }];
    }

    let pattern = RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build();
    let Ok(pattern) = pattern else {
        log::warn!("Could not build highlight pattern for {keyword:?}");
        return vec![HighlightSpan { text, matched: false }];
    };

    let mut spans = Vec::new();
    let mut plain_start = 0;

    for found in pattern.find_iter(text) {
        if plain_start < found.start() {
            spans.push(HighlightSpan {
                text: &text[plain_start..found.start()],
                matched: false,
            });
        }
        spans.push(HighlightSpan {
            text: found.as_str(),
            matched: true,
        });
        plain_start = found.end();
    }

    if plain_start < text.len() {
        spans.push(HighlightSpan {
            text: &text[plain_start..],
            matched: false,
        });
    }

    spans
}
