//! Text normalization.
//!
//! Catalog names and customer text go through the same function so that
//! `"Chicken w/ Mushroom"`, `"chicken with mushroom"` and `"CHICKEN MUSHROOM"`
//! all meet at `"chicken mushroom"`.
//!
//! ```text
//! "2 Sweet & Spicy  Ribs (Large)"
//!   lowercase, brackets/dashes -> ' '    "2 sweet & spicy  ribs  large "
//!   " & " -> " and ", "w/" / "with" -> ' '
//!   whitespace runs -> ' ', trim         "2 sweet and spicy ribs large"
//! ```
//!
//! Every byte of the normalized text remembers the byte offset it came from,
//! so spans found in normalized text can be mapped back onto the customer's
//! original message (see [`NormalizedText::source_span`]).

use crate::Span;
use regex::Regex;

/// Normalized text plus a byte map back to the source.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    text: String,
    /// `origin[i]` is the source offset of normalized byte `i`; the extra last
    /// entry is the source offset just past the normalized text.
    origin: Vec<usize>,
}

impl NormalizedText {
    pub fn new(source: &str) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut origin = Vec::with_capacity(source.len() + 1);

        for (offset, ch) in source.char_indices() {
            let mapped = match ch {
                '(' | ')' | '[' | ']' | '{' | '}' | '"' | '-' | '_' | '+' => Some(' '),
                '×' => Some('x'),
                _ => None,
            };
            match mapped {
                Some(m) => push_char(&mut text, &mut origin, m, offset),
                None => {
                    for lower in ch.to_lowercase() {
                        push_char(&mut text, &mut origin, lower, offset);
                    }
                }
            }
        }
        origin.push(source.len());

        let mut out = NormalizedText { text, origin };
        out.rewrite(crate::regex!(r"\s*&\s*"), " and ");
        out.rewrite(crate::regex!(r"\bw/\s*"), " ");
        out.rewrite(crate::regex!(r"\bwith\b"), " ");
        out.rewrite(crate::regex!(r"\s+"), " ");
        out.trim();
        out
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Map a span of the normalized text to the corresponding source span.
    pub fn source_span(&self, span: Span) -> Span {
        let start = self.origin[span.start.min(self.text.len())];
        let end = self.origin[span.end.min(self.text.len())];
        Span { start, end: end.max(start) }
    }

    /// Replace every match of `re` with `replacement`. Replacement bytes map
    /// to the source offset of the start of the match.
    fn rewrite(&mut self, re: &Regex, replacement: &str) {
        if !re.is_match(&self.text) {
            return;
        }

        let mut text = String::with_capacity(self.text.len());
        let mut origin = Vec::with_capacity(self.origin.len());
        let mut last = 0;

        for m in re.find_iter(&self.text) {
            text.push_str(&self.text[last..m.start()]);
            origin.extend_from_slice(&self.origin[last..m.start()]);
            text.push_str(replacement);
            origin.extend(std::iter::repeat_n(self.origin[m.start()], replacement.len()));
            last = m.end();
        }
        text.push_str(&self.text[last..]);
        origin.extend_from_slice(&self.origin[last..]);

        self.text = text;
        self.origin = origin;
    }

    fn trim(&mut self) {
        while self.text.ends_with(' ') {
            self.text.pop();
            // Drop the old end sentinel; the removed space's offset becomes the new one.
            self.origin.pop();
        }
        while self.text.starts_with(' ') {
            self.text.remove(0);
            self.origin.remove(0);
        }
    }
}

fn push_char(text: &mut String, origin: &mut Vec<usize>, ch: char, offset: usize) {
    text.push(ch);
    origin.extend(std::iter::repeat_n(offset, ch.len_utf8()));
}

/// Normalize a catalog name or phrase without keeping the byte map.
pub fn normalize(s: &str) -> String {
    NormalizedText::new(s).text
}

/// True when neither the character before `start` nor the one at `end` is
/// alphanumeric.
pub fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start].chars().next_back().is_none_or(|c| !c.is_alphanumeric());
    let after_ok = text[end..].chars().next().is_none_or(|c| !c.is_alphanumeric());
    before_ok && after_ok
}

/// Every word-bounded occurrence of `needle` in `text`.
pub fn bounded_occurrences(text: &str, needle: &str) -> Vec<Span> {
    if needle.is_empty() {
        return Vec::new();
    }
    text.match_indices(needle)
        .map(|(start, m)| Span { start, end: start + m.len() })
        .filter(|span| is_word_bounded(text, span.start, span.end))
        .collect()
}

/// True when `needle` occurs in `text` on word boundaries.
pub fn contains_bounded(text: &str, needle: &str) -> bool {
    !bounded_occurrences(text, needle).is_empty()
}

/// Connectives that are long enough to count but say nothing about the dish.
const STOP_WORDS: &[&str] = &["and", "the", "with"];

/// Words longer than two characters, minus [`STOP_WORDS`]. Short words
/// (`"w"`, `"of"`, sizes like `"xl"`) carry too little signal for overlap
/// scoring.
pub fn significant_words(normalized: &str) -> Vec<&str> {
    normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(w))
        .collect()
}
