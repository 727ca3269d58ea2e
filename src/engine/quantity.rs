//! Quantity extraction.
//!
//! Quantities are read from a fixed window of normalized text around a match:
//!
//! ```text
//! "2 pork adobo, 1 yangchow"
//!  ^ before "pork adobo"   -> 2
//!                ^ before "yangchow" -> 1
//! ```
//!
//! Within the window the closest token *before* the match wins; when there is
//! none, the closest token after it (`"adobo x2"`). No token means 1. This is a
//! positional heuristic: in dense multi-item text a token meant for a
//! neighbouring item can be picked up.

use crate::Span;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Map of quantity words to values.
static QUANTITY_WORDS: Lazy<HashMap<&'static str, u32>> =
    Lazy::new(|| HashMap::from([("one", 1), ("two", 2), ("three", 3), ("four", 4), ("five", 5)]));

/// Default half-width of the window, in characters of normalized text.
pub const DEFAULT_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QuantityToken {
    pub span: Span,
    pub value: u32,
}

/// All quantity tokens in `normalized`: `1`-`5`, `one`-`five`, optionally with
/// an `x`/`pc`/`pcs` marker (`2x`, `x2`, `3pcs`).
pub(crate) fn quantity_tokens(normalized: &str) -> Vec<QuantityToken> {
    let re = crate::regex!(r"\bx?([1-5]|one|two|three|four|five)(?:x|pcs|pc)?\b");
    re.captures_iter(normalized)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let token = caps.get(1)?.as_str();
            let value = token.parse::<u32>().ok().or_else(|| QUANTITY_WORDS.get(token).copied())?;
            Some(QuantityToken { span: Span { start: whole.start(), end: whole.end() }, value })
        })
        .collect()
}

/// Quantity for a match at `span` in `text`, looking `window` characters to
/// either side. A token must lie wholly inside the window.
pub(crate) fn quantity_near(text: &str, tokens: &[QuantityToken], span: Span, window: usize) -> u32 {
    let chars = |start: usize, end: usize| text.get(start..end).map_or(usize::MAX, |s| s.chars().count());

    let before = tokens
        .iter()
        .filter(|t| t.span.end <= span.start && chars(t.span.start, span.start) <= window)
        .max_by_key(|t| t.span.end);
    let after = || {
        tokens.iter().filter(|t| t.span.start >= span.end && chars(span.end, t.span.end) <= window).min_by_key(|t| t.span.start)
    };

    before.or_else(after).map(|t| t.value).unwrap_or(1)
}
