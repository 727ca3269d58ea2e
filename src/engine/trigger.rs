//! Trigger scanning (input pre-classification).
//!
//! A cheap pass over the normalized input that produces coarse signals:
//!
//! - **Buckets** (`TriggerMask`): does the text contain digits, number words,
//!   question markers, a trailing `?`.
//! - **Words**: the set of whitespace/punctuation separated words, reused by
//!   the word-overlap scoring tiers.
//!
//! False positives are fine; the buckets only let later stages skip work (the
//! quantity scan is skipped when no quantity token can possibly match) and
//! pick the rejection reason when nothing matched.

use std::collections::HashSet;

bitflags::bitflags! {
    /// Coarse features of the input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TriggerMask: u8 {
        const HAS_DIGITS       = 1 << 0;
        const HAS_NUMBER_WORD  = 1 << 1;
        const INTERROGATIVE    = 1 << 2;
        const QUESTION_MARK    = 1 << 3;
    }
}

const NUMBER_WORDS: &[&str] = &["one", "two", "three", "four", "five"];

const INTERROGATIVES: &[&str] = &[
    "what", "when", "where", "why", "how", "who", "whom", "whose", "which", "do", "does", "did", "is", "are", "can",
    "could", "will", "would",
];

/// Input characteristics detected from the normalized input.
#[derive(Debug, Clone)]
pub struct TriggerInfo {
    pub buckets: TriggerMask,
    pub words: HashSet<String>,
}

impl TriggerInfo {
    /// Scan normalized (already lowercased) text.
    pub fn scan(normalized: &str) -> Self {
        let mut buckets = TriggerMask::empty();

        if normalized.bytes().any(|b| b.is_ascii_digit()) {
            buckets |= TriggerMask::HAS_DIGITS;
        }
        if normalized.contains('?') {
            buckets |= TriggerMask::QUESTION_MARK;
        }

        let words: HashSet<String> =
            normalized.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).map(str::to_string).collect();

        if NUMBER_WORDS.iter().any(|w| words.contains(*w)) {
            buckets |= TriggerMask::HAS_NUMBER_WORD;
        }
        if INTERROGATIVES.iter().any(|w| words.contains(*w)) {
            buckets |= TriggerMask::INTERROGATIVE;
        }

        TriggerInfo { buckets, words }
    }

    /// Quantity tokens are only possible with digits or number words.
    pub fn may_have_quantity(&self) -> bool {
        self.buckets.intersects(TriggerMask::HAS_DIGITS | TriggerMask::HAS_NUMBER_WORD)
    }

    pub fn is_interrogative(&self) -> bool {
        self.buckets.intersects(TriggerMask::INTERROGATIVE | TriggerMask::QUESTION_MARK)
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_questions_and_quantities() {
        let info = TriggerInfo::scan("what time do you open");
        assert!(info.is_interrogative());
        assert!(!info.may_have_quantity());

        let info = TriggerInfo::scan("2 pork adobo, one yangchow");
        assert!(info.buckets.contains(TriggerMask::HAS_DIGITS | TriggerMask::HAS_NUMBER_WORD));
        assert!(!info.is_interrogative());
        assert!(info.has_word("yangchow"));
    }

    #[test]
    fn number_words_must_be_whole_words() {
        assert!(!TriggerInfo::scan("someone ordered").may_have_quantity());
    }
}
