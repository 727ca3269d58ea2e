//! Item scoring tiers.
//!
//! Each catalog item is scored against the whole input:
//!
//! ```text
//! 100  exact       the display name appears verbatim (case-insensitive)
//!  90  normalized  the normalized name appears in the normalized text
//!  80  all words   every significant word of the name is a word of the text
//!  70  overlap     at least two significant words are shared
//! ```
//!
//! Items scoring at least [`SCORE_THRESHOLD`] count as mentioned. Scoring only
//! decides *whether* the text is an order and which single item best names it;
//! positions and quantities come from `extract.rs`.

use super::compiled::CompiledCatalog;
use super::normalize::contains_bounded;
use super::trigger::TriggerInfo;
use crate::MatchStrength;

pub const SCORE_EXACT: u8 = 100;
pub const SCORE_NORMALIZED: u8 = 90;
pub const SCORE_ALL_WORDS: u8 = 80;
pub const SCORE_OVERLAP: u8 = 70;
pub const SCORE_THRESHOLD: u8 = SCORE_OVERLAP;

/// An item that scored at or above the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredItem {
    pub name: String,
    pub score: u8,
    pub strength: MatchStrength,
}

/// Score every item; returns those at or above the threshold, best first
/// (score, then longer name).
pub(crate) fn score_items(compiled: &CompiledCatalog<'_>, lower: &str, normalized: &str, trigger: &TriggerInfo) -> Vec<ScoredItem> {
    let mut scored: Vec<ScoredItem> = compiled
        .forms
        .iter()
        .enumerate()
        .filter_map(|(idx, forms)| {
            let score = if contains_bounded(lower, &forms.literal) {
                SCORE_EXACT
            } else if contains_bounded(normalized, &forms.normalized) {
                SCORE_NORMALIZED
            } else {
                let present = forms.words.iter().filter(|w| trigger.has_word(w)).count();
                if !forms.words.is_empty() && present == forms.words.len() {
                    SCORE_ALL_WORDS
                } else if present >= 2 {
                    SCORE_OVERLAP
                } else {
                    return None;
                }
            };
            Some(ScoredItem { name: compiled.item(idx).name.clone(), score, strength: strength_for(score) })
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score).then(b.name.len().cmp(&a.name.len())));
    scored
}

pub(crate) fn strength_for(score: u8) -> MatchStrength {
    match score {
        SCORE_EXACT => MatchStrength::Exact,
        SCORE_NORMALIZED => MatchStrength::Normalized,
        _ => MatchStrength::WordOverlap,
    }
}
