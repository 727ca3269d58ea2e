//! Base-item keys for de-duplication.
//!
//! One physical dish must be charged once even when the text mentions it twice,
//! e.g. once generically and once with a named size:
//!
//! ```text
//! "chicken w/ mushroom, make it the chicken w/ mushroom double"
//!   chicken mushroom          -> base, no variation
//!   chicken mushroom double   -> base, variation "Double"   <- kept
//! ```
//!
//! Candidates are grouped by `BaseKey`: the normalized item name with trailing
//! size words stripped. Menus that list sizes as separate items
//! (`"Lomi Small"`, `"Lomi Large"`) therefore group the same way as menus that
//! model sizes as variations.
//!
//! Within a group the winner is decided by [`Precedence`]:
//!
//! 1. a named variation beats none,
//! 2. a stronger match tier beats a weaker one,
//! 3. the earlier mention wins.

use crate::MatchStrength;
use std::cmp::Ordering;

const SIZE_WORDS: &[&str] = &[
    "small", "medium", "large", "regular", "double", "solo", "family", "party", "half", "whole", "single", "big", "xl",
];

/// Normalized base-item name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct BaseKey(String);

impl BaseKey {
    /// Strip trailing size words from a normalized name. A name made only of
    /// size words keeps its last word.
    pub(crate) fn of(normalized: &str) -> Self {
        let mut words: Vec<&str> = normalized.split(' ').filter(|w| !w.is_empty()).collect();
        while words.len() > 1 && words.last().is_some_and(|w| SIZE_WORDS.contains(w)) {
            words.pop();
        }
        BaseKey(words.join(" "))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

/// Ordering key for candidates of the same base item; greater wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Precedence {
    pub specified: bool,
    pub strength: MatchStrength,
    pub start: usize,
}

impl Ord for Precedence {
    fn cmp(&self, other: &Self) -> Ordering {
        self.specified
            .cmp(&other.specified)
            .then(self.strength.cmp(&other.strength))
            // Earlier mention wins.
            .then(other.start.cmp(&self.start))
    }
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
