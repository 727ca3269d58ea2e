use serde::Serialize;

#[macro_use]
mod macros;
mod api;
mod bot;
mod catalog;
mod engine;
mod error;
mod hours;
mod order;
mod pricing;
mod resolver;
mod settings;

pub use api::{MatchCandidate, Options, Reason, Validation, analyze_with, find_candidates, validate};
pub use bot::{ChoiceOption, Inbound, MessageSink, OrderBot, Reply, selection};
pub use catalog::{
    Catalog, CatalogDocument, CatalogItem, CatalogSource, CatalogStore, Category, CategoryDocument, ChangeMarker,
    Equivalence, EquivalenceDocument, FileSource, InlineSource, ItemDocument, Price, UrlSource, Variation,
    VariationDocument,
};
pub use engine::{Matcher, RunMetrics, RunResult, ScoredItem};
pub use error::{CatalogError, SendError, SettingsError, SinkError};
pub use hours::StoreHours;
pub use order::{JsonLinesSink, LineItem, MemoryOrderSink, OrderAssembler, OrderNumbers, OrderRecord, OrderSink};
pub use pricing::{PricingCalculator, Quote};
pub use resolver::{
    CANCEL_KEYWORDS, ConversationState, InMemorySessionStore, Mode, PendingItem, Prompt, SessionStore, Step,
    VariationResolver, is_cancel, option_token,
};
pub use settings::Settings;

// --- Shared value types -----------------------------------------------------

/// Byte span `[start, end)` into a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// How a candidate was found. Ordered: `Exact` is the strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrength {
    /// Only the item's significant words were found, possibly apart.
    WordOverlap,
    /// Found after separator normalization (`w/`, `with`, `&`, brackets).
    Normalized,
    /// The display name appears verbatim, ignoring case.
    Exact,
}

impl MatchStrength {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStrength::WordOverlap => "word-overlap",
            MatchStrength::Normalized => "normalized",
            MatchStrength::Exact => "exact",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_overlap_only_when_sharing_bytes() {
        let a = Span { start: 0, end: 5 };
        assert!(a.overlaps(Span { start: 4, end: 9 }));
        assert!(!a.overlaps(Span { start: 5, end: 9 }));
        assert!(Span { start: 3, end: 3 }.is_empty());
    }

    #[test]
    fn strengths_are_ordered() {
        assert!(MatchStrength::Exact > MatchStrength::Normalized);
        assert!(MatchStrength::Normalized > MatchStrength::WordOverlap);
    }
}
