use crate::catalog::{Catalog, Price};
use crate::engine::{self, RunResult, ScoredItem};
use crate::{MatchStrength, Span};
use std::fmt;

/// Options that affect matching.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Half-width of the quantity window in bytes of normalized text.
    /// `None` uses the engine default (20).
    pub quantity_window: Option<usize>,
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub is_order: bool,
    pub reason: Reason,
}

/// Why a text was accepted or rejected as an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// At least one item scored at or above the threshold, best first.
    Recognized(Vec<ScoredItem>),
    /// The catalog is empty; any non-blank text is accepted.
    CatalogUnavailable,
    /// No item found, and the text reads like a question.
    LooksLikeQuestion,
    /// No item found.
    NoRecognizedItems,
    /// Nothing but whitespace and punctuation.
    Blank,
}

impl Reason {
    /// Stable short name, used in logs and the CLI report.
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Recognized(_) => "recognized",
            Reason::CatalogUnavailable => "catalog-unavailable",
            Reason::LooksLikeQuestion => "question",
            Reason::NoRecognizedItems => "no-items",
            Reason::Blank => "blank",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog item found in customer text.
///
/// `source_span` is a byte span into the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    pub base_item_name: String,
    pub category: String,
    /// `None` when the item has several variations and the text named none.
    pub matched_variation: Option<String>,
    /// Price of the matched variation, or of the first one when unresolved.
    pub unit_price: Price,
    pub quantity: u32,
    pub strength: MatchStrength,
    pub source_span: Span,
}

impl MatchCandidate {
    pub fn needs_variation(&self) -> bool {
        self.matched_variation.is_none()
    }
}

/// Decide whether `text` reads as an order against `catalog`.
///
/// # Example
/// ```
/// use pedido::{Catalog, CatalogDocument, validate};
///
/// let doc = CatalogDocument::from_json(
///     r#"{"menu_categories": {"mains": {"name": "Mains", "items": [
///         {"name": "Pork Adobo", "variations": [{"name": "Regular", "price": 150}]}
///     ]}}}"#,
/// ).unwrap();
/// let catalog = Catalog::from_document(doc);
///
/// assert!(validate(&catalog, "2 pork adobo please").is_order);
/// assert!(!validate(&catalog, "what time do you open").is_order);
/// ```
pub fn validate(catalog: &Catalog, text: &str) -> Validation {
    engine::Matcher::new(catalog).validate(text)
}

/// Every distinct item mentioned in `text`, in order of appearance.
pub fn find_candidates(catalog: &Catalog, text: &str) -> Vec<MatchCandidate> {
    engine::Matcher::new(catalog).find_candidates(text)
}

/// Validate and extract with `options`, timing each phase.
pub fn analyze_with(catalog: &Catalog, text: &str, options: &Options) -> RunResult {
    engine::Matcher::with_options(catalog, options).run_with_metrics(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogDocument;

    fn catalog() -> Catalog {
        let doc = CatalogDocument::from_json(
            r#"{"menu_categories": {"mains": {"name": "Mains", "items": [
                {"name": "Pork Adobo", "variations": [{"name": "Regular", "price": 150}]},
                {"name": "Lomi", "variations": [{"name": "Solo", "price": 120}, {"name": "Large", "price": 200}]}
            ]}}}"#,
        )
        .unwrap();
        Catalog::from_document(doc)
    }

    #[test]
    fn analyze_reports_validation_and_candidates() {
        let run = analyze_with(&catalog(), "2 pork adobo and lomi", &Options::default());
        assert!(run.validation.is_order);
        assert_eq!(run.candidates.len(), 2);
        assert!(run.candidates[1].needs_variation());
        assert!(run.metrics.total >= run.metrics.extract);
    }

    #[test]
    fn blank_text_is_never_an_order() {
        let v = validate(&catalog(), "  ?! ");
        // "?" alone survives normalization, so only pure whitespace is blank
        assert!(!v.is_order);
        assert_eq!(validate(&catalog(), "   ").reason, Reason::Blank);
        assert_eq!(validate(&Catalog::empty(), "").reason, Reason::Blank);
    }

    #[test]
    fn empty_catalog_accepts_anything() {
        let v = validate(&Catalog::empty(), "one of everything");
        assert!(v.is_order);
        assert_eq!(v.reason, Reason::CatalogUnavailable);
    }

    #[test]
    fn narrow_window_skips_distant_quantities() {
        let options = Options { quantity_window: Some(2) };
        let run = analyze_with(&catalog(), "2 of your best pork adobo", &options);
        assert_eq!(run.candidates[0].quantity, 1);
    }
}
