//! The matcher: validation and candidate extraction over one catalog.
//!
//! ```text
//! Matcher::new(catalog)          compile needles once (compiled.rs)
//!
//! run(text)
//!   (0) NormalizedText::new + TriggerInfo::scan
//!   (1) score_items       -> Validation   (is this an order at all?)
//!   (2) extract           -> candidates   (which items, how many)
//! ```
//!
//! A `Matcher` borrows its catalog; build one per catalog snapshot.

use super::compiled::CompiledCatalog;
use super::extract::extract;
use super::metrics::{RunMetrics, RunResult};
use super::normalize::NormalizedText;
use super::quantity::DEFAULT_WINDOW;
use super::score::{ScoredItem, score_items};
use super::trigger::TriggerInfo;
use crate::api::{MatchCandidate, Options, Reason, Validation};
use crate::catalog::Catalog;
use std::time::Instant;

/// Texts at least this long are never treated as mere questions.
const QUESTION_MAX_CHARS: usize = 50;

#[derive(Debug)]
pub struct Matcher<'a> {
    compiled: CompiledCatalog<'a>,
    window: usize,
}

/// One scanned input.
struct Scan<'t> {
    source: &'t str,
    lower: String,
    norm: NormalizedText,
    trigger: TriggerInfo,
}

impl<'t> Scan<'t> {
    fn new(source: &'t str) -> Self {
        let norm = NormalizedText::new(source);
        let trigger = TriggerInfo::scan(norm.as_str());
        Scan { source, lower: source.to_lowercase(), norm, trigger }
    }
}

impl<'a> Matcher<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_options(catalog, &Options::default())
    }

    pub fn with_options(catalog: &'a Catalog, options: &Options) -> Self {
        let window = options.quantity_window.unwrap_or(DEFAULT_WINDOW);
        Matcher { compiled: CompiledCatalog::new(catalog), window }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.compiled.catalog()
    }

    /// Decide whether `text` reads as an order.
    pub fn validate(&self, text: &str) -> Validation {
        self.validate_scan(&Scan::new(text))
    }

    /// Every distinct item mentioned in `text`, in order of appearance.
    pub fn find_candidates(&self, text: &str) -> Vec<MatchCandidate> {
        let scan = Scan::new(text);
        extract(&self.compiled, scan.source, &scan.norm, &scan.trigger, self.window)
    }

    /// The single best-scoring item for `text`, if any.
    pub fn best_match(&self, text: &str) -> Option<ScoredItem> {
        let scan = Scan::new(text);
        score_items(&self.compiled, &scan.lower, scan.norm.as_str(), &scan.trigger).into_iter().next()
    }

    /// Validation and candidates in one pass.
    pub fn run(&self, text: &str) -> (Validation, Vec<MatchCandidate>) {
        let scan = Scan::new(text);
        let validation = self.validate_scan(&scan);
        let candidates = extract(&self.compiled, scan.source, &scan.norm, &scan.trigger, self.window);
        (validation, candidates)
    }

    /// Like [`Matcher::run`], with per-phase timings.
    pub fn run_with_metrics(&self, text: &str) -> RunResult {
        let start = Instant::now();

        let scan = Scan::new(text);
        let scanned = Instant::now();

        let validation = self.validate_scan(&scan);
        let scored = Instant::now();

        let candidates = extract(&self.compiled, scan.source, &scan.norm, &scan.trigger, self.window);
        let extracted = Instant::now();

        let metrics = RunMetrics {
            total: extracted - start,
            scan: scanned - start,
            score: scored - scanned,
            extract: extracted - scored,
            needles: self.compiled.needles.len(),
        };
        RunResult { validation, candidates, metrics }
    }

    fn validate_scan(&self, scan: &Scan<'_>) -> Validation {
        if scan.norm.is_empty() {
            return Validation { is_order: false, reason: Reason::Blank };
        }
        // Without a menu nothing can be recognized; let the conversation go on.
        if self.catalog().is_empty() {
            return Validation { is_order: true, reason: Reason::CatalogUnavailable };
        }

        let scored = score_items(&self.compiled, &scan.lower, scan.norm.as_str(), &scan.trigger);
        if !scored.is_empty() {
            tracing::debug!(best = %scored[0].name, score = scored[0].score, "recognized order text");
            return Validation { is_order: true, reason: Reason::Recognized(scored) };
        }

        if scan.trigger.is_interrogative() && scan.source.trim().chars().count() < QUESTION_MAX_CHARS {
            Validation { is_order: false, reason: Reason::LooksLikeQuestion }
        } else {
            Validation { is_order: false, reason: Reason::NoRecognizedItems }
        }
    }
}
