//! Matching engine.
//!
//! This module is the entry point for turning customer text into catalog
//! items. It is split into focused submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! catalog ──┐
//!           │  CompiledCatalog::new          (compiled.rs)
//!           └──────────────┬──────────────   needles, longest first
//!                          │
//! text ── NormalizedText ──┼─ TriggerInfo::scan   (normalize.rs, trigger.rs)
//!                          │
//!               ┌──────────┴───────────┐
//!               v                      v
//!        score_items               extract
//!        (score.rs)                (extract.rs)
//!          100/90/80/70 tiers        claimed spans, equivalences,
//!          -> Validation             word overlap, BaseKey dedup (dedup.rs),
//!                                    quantity window (quantity.rs)
//!                                    -> Vec<MatchCandidate>
//! ```
//!
//! ## Responsibilities by module
//!
//! - `normalize.rs`: the single normalization function for names and text,
//!   with a byte map back to the original text; word-boundary helpers.
//! - `compiled.rs`: per-catalog needle table (bare names plus
//!   `"<name> <label>"` / `"<label> <name>"` forms) and equivalence phrases.
//! - `trigger.rs`: cheap pre-scan (digits, number words, question markers).
//! - `score.rs`: validation tiers and the best single item.
//! - `extract.rs`: candidate extraction.
//! - `dedup.rs`: base-item keys and the precedence between duplicates.
//! - `quantity.rs`: quantity tokens and the window heuristic.
//! - `metrics.rs`: optional per-phase timings.
//!
//! ## Public surface
//!
//! Most code goes through [`Matcher`] or the free functions in `api.rs`.
//!
//! ## Debugging
//!
//! Match decisions are logged at `debug` under the `pedido::engine` target;
//! run the CLI with `PEDIDO_LOG=pedido::engine=debug`.

#[path = "engine/compiled.rs"]
mod compiled;
#[path = "engine/dedup.rs"]
mod dedup;
#[path = "engine/extract.rs"]
mod extract;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/normalize.rs"]
mod normalize;
#[path = "engine/quantity.rs"]
mod quantity;
#[path = "engine/score.rs"]
mod score;
#[path = "engine/trigger.rs"]
mod trigger;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use compiled::CompiledCatalog;
pub use matcher::Matcher;
pub use metrics::{RunMetrics, RunResult};
pub use normalize::{NormalizedText, normalize};
pub use quantity::DEFAULT_WINDOW;
pub use score::{SCORE_ALL_WORDS, SCORE_EXACT, SCORE_NORMALIZED, SCORE_OVERLAP, SCORE_THRESHOLD, ScoredItem};
pub use trigger::{TriggerInfo, TriggerMask};
