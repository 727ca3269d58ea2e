//! Matcher run metrics.
//!
//! `Matcher::run` is the normal path; `Matcher::run_with_metrics` also times
//! each phase so the CLI report can show where a slow message spent its time.

use crate::api::{MatchCandidate, Validation};
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for [`Matcher::run_with_metrics`](super::Matcher::run_with_metrics).
    pub total: Duration,
    /// Normalization and trigger scan.
    pub scan: Duration,
    /// Item scoring (validation).
    pub score: Duration,
    /// Candidate extraction, dedup and quantities.
    pub extract: Duration,
    /// Number of needles compared against the input.
    pub needles: usize,
}

/// Matcher output bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub validation: Validation,
    pub candidates: Vec<MatchCandidate>,
    pub metrics: RunMetrics,
}
