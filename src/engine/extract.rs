//! Candidate extraction.
//!
//! Finds every catalog item referenced in the text, in passes of decreasing
//! precision. Each accepted match *claims* its span; later passes and shorter
//! needles may not overlap a claimed span.
//!
//! ```text
//! (1) needles, longest first    exact / normalized, word-bounded
//! (2) equivalence phrases       named exceptions, unclaimed regions only
//! (3) word overlap              two or more significant words of a name,
//!                               each outside claimed spans
//! (4) base-item dedup           one candidate per BaseKey (dedup.rs)
//! (5) quantities                window scan around each survivor (quantity.rs)
//! ```

use super::compiled::CompiledCatalog;
use super::dedup::{BaseKey, Precedence};
use super::normalize::{NormalizedText, bounded_occurrences};
use super::quantity::{quantity_near, quantity_tokens};
use super::trigger::TriggerInfo;
use crate::api::MatchCandidate;
use crate::{MatchStrength, Span};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct RawMatch {
    item: usize,
    variation: Option<usize>,
    /// The variation (or a size in the item name) came from the text.
    specified: bool,
    strength: MatchStrength,
    span: Span,
}

pub(crate) fn extract(
    compiled: &CompiledCatalog<'_>,
    source: &str,
    norm: &NormalizedText,
    trigger: &TriggerInfo,
    window: usize,
) -> Vec<MatchCandidate> {
    let text = norm.as_str();
    let mut claimed: Vec<Span> = Vec::new();
    let mut raw: Vec<RawMatch> = Vec::new();

    // (1) Needles.
    for needle in &compiled.needles {
        for span in bounded_occurrences(text, &needle.normalized) {
            if overlaps_any(&claimed, span) {
                continue;
            }
            claimed.push(span);

            let src = norm.source_span(span);
            let strength = if source[src.start..src.end].to_lowercase() == needle.literal {
                MatchStrength::Exact
            } else {
                MatchStrength::Normalized
            };
            raw.push(matched(compiled, needle.item, needle.variation, strength, span));
        }
    }

    // (2) Equivalences.
    for eq in &compiled.equivalences {
        for span in bounded_occurrences(text, &eq.phrase) {
            if overlaps_any(&claimed, span) {
                continue;
            }
            claimed.push(span);
            raw.push(matched(compiled, eq.item, None, MatchStrength::Normalized, span));
        }
    }

    // (3) Word overlap, longest names first. Same bar as the 70 tier: two
    // significant words of the name, each outside claimed spans.
    let mut by_length: Vec<usize> = (0..compiled.forms.len()).collect();
    by_length.sort_by(|&a, &b| compiled.forms[b].normalized.len().cmp(&compiled.forms[a].normalized.len()));

    for idx in by_length {
        let forms = &compiled.forms[idx];
        if forms.words.len() < 2 || raw.iter().any(|m| m.item == idx) {
            continue;
        }

        let found: Vec<Span> = forms
            .words
            .iter()
            .filter_map(|word| bounded_occurrences(text, word).into_iter().find(|s| !overlaps_any(&claimed, *s)))
            .collect();
        if found.len() < 2 {
            continue;
        }

        let covering = Span {
            start: found.iter().map(|s| s.start).min().unwrap_or_default(),
            end: found.iter().map(|s| s.end).max().unwrap_or_default(),
        };
        claimed.extend(found);
        raw.push(matched(compiled, idx, None, MatchStrength::WordOverlap, covering));
    }

    // (4) One candidate per base item.
    let mut winners: HashMap<&BaseKey, usize> = HashMap::new();
    for (i, m) in raw.iter().enumerate() {
        let key = &compiled.forms[m.item].base;
        match winners.get(key) {
            Some(&j) if precedence(&raw[j]) >= precedence(m) => {
                tracing::debug!(item = %compiled.item(m.item).name, "dropping duplicate mention of base item");
            }
            _ => {
                winners.insert(key, i);
            }
        }
    }
    let mut kept: Vec<&RawMatch> = winners.into_values().map(|i| &raw[i]).collect();
    kept.sort_by_key(|m| m.span.start);

    // (5) Quantities. Tokens inside any claimed span belong to an item name.
    let tokens = if trigger.may_have_quantity() {
        quantity_tokens(text).into_iter().filter(|t| !overlaps_any(&claimed, t.span)).collect()
    } else {
        Vec::new()
    };

    kept.into_iter()
        .map(|m| {
            let item = compiled.item(m.item);
            let variation = m.variation.map(|v| &item.variations[v]);
            MatchCandidate {
                base_item_name: item.name.clone(),
                category: item.category.clone(),
                matched_variation: variation.map(|v| v.label.clone()),
                unit_price: variation.map(|v| v.price).unwrap_or_else(|| item.base_price()),
                quantity: quantity_near(text, &tokens, m.span, window),
                strength: m.strength,
                source_span: norm.source_span(m.span),
            }
        })
        .collect()
}

fn matched(
    compiled: &CompiledCatalog<'_>,
    item: usize,
    named: Option<usize>,
    strength: MatchStrength,
    span: Span,
) -> RawMatch {
    let forms = &compiled.forms[item];
    let sized_name = forms.base.as_str() != forms.normalized;
    let variation = named.or_else(|| compiled.item(item).sole_variation().map(|_| 0));
    RawMatch { item, variation, specified: named.is_some() || sized_name, strength, span }
}

fn precedence(m: &RawMatch) -> Precedence {
    Precedence { specified: m.specified, strength: m.strength, start: m.span.start }
}

fn overlaps_any(claimed: &[Span], span: Span) -> bool {
    claimed.iter().any(|c| c.overlaps(span))
}
