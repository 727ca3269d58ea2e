//! Pricing of a final order text.
//!
//! Pricing re-runs candidate extraction over the final text against the priced
//! catalog, so the same longest-first, word-boundary and one-per-base-item
//! rules apply: a combo is never charged again for one of its ingredients.

use crate::api::Options;
use crate::catalog::{Catalog, Price};
use crate::engine::Matcher;
use serde::Serialize;

/// One priced line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    /// `"Item (Variation)"`, or the bare item name when it has one variation.
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: u64,
}

/// Total and breakdown. A zero total means "unpriced", not "free".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub total: u64,
    pub breakdown: Vec<LineItem>,
}

impl Quote {
    pub fn is_priced(&self) -> bool {
        self.total > 0
    }
}

#[derive(Debug)]
pub struct PricingCalculator<'a> {
    matcher: Matcher<'a>,
}

impl<'a> PricingCalculator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_options(catalog, &Options::default())
    }

    pub fn with_options(catalog: &'a Catalog, options: &Options) -> Self {
        PricingCalculator { matcher: Matcher::with_options(catalog, options) }
    }

    pub fn price(&self, final_text: &str) -> Quote {
        let catalog = self.matcher.catalog();
        if catalog.is_empty() {
            tracing::debug!("priced catalog is empty; order left unpriced");
            return Quote::default();
        }

        let breakdown: Vec<LineItem> = self
            .matcher
            .find_candidates(final_text)
            .into_iter()
            .map(|c| {
                let name = match catalog.find_item(&c.base_item_name) {
                    Some(item) => item.display_name(c.matched_variation.as_deref()),
                    None => c.base_item_name.clone(),
                };
                LineItem {
                    name,
                    quantity: c.quantity,
                    unit_price: c.unit_price,
                    line_total: u64::from(c.unit_price) * u64::from(c.quantity),
                }
            })
            .collect();

        let total = breakdown.iter().map(|l| l.line_total).sum();
        tracing::debug!(total, lines = breakdown.len(), "priced order");
        Quote { total, breakdown }
    }
}
