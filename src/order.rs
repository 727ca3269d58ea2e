//! Order assembly.
//!
//! Turns a final order text into the immutable [`OrderRecord`] handed to an
//! [`OrderSink`]:
//!
//! ```text
//! final text ──┬─ PricingCalculator (priced catalog) -> line items, total
//!              ├─ best match (display catalog)       -> canonical menu name
//!              └─ OrderNumbers                       -> number, timestamp
//! ```

#[path = "order/number.rs"]
mod number;
#[path = "order/sink.rs"]
mod sink;

pub use number::OrderNumbers;
pub use sink::{JsonLinesSink, MemoryOrderSink, OrderSink};

pub use crate::pricing::LineItem;

use crate::api::Options;
use crate::catalog::Catalog;
use crate::engine::Matcher;
use crate::pricing::PricingCalculator;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

pub const DEFAULT_CUSTOMER_NAME_PREFIX: &str = "Facebook Customer";

/// A completed order. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRecord {
    pub order_number: String,
    pub customer_id: String,
    pub customer_name: String,
    pub raw_text: String,
    pub canonical_menu_name: String,
    pub line_items: Vec<LineItem>,
    /// Sum of line totals; 0 when the order could not be priced.
    pub estimated_total: u64,
    pub order_type: String,
    pub status: String,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug)]
pub struct OrderAssembler<'a> {
    display: Matcher<'a>,
    pricing: PricingCalculator<'a>,
    numbers: &'a OrderNumbers,
    customer_name_prefix: String,
}

impl<'a> OrderAssembler<'a> {
    /// `display` names the order; `priced` prices it. They may be the same
    /// catalog.
    pub fn new(display: &'a Catalog, priced: &'a Catalog, numbers: &'a OrderNumbers) -> Self {
        Self::with_options(display, priced, numbers, &Options::default())
    }

    pub fn with_options(display: &'a Catalog, priced: &'a Catalog, numbers: &'a OrderNumbers, options: &Options) -> Self {
        OrderAssembler {
            display: Matcher::with_options(display, options),
            pricing: PricingCalculator::with_options(priced, options),
            numbers,
            customer_name_prefix: DEFAULT_CUSTOMER_NAME_PREFIX.to_string(),
        }
    }

    pub fn with_customer_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.customer_name_prefix = prefix.into();
        self
    }

    pub fn assemble(&self, customer_id: &str, final_text: &str) -> OrderRecord {
        self.assemble_at(customer_id, final_text, Utc::now())
    }

    pub fn assemble_at(&self, customer_id: &str, final_text: &str, now: DateTime<Utc>) -> OrderRecord {
        let quote = self.pricing.price(final_text);
        let (order_number, created_at) = self.numbers.next(customer_id, now);

        OrderRecord {
            order_number,
            customer_id: customer_id.to_string(),
            customer_name: format!("{} {}", self.customer_name_prefix, number::suffix(customer_id, 4)),
            raw_text: final_text.to_string(),
            canonical_menu_name: self.canonical_menu_name(final_text),
            line_items: quote.breakdown,
            estimated_total: quote.total,
            order_type: "pickup".to_string(),
            status: "pending".to_string(),
            created_at,
        }
    }

    /// The display name of the best matching item, or the text itself.
    pub fn canonical_menu_name(&self, text: &str) -> String {
        match self.display.best_match(text) {
            Some(best) => best.name,
            None => text.trim().to_string(),
        }
    }
}
