//! In-memory menu.
//!
//! A [`Catalog`] is immutable. Reloading builds a new one and swaps it in
//! through [`CatalogStore`]; nothing mutates a loaded catalog.

#[path = "catalog/document.rs"]
mod document;
#[path = "catalog/source.rs"]
mod source;
#[path = "catalog/store.rs"]
mod store;

pub use document::{CatalogDocument, CategoryDocument, EquivalenceDocument, ItemDocument, VariationDocument};
pub use source::{CatalogSource, ChangeMarker, FileSource, InlineSource, UrlSource};
pub use store::CatalogStore;

use serde::Serialize;
use std::fmt::Write as _;

/// Price in the smallest currency unit.
pub type Price = u32;

/// A named option of an item (a size, or the included protein).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variation {
    pub label: String,
    pub price: Price,
}

/// A purchasable dish. Always carries at least one variation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub name: String,
    pub category: String,
    pub variations: Vec<Variation>,
}

impl CatalogItem {
    /// Items with more than one variation need the customer to pick one.
    pub fn needs_variation(&self) -> bool {
        self.variations.len() > 1
    }

    /// The only variation, for items that have exactly one.
    pub fn sole_variation(&self) -> Option<&Variation> {
        match self.variations.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Look up a variation by label, ignoring case.
    pub fn variation(&self, label: &str) -> Option<&Variation> {
        self.variations.iter().find(|v| v.label.eq_ignore_ascii_case(label))
    }

    /// Price charged when no variation was chosen.
    pub fn base_price(&self) -> Price {
        self.variations.first().map(|v| v.price).unwrap_or(0)
    }

    /// `"Chicken w/ Mushroom (Small)"`, or just the name when the item has a
    /// single variation or none was given.
    pub fn display_name(&self, variation: Option<&str>) -> String {
        match variation {
            Some(label) if self.needs_variation() => format!("{} ({})", self.name, label),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Indices into [`Catalog::items`].
    pub items: Vec<usize>,
}

/// A customer phrase that stands for a differently named catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equivalence {
    pub phrase: String,
    pub item: String,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    items: Vec<CatalogItem>,
    equivalences: Vec<Equivalence>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from a parsed document.
    ///
    /// Subcategories are flattened into their own [`Category`] entries. Items
    /// without variations and equivalences pointing at unknown items are
    /// dropped.
    pub fn from_document(document: CatalogDocument) -> Self {
        let mut catalog = Catalog::default();
        for (id, category) in document.menu_categories {
            catalog.add_category(id, category);
        }

        for eq in document.equivalences {
            if catalog.find_item(&eq.item).is_some() && !eq.phrase.trim().is_empty() {
                catalog.equivalences.push(Equivalence { phrase: eq.phrase, item: eq.item });
            } else {
                tracing::warn!(phrase = %eq.phrase, item = %eq.item, "dropping equivalence for unknown item");
            }
        }

        catalog
    }

    fn add_category(&mut self, id: String, doc: CategoryDocument) {
        let mut indices = Vec::with_capacity(doc.items.len());
        for item in doc.items {
            if item.variations.is_empty() {
                tracing::warn!(item = %item.name, category = %id, "dropping item without variations");
                continue;
            }
            indices.push(self.items.len());
            self.items.push(CatalogItem {
                name: item.name,
                category: id.clone(),
                variations: item.variations.into_iter().map(|v| Variation { label: v.name, price: v.price }).collect(),
            });
        }

        self.categories.push(Category { id, name: doc.name, description: doc.description, items: indices });

        for (sub_id, sub) in doc.subcategories {
            self.add_category(sub_id, sub);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn equivalences(&self) -> &[Equivalence] {
        &self.equivalences
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Find an item by display name, ignoring case.
    pub fn find_item(&self, name: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Items of a category in document order.
    pub fn category_items(&self, id: &str) -> Vec<&CatalogItem> {
        self.category(id).map(|c| c.items.iter().map(|&i| &self.items[i]).collect()).unwrap_or_default()
    }

    /// Menu listing for a category:
    ///
    /// ```text
    /// 🍽️ Stir Fry
    ///
    /// • Chicken w/ Mushroom
    ///   - Small: ₱180
    ///   - Double: ₱320
    /// ```
    pub fn describe_category(&self, id: &str) -> Option<String> {
        let category = self.category(id)?;
        let mut out = format!("🍽️ {}\n\n", category.name);
        for &idx in &category.items {
            let item = &self.items[idx];
            let _ = writeln!(out, "• {}", item.name);
            for v in &item.variations {
                let _ = writeln!(out, "  - {}: ₱{}", v.label, v.price);
            }
        }
        Some(out.trim_end().to_string())
    }
}
