//! Catalog compilation and indexing.
//!
//! A match run is split in two phases, like any table-driven matcher:
//!
//! 1. **Compile** (this module): derive from a [`Catalog`] the normalized
//!    needles every item can be found by, sorted longest-first.
//! 2. **Run** (`extract.rs`, `score.rs`): scan the input against those needles.
//!
//! Each item contributes:
//!
//! - its normalized name (`"chicken mushroom"`),
//! - for items with several variations, `"<name> <label>"` and
//!   `"<label> <name>"` (`"chicken mushroom small"`, `"small chicken mushroom"`).
//!
//! Longer needles win overlaps, so a named variation beats the bare base name
//! and `"sweet and spicy pork ribs"` beats `"pork ribs"`.
//!
//! ## Invariants
//!
//! - `Needle::item` indexes `Catalog::items()` of the catalog this was built from.
//! - `needles` is sorted by descending needle length, then specific before
//!   generic, then catalog order. Matching is deterministic.

use super::dedup::BaseKey;
use super::normalize::{normalize, significant_words};
use crate::catalog::{Catalog, CatalogItem};

/// One searchable form of an item.
#[derive(Debug, Clone)]
pub(crate) struct Needle {
    pub item: usize,
    /// Index into the item's variations when this needle names one.
    pub variation: Option<usize>,
    /// Normalized form searched in normalized text.
    pub normalized: String,
    /// Lowercased display form. A source slice equal to this is an exact hit.
    pub literal: String,
}

/// Per-item data used by the scoring tiers.
#[derive(Debug, Clone)]
pub(crate) struct ItemForms {
    pub literal: String,
    pub normalized: String,
    pub words: Vec<String>,
    pub base: BaseKey,
}

/// A phrase standing in for an item, normalized.
#[derive(Debug, Clone)]
pub(crate) struct CompiledEquivalence {
    pub phrase: String,
    pub item: usize,
}

#[derive(Debug)]
pub struct CompiledCatalog<'a> {
    pub(crate) catalog: &'a Catalog,
    pub(crate) needles: Vec<Needle>,
    pub(crate) forms: Vec<ItemForms>,
    pub(crate) equivalences: Vec<CompiledEquivalence>,
}

impl<'a> CompiledCatalog<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        let mut needles = Vec::new();
        let mut forms = Vec::with_capacity(catalog.items().len());

        for (idx, item) in catalog.items().iter().enumerate() {
            let normalized = normalize(&item.name);
            forms.push(ItemForms {
                literal: item.name.to_lowercase(),
                words: significant_words(&normalized).into_iter().map(str::to_string).collect(),
                base: BaseKey::of(&normalized),
                normalized: normalized.clone(),
            });

            if normalized.is_empty() {
                continue;
            }
            needles.push(Needle { item: idx, variation: None, normalized: normalized.clone(), literal: item.name.to_lowercase() });
            needles.extend(variation_needles(idx, item, &normalized));
        }

        needles.sort_by(|a, b| {
            b.normalized
                .len()
                .cmp(&a.normalized.len())
                .then(b.variation.is_some().cmp(&a.variation.is_some()))
                .then(a.item.cmp(&b.item))
        });

        let mut equivalences: Vec<CompiledEquivalence> = catalog
            .equivalences()
            .iter()
            .filter_map(|eq| {
                let item = catalog.items().iter().position(|it| it.name.eq_ignore_ascii_case(eq.item.trim()))?;
                let phrase = normalize(&eq.phrase);
                (!phrase.is_empty()).then_some(CompiledEquivalence { phrase, item })
            })
            .collect();
        equivalences.sort_by(|a, b| b.phrase.len().cmp(&a.phrase.len()));

        CompiledCatalog { catalog, needles, forms, equivalences }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub(crate) fn item(&self, idx: usize) -> &'a CatalogItem {
        &self.catalog.items()[idx]
    }
}

fn variation_needles(idx: usize, item: &CatalogItem, name: &str) -> Vec<Needle> {
    if !item.needs_variation() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(item.variations.len() * 2);
    for (v_idx, variation) in item.variations.iter().enumerate() {
        let label = normalize(&variation.label);
        if label.is_empty() {
            continue;
        }
        let literal = format!("{} {}", item.name.to_lowercase(), variation.label.to_lowercase());
        out.push(Needle { item: idx, variation: Some(v_idx), normalized: format!("{name} {label}"), literal });
        out.push(Needle {
            item: idx,
            variation: Some(v_idx),
            normalized: format!("{label} {name}"),
            literal: format!("{} {}", variation.label.to_lowercase(), item.name.to_lowercase()),
        });
    }
    out
}
