//! Wire shape of the menu document.
//!
//! ```json
//! { "menu_categories": { "stir_fry": { "name": "Stir Fry", "items": [
//!     { "name": "Chicken w/ Mushroom", "variations": [ { "name": "Small", "price": 180 } ] } ],
//!     "subcategories": { } } },
//!   "equivalences": [ { "phrase": "chicken fillet", "item": "Yangchow w/ Chicken Fillet" } ] }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    /// In document order; the menu lists categories as the author arranged them.
    pub menu_categories: IndexMap<String, CategoryDocument>,
    #[serde(default)]
    pub equivalences: Vec<EquivalenceDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<ItemDocument>,
    #[serde(default)]
    pub subcategories: IndexMap<String, CategoryDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDocument {
    pub name: String,
    #[serde(default)]
    pub variations: Vec<VariationDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariationDocument {
    pub name: String,
    pub price: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquivalenceDocument {
    pub phrase: String,
    pub item: String,
}

impl CatalogDocument {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
