// Catalog tree: Line -> Group -> Item.
// Rules and bundle requirements that name a line apply to every item
// transitively under it, so pricing works on an item's resolved scope.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Top-level product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProductLine {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub active: bool,
}

/// Sub-category, belongs to exactly one line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProductGroup {
    pub id: i64,
    pub line_id: i64,
    pub code: String,
    pub name: String,
    pub active: bool,
}

/// Sellable catalog item, belongs to exactly one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub group_id: i64,
    pub code: String,
    pub name: String,
    pub unit_of_measure: String,
    /// Last known acquisition cost, the floor for below-cost checks
    pub last_cost: Decimal,
    pub active: bool,
}

/// An item's position in the catalog tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemScope {
    pub item_id: i64,
    pub group_id: i64,
    pub line_id: i64,
}

impl ItemScope {
    pub fn new(item_id: i64, group_id: i64, line_id: i64) -> Self {
        Self {
            item_id,
            group_id,
            line_id,
        }
    }
}
