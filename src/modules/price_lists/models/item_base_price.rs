use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Base price of one item in one price list. (price_list_id, item_id) is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ItemBasePrice {
    pub id: i64,
    pub price_list_id: i64,
    pub item_id: i64,
    pub base_price: Decimal,
    /// Set whenever the stored base price sits under the item's last cost
    pub below_cost: bool,
    pub authorized_below_cost: bool,
    /// Vendor-granted percentage that can justify a below-cost price
    pub supplier_discount: Decimal,
    pub notes: String,
}

/// Write payload for creating or replacing a base price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasePriceInput {
    pub item_id: i64,
    pub base_price: Decimal,
    #[serde(default)]
    pub below_cost: bool,
    #[serde(default)]
    pub authorized_below_cost: bool,
    #[serde(default)]
    pub supplier_discount: Decimal,
    #[serde(default)]
    pub notes: String,
}

impl BasePriceInput {
    pub fn new(item_id: i64, base_price: Decimal) -> Self {
        Self {
            item_id,
            base_price,
            below_cost: false,
            authorized_below_cost: false,
            supplier_discount: Decimal::ZERO,
            notes: String::new(),
        }
    }
}
