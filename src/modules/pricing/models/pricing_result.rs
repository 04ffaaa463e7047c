use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::rules::AppliedRule;

/// Computed price breakdown for one item. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub item_id: i64,
    pub item_name: String,
    pub quantity: Decimal,
    pub base_price: Decimal,
    pub final_price: Decimal,
    /// final_price × quantity
    pub total_amount: Decimal,
    /// base_price − final_price, per unit
    pub discount_total: Decimal,
    pub discount_percentage: Decimal,
    /// In stage order
    pub applied_rules: Vec<AppliedRule>,
    pub below_cost: bool,
    pub authorized_below_cost: bool,
    pub last_cost: Decimal,
    pub supplier_discount: Decimal,
    pub price_list_id: i64,
    pub price_list_name: String,
}

/// Failure of one line of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItemError {
    pub item_id: i64,
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPricingResult {
    /// Σ base price × quantity over lines that have a base price
    pub order_amount: Decimal,
    pub total_items: usize,
    pub processed_items: usize,
    pub results: Vec<PricingResult>,
    pub errors: Vec<BatchItemError>,
}
