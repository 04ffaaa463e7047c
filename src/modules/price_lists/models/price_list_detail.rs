// Read models that bundle a list with what hangs off it

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::item_base_price::ItemBasePrice;
use super::price_list::PriceList;
use crate::modules::rules::models::{PricingRule, ProductBundle};

/// A list with its base prices, rules and bundles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListDetail {
    #[serde(flatten)]
    pub list: PriceList,
    pub prices: Vec<ItemBasePrice>,
    pub rules: Vec<PricingRule>,
    pub bundles: Vec<ProductBundle>,
}

/// New validity window for a copied list
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicatePriceList {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Inactive copy of a list, with how much was carried over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatedPriceList {
    #[serde(flatten)]
    pub list: PriceList,
    pub prices_copied: u64,
    pub rules_copied: u64,
}
