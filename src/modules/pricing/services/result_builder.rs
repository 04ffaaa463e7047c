use rust_decimal::Decimal;

use crate::core::Result;
use crate::modules::catalog::Item;
use crate::modules::price_lists::{ItemBasePrice, PriceList};
use crate::modules::pricing::models::PricingResult;

use super::engine::{line_total, StageOutcome};

/// Result of checking a final price against the item's last cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostFloor {
    pub below_cost: bool,
    /// Only meaningful when below cost; a price at or over cost is always authorized
    pub authorized: bool,
}

impl CostFloor {
    pub fn evaluate(final_price: Decimal, last_cost: Decimal, base: &ItemBasePrice) -> Self {
        let below_cost = final_price < last_cost;
        Self {
            below_cost,
            authorized: !below_cost || base.authorized_below_cost,
        }
    }
}

/// Percentage of `base_price` removed by the discounts; zero for a free item
pub fn discount_percentage(base_price: Decimal, final_price: Decimal) -> Decimal {
    if base_price.is_zero() {
        return Decimal::ZERO;
    }
    (base_price - final_price) / base_price * Decimal::ONE_HUNDRED
}

/// Assemble the priced line. Decimals are carried unrounded.
pub fn build_result(
    list: &PriceList,
    item: &Item,
    base: &ItemBasePrice,
    quantity: Decimal,
    outcome: StageOutcome,
) -> Result<PricingResult> {
    let total_amount = line_total(outcome.final_price, quantity)?;
    let floor = CostFloor::evaluate(outcome.final_price, item.last_cost, base);

    if floor.below_cost {
        tracing::warn!(
            item_id = item.id,
            final_price = %outcome.final_price,
            last_cost = %item.last_cost,
            authorized = floor.authorized,
            "Final price is below cost"
        );
    }

    Ok(PricingResult {
        item_id: item.id,
        item_name: item.name.clone(),
        quantity,
        base_price: base.base_price,
        final_price: outcome.final_price,
        total_amount,
        discount_total: base.base_price - outcome.final_price,
        discount_percentage: discount_percentage(base.base_price, outcome.final_price),
        applied_rules: outcome.applied_rules,
        below_cost: floor.below_cost,
        authorized_below_cost: floor.authorized,
        last_cost: item.last_cost,
        supplier_discount: base.supplier_discount,
        price_list_id: list.id,
        price_list_name: list.name.clone(),
    })
}
