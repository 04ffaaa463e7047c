use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{AppError, Result};
use crate::modules::catalog::Item;
use crate::modules::price_lists::models::{BasePriceInput, ItemBasePrice, PriceList};
use crate::modules::price_lists::repositories::PriceListRepository;

use super::supplier_discount::{MIN_JUSTIFYING_DISCOUNT, validate_supplier_discount};

/// Largest base price accepted on write
const MAX_BASE_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

/// Exact (list, item) base price lookup. No fallback to other lists.
pub struct BasePriceLookup {
    repo: Arc<dyn PriceListRepository>,
}

impl BasePriceLookup {
    pub fn new(repo: Arc<dyn PriceListRepository>) -> Self {
        Self { repo }
    }

    pub async fn lookup(&self, list: &PriceList, item: &Item) -> Result<ItemBasePrice> {
        self.repo
            .find_base_price(list.id, item.id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "No base price for item {} ({}) in price list {}",
                    item.name, item.id, list.name
                ))
            })
    }
}

/// Enforce the below-cost invariant on a base price write.
///
/// A price under the item's last cost is only accepted when it is authorized
/// below cost or backed by a supplier discount of at least 50%; accepted
/// below-cost prices always carry `below_cost = true`.
pub fn validate_base_price(mut input: BasePriceInput, last_cost: Decimal) -> Result<BasePriceInput> {
    if input.base_price < Decimal::ZERO {
        return Err(AppError::validation("Base price cannot be negative"));
    }

    if input.base_price > MAX_BASE_PRICE {
        return Err(AppError::validation(format!(
            "Base price cannot exceed {}",
            MAX_BASE_PRICE
        )));
    }

    if !input.supplier_discount.is_zero() {
        validate_supplier_discount(input.supplier_discount)?;
    }

    if input.base_price < last_cost {
        if !input.authorized_below_cost && input.supplier_discount < MIN_JUSTIFYING_DISCOUNT {
            return Err(AppError::validation(format!(
                "Price ({}) is below cost ({}). Requires below-cost authorization \
                 or a supplier discount of at least {}%",
                input.base_price, last_cost, MIN_JUSTIFYING_DISCOUNT
            )));
        }
        input.below_cost = true;
    }

    Ok(input)
}

/// Outcome of checking a proposed price against cost
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostCheck {
    pub valid: bool,
    pub message: String,
    pub requires_authorization: bool,
}

pub fn check_cost(last_cost: Decimal, proposed: Decimal) -> CostCheck {
    if proposed >= last_cost {
        CostCheck {
            valid: true,
            message: "Price is valid".to_string(),
            requires_authorization: false,
        }
    } else {
        CostCheck {
            valid: false,
            message: format!("Price ({}) is below cost ({})", proposed, last_cost),
            requires_authorization: true,
        }
    }
}

/// Gross margin over cost in percent, two decimals. Zero when cost is not positive.
pub fn margin_percentage(base_price: Decimal, last_cost: Decimal) -> Decimal {
    if last_cost <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    ((base_price - last_cost) / last_cost * Decimal::ONE_HUNDRED).round_dp(2)
}
