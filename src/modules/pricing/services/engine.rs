// Stage pipeline. Each stage sees the price left by the one before it, so
// discounts compound multiplicatively in this fixed order:
//   CHANNEL -> UNIT_SCALE -> AMOUNT_SCALE -> ORDER_AMOUNT -> COMBINATION
// At most one rule (or bundle) wins per stage.

use rust_decimal::Decimal;

use crate::core::{AppError, Result};
use crate::modules::catalog::ItemScope;
use crate::modules::price_lists::SalesChannel;
use crate::modules::rules::services::{apply_bundles, apply_stage, MatchedOrderLine};
use crate::modules::rules::{AppliedRule, PricingRule, ProductBundle, StageInput};

/// Order context of the line being priced
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingContext<'a> {
    pub channel: Option<SalesChannel>,
    pub quantity: Decimal,
    pub order_amount: Option<Decimal>,
    pub order_lines: &'a [MatchedOrderLine],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    pub final_price: Decimal,
    /// In stage order
    pub applied_rules: Vec<AppliedRule>,
}

/// `price × quantity`, rejected as a validation error when it overflows
pub fn line_total(price: Decimal, quantity: Decimal) -> Result<Decimal> {
    price.checked_mul(quantity).ok_or_else(|| {
        AppError::validation(format!(
            "Amount for {} units at {} is out of range",
            quantity, price
        ))
    })
}

/// Fold every stage into `base_price`.
///
/// Pure: the same rules, bundles and context always give the same outcome.
/// The channel stage runs only with a channel, the order-amount stage only
/// with a non-zero order amount and the combination stage only with order
/// lines. Fails only when the line amount overflows.
pub fn run_stages(
    rules: &[PricingRule],
    bundles: &[ProductBundle],
    item: &ItemScope,
    base_price: Decimal,
    ctx: &PricingContext<'_>,
) -> Result<StageOutcome> {
    let mut price = base_price;
    let mut applied_rules = Vec::new();

    let mut run = |price: &mut Decimal, input: StageInput| {
        let (new_price, applied) = apply_stage(rules, item, *price, &input);
        *price = new_price;
        applied_rules.extend(applied);
    };

    if let Some(channel) = ctx.channel {
        run(&mut price, StageInput::Channel(channel));
    }

    run(&mut price, StageInput::UnitScale { quantity: ctx.quantity });

    // line amount is taken after the channel and unit-scale discounts
    let line_amount = line_total(price, ctx.quantity)?;
    run(&mut price, StageInput::AmountScale { line_amount });

    if let Some(order_amount) = ctx.order_amount.filter(|amount| !amount.is_zero()) {
        run(&mut price, StageInput::OrderAmount { order_amount });
    }

    if !ctx.order_lines.is_empty() {
        let (new_price, applied) = apply_bundles(bundles, ctx.order_lines, price);
        price = new_price;
        applied_rules.extend(applied);
    }

    Ok(StageOutcome {
        final_price: price,
        applied_rules,
    })
}
