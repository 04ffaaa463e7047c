use rust_decimal::Decimal;

use crate::modules::catalog::ItemScope;
use crate::modules::price_lists::SalesChannel;
use crate::modules::rules::models::{AppliedRule, PricingRule, RuleKind};

/// Context one rule stage matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageInput {
    Channel(SalesChannel),
    UnitScale { quantity: Decimal },
    /// Running price × quantity after the earlier stages
    AmountScale { line_amount: Decimal },
    OrderAmount { order_amount: Decimal },
}

impl StageInput {
    pub fn kind(&self) -> RuleKind {
        match self {
            StageInput::Channel(_) => RuleKind::Channel,
            StageInput::UnitScale { .. } => RuleKind::UnitScale,
            StageInput::AmountScale { .. } => RuleKind::AmountScale,
            StageInput::OrderAmount { .. } => RuleKind::OrderAmount,
        }
    }

    /// Whether `rule` is a candidate for this stage when pricing `item`
    pub fn admits(&self, rule: &PricingRule, item: &ItemScope) -> bool {
        if !rule.active || rule.kind != self.kind() {
            return false;
        }

        match self {
            StageInput::Channel(channel) => {
                rule.channel == Some(*channel) && rule.scope.applies_to(item)
            }
            StageInput::UnitScale { quantity } => {
                rule.scope.applies_to(item) && rule.quantity_in_range(*quantity)
            }
            StageInput::AmountScale { line_amount } => {
                rule.scope.applies_to(item) && rule.amount_in_range(*line_amount)
            }
            // order-wide, scope is ignored
            StageInput::OrderAmount { order_amount } => rule.amount_in_range(*order_amount),
        }
    }
}

/// Winning rule of a stage: highest priority, ties to the lowest id
pub fn select_rule<'a>(
    rules: &'a [PricingRule],
    item: &ItemScope,
    input: &StageInput,
) -> Option<&'a PricingRule> {
    rules
        .iter()
        .filter(|rule| input.admits(rule, item))
        .min_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)))
}

/// Run one stage: fold the winner (if any) into `running_price`
pub fn apply_stage(
    rules: &[PricingRule],
    item: &ItemScope,
    running_price: Decimal,
    input: &StageInput,
) -> (Decimal, Option<AppliedRule>) {
    match select_rule(rules, item, input) {
        Some(rule) => {
            let new_price = rule.apply(running_price);
            tracing::debug!(
                stage = %input.kind(),
                rule_id = rule.id,
                rule = %rule.name,
                price_before = %running_price,
                price_after = %new_price,
                "Pricing rule applied"
            );
            (new_price, Some(AppliedRule::from_rule(rule)))
        }
        None => (running_price, None),
    }
}
