use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bundle::ProductBundle;
use super::rule::{DiscountKind, PricingRule, RuleKind};

/// Descriptor of a rule or bundle that changed the running price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRule {
    pub kind: RuleKind,
    pub name: String,
    pub discount_kind: DiscountKind,
    pub discount_value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_quantity: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_quantity: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Decimal>,
}

impl AppliedRule {
    /// Unit-scale rules echo their quantity bounds, amount-scale rules their
    /// amount bounds; other kinds echo none.
    pub fn from_rule(rule: &PricingRule) -> Self {
        let (min_quantity, max_quantity) = match rule.kind {
            RuleKind::UnitScale => (rule.min_quantity, rule.max_quantity),
            _ => (None, None),
        };
        let (min_amount, max_amount) = match rule.kind {
            RuleKind::AmountScale => (rule.min_amount, rule.max_amount),
            _ => (None, None),
        };

        Self {
            kind: rule.kind,
            name: rule.name.clone(),
            discount_kind: rule.discount_kind,
            discount_value: rule.discount_value,
            min_quantity,
            max_quantity,
            min_amount,
            max_amount,
        }
    }

    pub fn from_bundle(bundle: &ProductBundle) -> Self {
        Self {
            kind: RuleKind::Combination,
            name: bundle.name.clone(),
            discount_kind: bundle.discount_kind,
            discount_value: bundle.discount_value,
            min_quantity: None,
            max_quantity: None,
            min_amount: None,
            max_amount: None,
        }
    }
}
