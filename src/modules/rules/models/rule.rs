// Pricing rules attached to a price list. A rule's kind decides which stage
// considers it and which of its range bounds are meaningful:
//   CHANNEL       -> channel
//   UNIT_SCALE    -> min/max quantity
//   AMOUNT_SCALE  -> min/max amount (line amount)
//   ORDER_AMOUNT  -> min/max amount (whole order, no scope filter)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};
use crate::modules::catalog::ItemScope;
use crate::modules::price_lists::SalesChannel;

/// Rule category. Stages run in the declaration order of this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    Channel,
    UnitScale,
    AmountScale,
    OrderAmount,
    /// Product bundles; stored as `ProductBundle`, never as `PricingRule`
    Combination,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::Channel => write!(f, "CHANNEL"),
            RuleKind::UnitScale => write!(f, "UNIT_SCALE"),
            RuleKind::AmountScale => write!(f, "AMOUNT_SCALE"),
            RuleKind::OrderAmount => write!(f, "ORDER_AMOUNT"),
            RuleKind::Combination => write!(f, "COMBINATION"),
        }
    }
}

impl std::str::FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "CHANNEL" => Ok(RuleKind::Channel),
            "UNIT_SCALE" => Ok(RuleKind::UnitScale),
            "AMOUNT_SCALE" => Ok(RuleKind::AmountScale),
            "ORDER_AMOUNT" => Ok(RuleKind::OrderAmount),
            "COMBINATION" => Ok(RuleKind::Combination),
            _ => Err(format!("Invalid rule kind: {}", s)),
        }
    }
}

/// How a discount value is folded into a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    Percentage,
    FixedAmount,
}

impl DiscountKind {
    /// Fold a discount into `price`.
    ///
    /// - PERCENTAGE: `price × (1 − value/100)`
    /// - FIXED_AMOUNT: `max(price − value, 0)`
    pub fn apply(self, price: Decimal, value: Decimal) -> Decimal {
        match self {
            DiscountKind::Percentage => {
                price * (Decimal::ONE - value / Decimal::ONE_HUNDRED)
            }
            DiscountKind::FixedAmount => (price - value).max(Decimal::ZERO),
        }
    }
}

impl std::fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscountKind::Percentage => write!(f, "PERCENTAGE"),
            DiscountKind::FixedAmount => write!(f, "FIXED_AMOUNT"),
        }
    }
}

impl std::str::FromStr for DiscountKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PERCENTAGE" => Ok(DiscountKind::Percentage),
            "FIXED_AMOUNT" => Ok(DiscountKind::FixedAmount),
            _ => Err(format!("Invalid discount kind: {}", s)),
        }
    }
}

/// Catalog subtree a rule is limited to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// Applies to every item
    #[default]
    All,
    Line(i64),
    Group(i64),
}

impl RuleScope {
    pub fn applies_to(&self, item: &ItemScope) -> bool {
        match self {
            RuleScope::All => true,
            RuleScope::Line(line_id) => *line_id == item.line_id,
            RuleScope::Group(group_id) => *group_id == item.group_id,
        }
    }

    fn from_columns(line_id: Option<i64>, group_id: Option<i64>) -> Result<Self> {
        match (line_id, group_id) {
            (None, None) => Ok(RuleScope::All),
            (Some(line_id), None) => Ok(RuleScope::Line(line_id)),
            (None, Some(group_id)) => Ok(RuleScope::Group(group_id)),
            (Some(_), Some(_)) => Err(AppError::internal(
                "Rule scope names both a line and a group",
            )),
        }
    }

    /// (line_id, group_id) storage columns
    pub fn to_columns(self) -> (Option<i64>, Option<i64>) {
        match self {
            RuleScope::All => (None, None),
            RuleScope::Line(line_id) => (Some(line_id), None),
            RuleScope::Group(group_id) => (None, Some(group_id)),
        }
    }
}

/// A commercial pricing rule. Read-only during a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRule {
    /// Assigned by storage; ignored on create
    #[serde(default)]
    pub id: i64,
    pub price_list_id: i64,
    pub name: String,
    pub kind: RuleKind,
    /// Higher wins
    #[serde(default)]
    pub priority: i32,
    pub channel: Option<SalesChannel>,
    #[serde(default)]
    pub scope: RuleScope,
    pub min_quantity: Option<Decimal>,
    pub max_quantity: Option<Decimal>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub discount_kind: DiscountKind,
    pub discount_value: Decimal,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl PricingRule {
    /// Quantity within [min, max]; a missing bound is open
    pub fn quantity_in_range(&self, quantity: Decimal) -> bool {
        within(quantity, self.min_quantity, self.max_quantity)
    }

    /// Amount within [min, max]; a missing bound is open
    pub fn amount_in_range(&self, amount: Decimal) -> bool {
        within(amount, self.min_amount, self.max_amount)
    }

    pub fn apply(&self, price: Decimal) -> Decimal {
        self.discount_kind.apply(price, self.discount_value)
    }
}

fn within(value: Decimal, min: Option<Decimal>, max: Option<Decimal>) -> bool {
    min.map_or(true, |min| min <= value) && max.map_or(true, |max| value <= max)
}

/// Raw `pricing_rules` row
#[derive(Debug, FromRow)]
pub struct PricingRuleRow {
    pub id: i64,
    pub price_list_id: i64,
    pub name: String,
    pub kind: String,
    pub priority: i32,
    pub channel: Option<String>,
    pub line_id: Option<i64>,
    pub group_id: Option<i64>,
    pub min_quantity: Option<Decimal>,
    pub max_quantity: Option<Decimal>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub discount_kind: String,
    pub discount_value: Decimal,
    pub active: bool,
}

impl TryFrom<PricingRuleRow> for PricingRule {
    type Error = AppError;

    fn try_from(row: PricingRuleRow) -> Result<Self> {
        let scope = RuleScope::from_columns(row.line_id, row.group_id)
            .map_err(|e| AppError::internal(format!("Rule {}: {}", row.id, e)))?;
        let channel = row
            .channel
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(AppError::Internal)?;

        Ok(PricingRule {
            id: row.id,
            price_list_id: row.price_list_id,
            name: row.name,
            kind: row.kind.parse().map_err(AppError::Internal)?,
            priority: row.priority,
            channel,
            scope,
            min_quantity: row.min_quantity,
            max_quantity: row.max_quantity,
            min_amount: row.min_amount,
            max_amount: row.max_amount,
            discount_kind: row.discount_kind.parse().map_err(AppError::Internal)?,
            discount_value: row.discount_value,
            active: row.active,
        })
    }
}
