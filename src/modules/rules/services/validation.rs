// Write-time checks for rules and bundles. The pricing engine itself never
// rejects stored data on these grounds.

use rust_decimal::Decimal;

use crate::core::{AppError, Result};
use crate::modules::rules::models::{DiscountKind, PricingRule, ProductBundle, RuleKind};

fn validate_bounds(label: &str, min: Option<Decimal>, max: Option<Decimal>) -> Result<()> {
    if let (Some(min), Some(max)) = (min, max) {
        if max < min {
            return Err(AppError::validation(format!(
                "Maximum {} ({}) cannot be lower than minimum {} ({})",
                label, max, label, min
            )));
        }
    }
    Ok(())
}

fn validate_discount(kind: DiscountKind, value: Decimal) -> Result<()> {
    match kind {
        DiscountKind::Percentage if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED => Err(
            AppError::validation(format!("Percentage discount must be between 0 and 100, got {}", value)),
        ),
        DiscountKind::FixedAmount if value < Decimal::ZERO => Err(AppError::validation(format!(
            "Fixed discount cannot be negative, got {}",
            value
        ))),
        _ => Ok(()),
    }
}

pub fn validate_rule(rule: &PricingRule) -> Result<()> {
    if rule.name.trim().is_empty() {
        return Err(AppError::validation("Rule name cannot be empty"));
    }

    validate_bounds("quantity", rule.min_quantity, rule.max_quantity)?;
    validate_bounds("amount", rule.min_amount, rule.max_amount)?;
    validate_discount(rule.discount_kind, rule.discount_value)?;

    match rule.kind {
        RuleKind::Channel => {
            if rule.channel.is_none() {
                return Err(AppError::validation("Channel rules must name a channel"));
            }
        }
        RuleKind::UnitScale => match rule.min_quantity {
            None => return Err(AppError::validation("Unit scale rules need a minimum quantity")),
            Some(min) if min <= Decimal::ZERO => {
                return Err(AppError::validation("Minimum quantity must be greater than 0"))
            }
            Some(_) => {}
        },
        RuleKind::AmountScale | RuleKind::OrderAmount => match rule.min_amount {
            None => return Err(AppError::validation("Amount rules need a minimum amount")),
            Some(min) if min < Decimal::ZERO => {
                return Err(AppError::validation("Minimum amount cannot be negative"))
            }
            Some(_) => {}
        },
        RuleKind::Combination => {
            return Err(AppError::validation(
                "Combination discounts are configured as product bundles",
            ))
        }
    }

    Ok(())
}

pub fn validate_bundle(bundle: &ProductBundle) -> Result<()> {
    if bundle.name.trim().is_empty() {
        return Err(AppError::validation("Bundle name cannot be empty"));
    }

    if bundle.requirements.is_empty() {
        return Err(AppError::validation(
            "A bundle must require at least one item, group or line",
        ));
    }

    if bundle.trigger_quantity == 0 {
        return Err(AppError::validation("Bundle trigger quantity must be at least 1"));
    }

    if bundle.requirements.iter().any(|r| r.required_quantity == 0) {
        return Err(AppError::validation("Required quantities must be at least 1"));
    }

    validate_discount(bundle.discount_kind, bundle.discount_value)
}
