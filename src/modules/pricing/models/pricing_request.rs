use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::price_lists::SalesChannel;

/// One line of an order: an item and how many units of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: i64,
    pub quantity: Decimal,
}

impl OrderLine {
    pub fn new(item_id: i64, quantity: Decimal) -> Self {
        Self { item_id, quantity }
    }
}

/// Largest quantity accepted on a line: 99,999,999.99
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

fn validate_quantity(quantity: Decimal, what: &str) -> Result<()> {
    if quantity <= Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{} quantity must be greater than 0, got {}",
            what, quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "{} quantity cannot exceed {}, got {}",
            what, MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// Price one item in a company/branch/channel/order context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatePriceRequest {
    pub company_id: i64,
    pub item_id: i64,
    pub quantity: Decimal,
    #[serde(default)]
    pub branch_id: Option<i64>,
    #[serde(default)]
    pub channel: Option<SalesChannel>,
    /// Total order amount, enables the order-amount stage
    #[serde(default)]
    pub order_amount: Option<Decimal>,
    /// Every line of the order, enables the combination stage
    #[serde(default)]
    pub order_lines: Option<Vec<OrderLine>>,
    #[serde(default)]
    pub as_of_date: Option<NaiveDate>,
}

impl CalculatePriceRequest {
    pub fn new(company_id: i64, item_id: i64, quantity: Decimal) -> Self {
        Self {
            company_id,
            item_id,
            quantity,
            branch_id: None,
            channel: None,
            order_amount: None,
            order_lines: None,
            as_of_date: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_quantity(self.quantity, "Item")?;

        if let Some(amount) = self.order_amount {
            if amount < Decimal::ZERO {
                return Err(AppError::validation("Order amount cannot be negative"));
            }
        }

        for line in self.order_lines.iter().flatten() {
            validate_quantity(line.quantity, "Order line")?;
        }

        Ok(())
    }
}

/// Price every line of an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculateBatchRequest {
    pub company_id: i64,
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub branch_id: Option<i64>,
    #[serde(default)]
    pub channel: Option<SalesChannel>,
    #[serde(default)]
    pub as_of_date: Option<NaiveDate>,
}

impl CalculateBatchRequest {
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(AppError::validation("At least one item is required"));
        }

        for line in &self.items {
            validate_quantity(line.quantity, "Item")?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSupplierDiscountRequest {
    pub item_base_price_id: i64,
    pub percentage: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}
