use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::{AppError, Result};
use crate::modules::audit::{
    snapshot, AuditDispatcher, AuditEntry, AuditOperation, BASE_PRICE_TABLE,
};
use crate::modules::price_lists::models::ItemBasePrice;
use crate::modules::price_lists::repositories::PriceListRepository;

/// Supplier discounts at or above this percentage justify a below-cost price
pub const MIN_JUSTIFYING_DISCOUNT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

const MAX_SUPPLIER_DISCOUNT: Decimal = Decimal::from_parts(70, 0, 0, false, 0);

/// Registered supplier discounts must lie in [50, 70]
pub fn validate_supplier_discount(percentage: Decimal) -> Result<()> {
    if percentage < MIN_JUSTIFYING_DISCOUNT || percentage > MAX_SUPPLIER_DISCOUNT {
        return Err(AppError::validation(format!(
            "Supplier discount must be between {}% and {}%, got {}%",
            MIN_JUSTIFYING_DISCOUNT, MAX_SUPPLIER_DISCOUNT, percentage
        )));
    }
    Ok(())
}

/// Registers vendor-granted discounts on item base prices
pub struct SupplierDiscountService {
    repo: Arc<dyn PriceListRepository>,
    audit: AuditDispatcher,
}

impl SupplierDiscountService {
    pub fn new(repo: Arc<dyn PriceListRepository>, audit: AuditDispatcher) -> Self {
        Self { repo, audit }
    }

    /// Set the supplier discount and authorize the price below cost.
    /// The read-modify-write is serialized by the repository's row lock.
    pub async fn register(
        &self,
        item_base_price_id: i64,
        percentage: Decimal,
        notes: Option<&str>,
    ) -> Result<ItemBasePrice> {
        validate_supplier_discount(percentage)?;

        let (before, after) = self
            .repo
            .apply_supplier_discount(item_base_price_id, percentage, notes.unwrap_or_default())
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Item base price {} not found", item_base_price_id))
            })?;

        tracing::info!(
            item_base_price_id,
            item_id = after.item_id,
            percentage = %percentage,
            "Supplier discount registered"
        );

        self.audit.submit(
            AuditEntry::new(AuditOperation::Modification, BASE_PRICE_TABLE, after.id)
                .with_before(snapshot(&before))
                .with_after(snapshot(&after)),
        );

        Ok(after)
    }
}
