use std::sync::Arc;

use crate::core::{AppError, Result};
use crate::modules::audit::{
    snapshot, AuditDispatcher, AuditEntry, AuditOperation, BUNDLE_TABLE, RULE_TABLE,
};
use crate::modules::price_lists::PriceListRepository;
use crate::modules::rules::models::{PricingRule, ProductBundle};
use crate::modules::rules::repositories::RuleRepository;

use super::validation::{validate_bundle, validate_rule};

/// Write path for rules and bundles
pub struct RuleService {
    rules: Arc<dyn RuleRepository>,
    price_lists: Arc<dyn PriceListRepository>,
    audit: AuditDispatcher,
}

impl RuleService {
    pub fn new(
        rules: Arc<dyn RuleRepository>,
        price_lists: Arc<dyn PriceListRepository>,
        audit: AuditDispatcher,
    ) -> Self {
        Self {
            rules,
            price_lists,
            audit,
        }
    }

    async fn ensure_list_exists(&self, price_list_id: i64) -> Result<()> {
        self.price_lists
            .find_by_id(price_list_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Price list {} not found", price_list_id)))
    }

    pub async fn create_rule(&self, rule: PricingRule) -> Result<PricingRule> {
        validate_rule(&rule)?;
        self.ensure_list_exists(rule.price_list_id).await?;

        let created = self.rules.create_rule(&rule).await?;
        tracing::info!(
            rule_id = created.id,
            kind = %created.kind,
            price_list_id = created.price_list_id,
            "Pricing rule created"
        );

        self.audit.submit(
            AuditEntry::new(AuditOperation::Creation, RULE_TABLE, created.id)
                .with_after(snapshot(&created)),
        );

        Ok(created)
    }

    pub async fn create_bundle(&self, bundle: ProductBundle) -> Result<ProductBundle> {
        validate_bundle(&bundle)?;
        self.ensure_list_exists(bundle.price_list_id).await?;

        let created = self.rules.create_bundle(&bundle).await?;
        tracing::info!(
            bundle_id = created.id,
            requirements = created.requirements.len(),
            price_list_id = created.price_list_id,
            "Product bundle created"
        );

        self.audit.submit(
            AuditEntry::new(AuditOperation::Creation, BUNDLE_TABLE, created.id)
                .with_after(snapshot(&created)),
        );

        Ok(created)
    }
}
