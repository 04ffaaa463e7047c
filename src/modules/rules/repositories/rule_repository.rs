use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::rules::models::{
    BundleRequirement, BundleRequirementRow, BundleRow, PricingRule, PricingRuleRow,
    ProductBundle,
};

/// Storage for pricing rules and product bundles
#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// All rules of a list (active or not), ordered by id
    async fn rules_for_list(&self, price_list_id: i64) -> Result<Vec<PricingRule>>;

    /// All bundles of a list with their requirements, in storage order
    async fn bundles_for_list(&self, price_list_id: i64) -> Result<Vec<ProductBundle>>;

    async fn create_rule(&self, rule: &PricingRule) -> Result<PricingRule>;

    async fn create_bundle(&self, bundle: &ProductBundle) -> Result<ProductBundle>;
}

/// MySQL-backed rule storage
pub struct MySqlRuleRepository {
    pool: MySqlPool,
}

impl MySqlRuleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn inserted_id(last_insert_id: u64) -> Result<i64> {
    i64::try_from(last_insert_id).map_err(|_| AppError::internal("Inserted id out of range"))
}

#[async_trait]
impl RuleRepository for MySqlRuleRepository {
    async fn rules_for_list(&self, price_list_id: i64) -> Result<Vec<PricingRule>> {
        let rows = sqlx::query_as::<_, PricingRuleRow>(
            r#"
            SELECT id, price_list_id, name, kind, priority, channel, line_id, group_id,
                   min_quantity, max_quantity, min_amount, max_amount,
                   discount_kind, discount_value, active
            FROM pricing_rules
            WHERE price_list_id = ?
            ORDER BY id
            "#,
        )
        .bind(price_list_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PricingRule::try_from).collect()
    }

    async fn bundles_for_list(&self, price_list_id: i64) -> Result<Vec<ProductBundle>> {
        let bundle_rows = sqlx::query_as::<_, BundleRow>(
            r#"
            SELECT id, price_list_id, name, description, trigger_quantity,
                   discount_kind, discount_value, active
            FROM product_bundles
            WHERE price_list_id = ?
            ORDER BY id
            "#,
        )
        .bind(price_list_id)
        .fetch_all(&self.pool)
        .await?;

        let requirement_rows = sqlx::query_as::<_, BundleRequirementRow>(
            r#"
            SELECT r.id, r.bundle_id, r.item_id, r.group_id, r.line_id, r.required_quantity
            FROM bundle_requirements r
            JOIN product_bundles b ON b.id = r.bundle_id
            WHERE b.price_list_id = ?
            ORDER BY r.bundle_id, r.id
            "#,
        )
        .bind(price_list_id)
        .fetch_all(&self.pool)
        .await?;

        let mut requirements: HashMap<i64, Vec<BundleRequirement>> = HashMap::new();
        for row in requirement_rows {
            let bundle_id = row.bundle_id;
            requirements
                .entry(bundle_id)
                .or_default()
                .push(BundleRequirement::try_from(row)?);
        }

        bundle_rows
            .into_iter()
            .map(|row| {
                let reqs = requirements.remove(&row.id).unwrap_or_default();
                row.into_bundle(reqs)
            })
            .collect()
    }

    async fn create_rule(&self, rule: &PricingRule) -> Result<PricingRule> {
        let (line_id, group_id) = rule.scope.to_columns();

        let result = sqlx::query(
            r#"
            INSERT INTO pricing_rules (
                price_list_id, name, kind, priority, channel, line_id, group_id,
                min_quantity, max_quantity, min_amount, max_amount,
                discount_kind, discount_value, active
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(rule.price_list_id)
        .bind(&rule.name)
        .bind(rule.kind.to_string())
        .bind(rule.priority)
        .bind(rule.channel.map(|c| c.to_string()))
        .bind(line_id)
        .bind(group_id)
        .bind(rule.min_quantity)
        .bind(rule.max_quantity)
        .bind(rule.min_amount)
        .bind(rule.max_amount)
        .bind(rule.discount_kind.to_string())
        .bind(rule.discount_value)
        .bind(rule.active)
        .execute(&self.pool)
        .await?;

        Ok(PricingRule {
            id: inserted_id(result.last_insert_id())?,
            ..rule.clone()
        })
    }

    async fn create_bundle(&self, bundle: &ProductBundle) -> Result<ProductBundle> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO product_bundles (
                price_list_id, name, description, trigger_quantity,
                discount_kind, discount_value, active
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(bundle.price_list_id)
        .bind(&bundle.name)
        .bind(&bundle.description)
        .bind(bundle.trigger_quantity)
        .bind(bundle.discount_kind.to_string())
        .bind(bundle.discount_value)
        .bind(bundle.active)
        .execute(&mut *tx)
        .await?;
        let bundle_id = inserted_id(result.last_insert_id())?;

        for requirement in &bundle.requirements {
            let (item_id, group_id, line_id) = requirement.target.to_columns();
            sqlx::query(
                r#"
                INSERT INTO bundle_requirements (
                    bundle_id, item_id, group_id, line_id, required_quantity
                ) VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(bundle_id)
            .bind(item_id)
            .bind(group_id)
            .bind(line_id)
            .bind(requirement.required_quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(ProductBundle {
            id: bundle_id,
            ..bundle.clone()
        })
    }
}
