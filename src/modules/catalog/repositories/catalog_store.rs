use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::catalog::models::{Item, ProductGroup, ProductLine};

/// Read access to the product catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get_item(&self, item_id: i64) -> Result<Option<Item>>;

    async fn get_group(&self, group_id: i64) -> Result<Option<ProductGroup>>;

    async fn get_line(&self, line_id: i64) -> Result<Option<ProductLine>>;

    /// Last acquisition cost of an item, `None` when the item is unknown
    async fn get_last_cost(&self, item_id: i64) -> Result<Option<Decimal>> {
        Ok(self.get_item(item_id).await?.map(|item| item.last_cost))
    }
}

/// MySQL-backed catalog
pub struct MySqlCatalogStore {
    pool: MySqlPool,
}

impl MySqlCatalogStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for MySqlCatalogStore {
    async fn get_item(&self, item_id: i64) -> Result<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, group_id, code, name, unit_of_measure, last_cost, active
            FROM items
            WHERE id = ?
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn get_group(&self, group_id: i64) -> Result<Option<ProductGroup>> {
        let group = sqlx::query_as::<_, ProductGroup>(
            "SELECT id, line_id, code, name, active FROM item_groups WHERE id = ?",
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    async fn get_line(&self, line_id: i64) -> Result<Option<ProductLine>> {
        let line = sqlx::query_as::<_, ProductLine>(
            "SELECT id, code, name, active FROM item_lines WHERE id = ?",
        )
        .bind(line_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(line)
    }

    async fn get_last_cost(&self, item_id: i64) -> Result<Option<Decimal>> {
        let cost: Option<(Decimal,)> =
            sqlx::query_as("SELECT last_cost FROM items WHERE id = ?")
                .bind(item_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(cost.map(|(last_cost,)| last_cost))
    }
}
