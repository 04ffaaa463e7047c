use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{Executor, MySql, MySqlPool, Transaction};

use crate::core::{AppError, Result};
use crate::modules::price_lists::models::{
    BasePriceInput, DuplicatedPriceList, ItemBasePrice, NewPriceList, PriceList, PriceListRow,
};

/// Storage for price lists and their item base prices
#[async_trait]
pub trait PriceListRepository: Send + Sync {
    /// Every active list of a company, regardless of validity window
    async fn find_active_for_company(&self, company_id: i64) -> Result<Vec<PriceList>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<PriceList>>;

    async fn create(&self, list: &NewPriceList) -> Result<PriceList>;

    async fn find_base_price(
        &self,
        price_list_id: i64,
        item_id: i64,
    ) -> Result<Option<ItemBasePrice>>;

    async fn find_base_price_by_id(&self, id: i64) -> Result<Option<ItemBasePrice>>;

    /// Every base price of a list, ordered by id
    async fn base_prices_for_list(&self, price_list_id: i64) -> Result<Vec<ItemBasePrice>>;

    /// Create `copy` and carry over the base prices and pricing rules of
    /// `source_id` in one transaction. Bundles are not copied.
    async fn duplicate(&self, source_id: i64, copy: &NewPriceList) -> Result<DuplicatedPriceList>;

    /// Insert or replace the base price of `input.item_id` in a list.
    /// Returns the previous record (if any) and the stored one.
    async fn upsert_base_price(
        &self,
        price_list_id: i64,
        input: &BasePriceInput,
    ) -> Result<(Option<ItemBasePrice>, ItemBasePrice)>;

    /// Atomically set the supplier discount, mark the price as authorized
    /// below cost and replace its notes. Returns `None` for an unknown id,
    /// otherwise the record before and after the change.
    async fn apply_supplier_discount(
        &self,
        id: i64,
        percentage: Decimal,
        notes: &str,
    ) -> Result<Option<(ItemBasePrice, ItemBasePrice)>>;
}

const PRICE_LIST_COLUMNS: &str =
    "id, company_id, branch_id, name, list_type, channel, start_date, end_date, active";

const BASE_PRICE_COLUMNS: &str = "id, price_list_id, item_id, base_price, below_cost, \
     authorized_below_cost, supplier_discount, notes";

/// MySQL-backed price list storage
pub struct MySqlPriceListRepository {
    pool: MySqlPool,
}

impl MySqlPriceListRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn insert_list<'c, E>(executor: E, list: &NewPriceList) -> Result<PriceList>
    where
        E: Executor<'c, Database = MySql>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO price_lists (
                company_id, branch_id, name, list_type, channel, start_date, end_date, active
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(list.company_id)
        .bind(list.branch_id)
        .bind(&list.name)
        .bind(list.list_type.to_string())
        .bind(list.channel.map(|c| c.to_string()))
        .bind(list.start_date)
        .bind(list.end_date)
        .bind(list.active)
        .execute(executor)
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| AppError::internal("Price list id out of range"))?;

        Ok(PriceList {
            id,
            company_id: list.company_id,
            branch_id: list.branch_id,
            name: list.name.clone(),
            list_type: list.list_type,
            channel: list.channel,
            start_date: list.start_date,
            end_date: list.end_date,
            active: list.active,
        })
    }

    async fn lock_base_price(
        tx: &mut Transaction<'_, MySql>,
        sql_filter: &str,
        binds: &[i64],
    ) -> Result<Option<ItemBasePrice>> {
        let sql = format!(
            "SELECT {} FROM item_base_prices WHERE {} FOR UPDATE",
            BASE_PRICE_COLUMNS, sql_filter
        );
        let mut query = sqlx::query_as::<_, ItemBasePrice>(&sql);
        for value in binds {
            query = query.bind(*value);
        }

        Ok(query.fetch_optional(&mut **tx).await?)
    }
}

#[async_trait]
impl PriceListRepository for MySqlPriceListRepository {
    async fn find_active_for_company(&self, company_id: i64) -> Result<Vec<PriceList>> {
        let sql = format!(
            "SELECT {} FROM price_lists WHERE company_id = ? AND active = TRUE ORDER BY id",
            PRICE_LIST_COLUMNS
        );
        let rows = sqlx::query_as::<_, PriceListRow>(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PriceList::try_from).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PriceList>> {
        let sql = format!("SELECT {} FROM price_lists WHERE id = ?", PRICE_LIST_COLUMNS);
        let row = sqlx::query_as::<_, PriceListRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(PriceList::try_from).transpose()
    }

    async fn create(&self, list: &NewPriceList) -> Result<PriceList> {
        Self::insert_list(&self.pool, list).await
    }

    async fn find_base_price(
        &self,
        price_list_id: i64,
        item_id: i64,
    ) -> Result<Option<ItemBasePrice>> {
        let sql = format!(
            "SELECT {} FROM item_base_prices WHERE price_list_id = ? AND item_id = ?",
            BASE_PRICE_COLUMNS
        );
        let price = sqlx::query_as::<_, ItemBasePrice>(&sql)
            .bind(price_list_id)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(price)
    }

    async fn find_base_price_by_id(&self, id: i64) -> Result<Option<ItemBasePrice>> {
        let sql = format!(
            "SELECT {} FROM item_base_prices WHERE id = ?",
            BASE_PRICE_COLUMNS
        );
        let price = sqlx::query_as::<_, ItemBasePrice>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(price)
    }

    async fn base_prices_for_list(&self, price_list_id: i64) -> Result<Vec<ItemBasePrice>> {
        let sql = format!(
            "SELECT {} FROM item_base_prices WHERE price_list_id = ? ORDER BY id",
            BASE_PRICE_COLUMNS
        );
        let prices = sqlx::query_as::<_, ItemBasePrice>(&sql)
            .bind(price_list_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(prices)
    }

    async fn duplicate(&self, source_id: i64, copy: &NewPriceList) -> Result<DuplicatedPriceList> {
        let mut tx = self.pool.begin().await?;

        let list = Self::insert_list(&mut *tx, copy).await?;

        let prices_copied = sqlx::query(
            r#"
            INSERT INTO item_base_prices (
                price_list_id, item_id, base_price, below_cost,
                authorized_below_cost, supplier_discount, notes
            )
            SELECT ?, item_id, base_price, below_cost,
                   authorized_below_cost, supplier_discount, ''
            FROM item_base_prices
            WHERE price_list_id = ?
            ORDER BY id
            "#,
        )
        .bind(list.id)
        .bind(source_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let rules_copied = sqlx::query(
            r#"
            INSERT INTO pricing_rules (
                price_list_id, name, kind, priority, channel, line_id, group_id,
                min_quantity, max_quantity, min_amount, max_amount,
                discount_kind, discount_value, active
            )
            SELECT ?, name, kind, priority, channel, line_id, group_id,
                   min_quantity, max_quantity, min_amount, max_amount,
                   discount_kind, discount_value, active
            FROM pricing_rules
            WHERE price_list_id = ?
            ORDER BY id
            "#,
        )
        .bind(list.id)
        .bind(source_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        Ok(DuplicatedPriceList {
            list,
            prices_copied,
            rules_copied,
        })
    }

    async fn upsert_base_price(
        &self,
        price_list_id: i64,
        input: &BasePriceInput,
    ) -> Result<(Option<ItemBasePrice>, ItemBasePrice)> {
        let mut tx = self.pool.begin().await?;

        let before = Self::lock_base_price(
            &mut tx,
            "price_list_id = ? AND item_id = ?",
            &[price_list_id, input.item_id],
        )
        .await?;

        let id = match &before {
            Some(existing) => {
                sqlx::query(
                    r#"
                    UPDATE item_base_prices
                    SET base_price = ?, below_cost = ?, authorized_below_cost = ?,
                        supplier_discount = ?, notes = ?
                    WHERE id = ?
                    "#,
                )
                .bind(input.base_price)
                .bind(input.below_cost)
                .bind(input.authorized_below_cost)
                .bind(input.supplier_discount)
                .bind(&input.notes)
                .bind(existing.id)
                .execute(&mut *tx)
                .await?;
                existing.id
            }
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO item_base_prices (
                        price_list_id, item_id, base_price, below_cost,
                        authorized_below_cost, supplier_discount, notes
                    ) VALUES (?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(price_list_id)
                .bind(input.item_id)
                .bind(input.base_price)
                .bind(input.below_cost)
                .bind(input.authorized_below_cost)
                .bind(input.supplier_discount)
                .bind(&input.notes)
                .execute(&mut *tx)
                .await?;
                i64::try_from(result.last_insert_id())
                    .map_err(|_| AppError::internal("Base price id out of range"))?
            }
        };

        tx.commit().await?;

        let after = ItemBasePrice {
            id,
            price_list_id,
            item_id: input.item_id,
            base_price: input.base_price,
            below_cost: input.below_cost,
            authorized_below_cost: input.authorized_below_cost,
            supplier_discount: input.supplier_discount,
            notes: input.notes.clone(),
        };

        Ok((before, after))
    }

    async fn apply_supplier_discount(
        &self,
        id: i64,
        percentage: Decimal,
        notes: &str,
    ) -> Result<Option<(ItemBasePrice, ItemBasePrice)>> {
        let mut tx = self.pool.begin().await?;

        let Some(before) = Self::lock_base_price(&mut tx, "id = ?", &[id]).await? else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE item_base_prices
            SET supplier_discount = ?, authorized_below_cost = TRUE, notes = ?
            WHERE id = ?
            "#,
        )
        .bind(percentage)
        .bind(notes)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let after = ItemBasePrice {
            supplier_discount: percentage,
            authorized_below_cost: true,
            notes: notes.to_string(),
            ..before.clone()
        };

        Ok(Some((before, after)))
    }
}
