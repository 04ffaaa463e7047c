use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{AppError, BusinessClock, Result};
use crate::modules::audit::{
    snapshot, AuditDispatcher, AuditEntry, AuditOperation, BASE_PRICE_TABLE, PRICE_LIST_TABLE,
};
use crate::modules::catalog::CatalogStore;
use crate::modules::price_lists::models::{
    BasePriceInput, DuplicatePriceList, DuplicatedPriceList, ItemBasePrice, NewPriceList,
    PriceList, PriceListDetail,
};
use crate::modules::price_lists::repositories::PriceListRepository;
use crate::modules::rules::RuleRepository;

use super::base_price::{check_cost, margin_percentage, validate_base_price, CostCheck};
use super::resolver::{PriceListQuery, PriceListResolver};

/// Proposed price judged against an item's last cost
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceCheck {
    pub item_id: i64,
    pub proposed_price: Decimal,
    pub last_cost: Decimal,
    pub margin_percentage: Decimal,
    #[serde(flatten)]
    pub check: CostCheck,
}

/// Per-row failure of a bulk price load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkLoadError {
    pub index: usize,
    pub item_id: i64,
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkLoadResult {
    /// Ids of the stored base prices, in input order
    pub stored: Vec<i64>,
    pub errors: Vec<BulkLoadError>,
}

/// Administration of price lists and their base prices
pub struct PriceListService {
    repo: Arc<dyn PriceListRepository>,
    rules: Arc<dyn RuleRepository>,
    catalog: Arc<dyn CatalogStore>,
    resolver: PriceListResolver,
    audit: AuditDispatcher,
}

fn validate_window(start_date: chrono::NaiveDate, end_date: Option<chrono::NaiveDate>) -> Result<()> {
    match end_date {
        Some(end_date) if end_date < start_date => Err(AppError::validation(
            "End date cannot be earlier than start date",
        )),
        _ => Ok(()),
    }
}

impl PriceListService {
    pub fn new(
        repo: Arc<dyn PriceListRepository>,
        rules: Arc<dyn RuleRepository>,
        catalog: Arc<dyn CatalogStore>,
        audit: AuditDispatcher,
        clock: BusinessClock,
    ) -> Self {
        Self {
            resolver: PriceListResolver::new(repo.clone(), clock),
            repo,
            rules,
            catalog,
            audit,
        }
    }

    /// A list with its prices, rules and bundles
    pub async fn list_detail(&self, price_list_id: i64) -> Result<PriceListDetail> {
        let list = self.find_list(price_list_id).await?;
        self.detail_of(list).await
    }

    /// The list in force for a company scope, with everything attached to it
    pub async fn current_list(&self, query: &PriceListQuery) -> Result<PriceListDetail> {
        let list = self.resolver.resolve(query).await?;
        self.detail_of(list).await
    }

    /// Copy a list's base prices and rules into a new inactive list named
    /// "<name> (Copia)" with its own validity window. Bundles stay behind.
    pub async fn duplicate_price_list(
        &self,
        source_id: i64,
        window: DuplicatePriceList,
    ) -> Result<DuplicatedPriceList> {
        validate_window(window.start_date, window.end_date)?;
        let source = self.find_list(source_id).await?;

        let copy = NewPriceList {
            company_id: source.company_id,
            branch_id: source.branch_id,
            name: format!("{} (Copia)", source.name),
            list_type: source.list_type,
            channel: source.channel,
            start_date: window.start_date,
            end_date: window.end_date,
            active: false,
        };
        let duplicated = self.repo.duplicate(source.id, &copy).await?;

        tracing::info!(
            source_id,
            price_list_id = duplicated.list.id,
            prices_copied = duplicated.prices_copied,
            rules_copied = duplicated.rules_copied,
            "Price list duplicated"
        );

        self.audit.submit(
            AuditEntry::new(AuditOperation::Creation, PRICE_LIST_TABLE, duplicated.list.id)
                .with_before(snapshot(&source))
                .with_after(snapshot(&duplicated.list)),
        );

        Ok(duplicated)
    }

    /// Create a list after checking its window. Active lists may not overlap
    /// another active list of the same company, or of the same branch when
    /// the new list is branch-scoped.
    pub async fn create_price_list(&self, list: NewPriceList) -> Result<PriceList> {
        if list.name.trim().is_empty() {
            return Err(AppError::validation("Price list name cannot be empty"));
        }

        validate_window(list.start_date, list.end_date)?;

        if list.active {
            let existing = self.repo.find_active_for_company(list.company_id).await?;
            let clash = existing
                .iter()
                .filter(|other| list.branch_id.is_none() || other.branch_id == list.branch_id)
                .find(|other| other.overlaps(list.start_date, list.end_date));

            if let Some(other) = clash {
                return Err(AppError::validation(format!(
                    "Validity window overlaps price list \"{}\" ({} - {})",
                    other.name,
                    other.start_date,
                    other
                        .end_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "open-ended".to_string())
                )));
            }
        }

        let created = self.repo.create(&list).await?;
        tracing::info!(
            price_list_id = created.id,
            company_id = created.company_id,
            "Price list created"
        );

        self.audit.submit(
            AuditEntry::new(AuditOperation::Creation, PRICE_LIST_TABLE, created.id)
                .with_after(snapshot(&created)),
        );

        Ok(created)
    }

    /// Create or replace one base price, enforcing the below-cost invariant
    pub async fn upsert_base_price(
        &self,
        price_list_id: i64,
        input: BasePriceInput,
    ) -> Result<ItemBasePrice> {
        self.find_list(price_list_id).await?;

        self.store_base_price(price_list_id, input).await
    }

    /// Upsert many base prices into one list. Row failures are collected
    /// and do not stop the remaining rows.
    pub async fn bulk_load_prices(
        &self,
        price_list_id: i64,
        rows: Vec<BasePriceInput>,
    ) -> Result<BulkLoadResult> {
        if rows.is_empty() {
            return Err(AppError::validation("At least one price is required"));
        }

        self.find_list(price_list_id).await?;

        let mut result = BulkLoadResult {
            stored: Vec::with_capacity(rows.len()),
            errors: Vec::new(),
        };

        for (index, row) in rows.into_iter().enumerate() {
            let item_id = row.item_id;
            match self.store_base_price(price_list_id, row).await {
                Ok(stored) => result.stored.push(stored.id),
                Err(err) => {
                    tracing::warn!(index, item_id, error = %err, "Bulk price row rejected");
                    result.errors.push(BulkLoadError {
                        index,
                        item_id,
                        kind: err.kind().to_string(),
                        message: err.public_message(),
                    });
                }
            }
        }

        tracing::info!(
            price_list_id,
            stored = result.stored.len(),
            rejected = result.errors.len(),
            "Bulk price load finished"
        );

        Ok(result)
    }

    /// Compare a proposed price with the item's last cost without storing it
    pub async fn check_price(&self, item_id: i64, proposed_price: Decimal) -> Result<PriceCheck> {
        let last_cost = self
            .catalog
            .get_last_cost(item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {} not found", item_id)))?;

        Ok(PriceCheck {
            item_id,
            proposed_price,
            last_cost,
            margin_percentage: margin_percentage(proposed_price, last_cost),
            check: check_cost(last_cost, proposed_price),
        })
    }

    async fn find_list(&self, price_list_id: i64) -> Result<PriceList> {
        self.repo
            .find_by_id(price_list_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Price list {} not found", price_list_id)))
    }

    async fn detail_of(&self, list: PriceList) -> Result<PriceListDetail> {
        let prices = self.repo.base_prices_for_list(list.id).await?;
        let rules = self.rules.rules_for_list(list.id).await?;
        let bundles = self.rules.bundles_for_list(list.id).await?;

        Ok(PriceListDetail {
            list,
            prices,
            rules,
            bundles,
        })
    }

    async fn store_base_price(
        &self,
        price_list_id: i64,
        input: BasePriceInput,
    ) -> Result<ItemBasePrice> {
        let last_cost = self
            .catalog
            .get_last_cost(input.item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {} not found", input.item_id)))?;

        let input = validate_base_price(input, last_cost)?;
        let (before, after) = self.repo.upsert_base_price(price_list_id, &input).await?;

        let operation = if before.is_some() {
            AuditOperation::Modification
        } else {
            AuditOperation::Creation
        };
        self.audit.submit(
            AuditEntry::new(operation, BASE_PRICE_TABLE, after.id)
                .with_before(before.as_ref().and_then(snapshot))
                .with_after(snapshot(&after)),
        );

        Ok(after)
    }
}
