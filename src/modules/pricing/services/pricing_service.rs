use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::{AppError, BusinessClock, Result};
use crate::modules::audit::{AuditDispatcher, AuditEntry, AuditOperation, CALCULATION_TABLE};
use crate::modules::catalog::{resolve_item_scope, CatalogStore, Item};
use crate::modules::price_lists::services::BasePriceLookup;
use crate::modules::price_lists::{PriceListQuery, PriceListRepository, PriceListResolver};
use crate::modules::pricing::models::{
    BatchItemError, BatchPricingResult, CalculateBatchRequest, CalculatePriceRequest, OrderLine,
    PricingResult,
};
use crate::modules::rules::services::MatchedOrderLine;
use crate::modules::rules::RuleRepository;

use super::engine::{line_total, run_stages, PricingContext};
use super::result_builder::build_result;

/// Price resolution for single items and whole orders
pub struct PricingService {
    resolver: PriceListResolver,
    base_prices: BasePriceLookup,
    price_lists: Arc<dyn PriceListRepository>,
    rules: Arc<dyn RuleRepository>,
    catalog: Arc<dyn CatalogStore>,
    audit: AuditDispatcher,
    clock: BusinessClock,
}

impl PricingService {
    pub fn new(
        price_lists: Arc<dyn PriceListRepository>,
        rules: Arc<dyn RuleRepository>,
        catalog: Arc<dyn CatalogStore>,
        audit: AuditDispatcher,
        clock: BusinessClock,
    ) -> Self {
        Self {
            resolver: PriceListResolver::new(price_lists.clone(), clock),
            base_prices: BasePriceLookup::new(price_lists.clone()),
            price_lists,
            rules,
            catalog,
            audit,
            clock,
        }
    }

    /// Resolve the price of one item.
    ///
    /// Price list, base price and item must all exist, otherwise the call
    /// fails with `NotFound`. The stages never fail: a stage with no
    /// matching rule leaves the running price unchanged.
    pub async fn calculate_price(&self, request: &CalculatePriceRequest) -> Result<PricingResult> {
        request.validate()?;

        let list = self
            .resolver
            .resolve(&PriceListQuery {
                company_id: request.company_id,
                branch_id: request.branch_id,
                channel: request.channel,
                as_of: request.as_of_date,
            })
            .await?;

        let item = self.load_item(request.item_id).await?;
        let base = self.base_prices.lookup(&list, &item).await?;
        let scope = resolve_item_scope(self.catalog.as_ref(), &item).await?;
        let rules = self.rules.rules_for_list(list.id).await?;

        let order_lines = match request.order_lines.as_deref() {
            Some(lines) if !lines.is_empty() => self.match_order_lines(lines).await?,
            _ => Vec::new(),
        };
        let bundles = if order_lines.is_empty() {
            Vec::new()
        } else {
            self.rules.bundles_for_list(list.id).await?
        };

        let ctx = PricingContext {
            channel: request.channel,
            quantity: request.quantity,
            order_amount: request.order_amount,
            order_lines: &order_lines,
        };
        let outcome = run_stages(&rules, &bundles, &scope, base.base_price, &ctx)?;
        let result = build_result(&list, &item, &base, request.quantity, outcome)?;

        tracing::info!(
            item_id = result.item_id,
            price_list_id = result.price_list_id,
            quantity = %result.quantity,
            base_price = %result.base_price,
            final_price = %result.final_price,
            rules_applied = result.applied_rules.len(),
            "Price calculated"
        );

        self.audit.submit(
            AuditEntry::new(AuditOperation::Calculation, CALCULATION_TABLE, result.item_id)
                .with_after(Some(serde_json::json!({
                    "company_id": request.company_id,
                    "price_list_id": result.price_list_id,
                    "quantity": result.quantity,
                    "base_price": result.base_price,
                    "final_price": result.final_price,
                    "applied_rules": result.applied_rules,
                    "below_cost": result.below_cost,
                }))),
        );

        Ok(result)
    }

    /// Price every line of an order.
    ///
    /// The order amount is the sum of base price × quantity over the lines
    /// that have a base price in the resolved list. Every line is then priced
    /// with that amount and the full item list as its order context. Line
    /// failures are collected, they do not abort the batch.
    pub async fn calculate_batch(&self, request: &CalculateBatchRequest) -> Result<BatchPricingResult> {
        request.validate()?;

        // pin the date so every line resolves against the same day
        let as_of = request.as_of_date.unwrap_or_else(|| self.clock.today());
        let order_amount = self.order_amount(request, as_of).await?;

        let mut results = Vec::with_capacity(request.items.len());
        let mut errors = Vec::new();

        for line in &request.items {
            let line_request = CalculatePriceRequest {
                company_id: request.company_id,
                item_id: line.item_id,
                quantity: line.quantity,
                branch_id: request.branch_id,
                channel: request.channel,
                order_amount: Some(order_amount),
                order_lines: Some(request.items.clone()),
                as_of_date: Some(as_of),
            };

            match self.calculate_price(&line_request).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::warn!(
                        item_id = line.item_id,
                        error = %e,
                        "Batch line could not be priced"
                    );
                    errors.push(BatchItemError {
                        item_id: line.item_id,
                        kind: e.kind().to_string(),
                        message: e.public_message(),
                    });
                }
            }
        }

        tracing::info!(
            company_id = request.company_id,
            total_items = request.items.len(),
            processed_items = results.len(),
            failed_items = errors.len(),
            order_amount = %order_amount,
            "Batch priced"
        );

        Ok(BatchPricingResult {
            order_amount,
            total_items: request.items.len(),
            processed_items: results.len(),
            results,
            errors,
        })
    }

    /// Σ base × quantity; zero when no list is in force
    async fn order_amount(
        &self,
        request: &CalculateBatchRequest,
        as_of: chrono::NaiveDate,
    ) -> Result<Decimal> {
        let query = PriceListQuery {
            company_id: request.company_id,
            branch_id: request.branch_id,
            channel: request.channel,
            as_of: Some(as_of),
        };

        let list = match self.resolver.resolve(&query).await {
            Ok(list) => list,
            Err(AppError::NotFound(_)) => return Ok(Decimal::ZERO),
            Err(e) => return Err(e),
        };

        let mut total = Decimal::ZERO;
        for line in &request.items {
            if let Some(base) = self.price_lists.find_base_price(list.id, line.item_id).await? {
                total = total
                    .checked_add(line_total(base.base_price, line.quantity)?)
                    .ok_or_else(|| AppError::validation("Order amount is out of range"))?;
            }
        }

        Ok(total)
    }

    async fn load_item(&self, item_id: i64) -> Result<Item> {
        self.catalog
            .get_item(item_id)
            .await?
            .filter(|item| item.active)
            .ok_or_else(|| AppError::not_found(format!("Item {} not found or inactive", item_id)))
    }

    /// Resolve order lines in the catalog tree; unknown items are skipped
    async fn match_order_lines(&self, lines: &[OrderLine]) -> Result<Vec<MatchedOrderLine>> {
        let mut matched = Vec::with_capacity(lines.len());

        for line in lines {
            let Some(item) = self.catalog.get_item(line.item_id).await? else {
                tracing::debug!(item_id = line.item_id, "Order line item not in catalog, skipped");
                continue;
            };
            let scope = resolve_item_scope(self.catalog.as_ref(), &item).await?;
            matched.push(MatchedOrderLine {
                item: scope,
                quantity: line.quantity,
            });
        }

        Ok(matched)
    }
}
