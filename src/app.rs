// Service wiring shared by the binary and the API tests

use std::sync::Arc;

use actix_web::web;

use crate::core::BusinessClock;
use crate::middleware::json_config;
use crate::modules::audit::{AuditDispatcher, AuditHistoryService, AuditTrail};
use crate::modules::catalog::CatalogStore;
use crate::modules::price_lists::{
    PriceListRepository, PriceListService, SupplierDiscountService,
};
use crate::modules::pricing::PricingService;
use crate::modules::rules::{RuleRepository, RuleService};
use crate::modules::{audit, price_lists, pricing, rules};

/// Every service behind the HTTP API
#[derive(Clone)]
pub struct AppServices {
    pub pricing: Arc<PricingService>,
    pub supplier_discounts: Arc<SupplierDiscountService>,
    pub price_lists: Arc<PriceListService>,
    pub rules: Arc<RuleService>,
    pub audit_history: Arc<AuditHistoryService>,
}

impl AppServices {
    pub fn new(
        price_list_repo: Arc<dyn PriceListRepository>,
        rule_repo: Arc<dyn RuleRepository>,
        catalog: Arc<dyn CatalogStore>,
        audit: AuditDispatcher,
        audit_trail: Arc<dyn AuditTrail>,
        clock: BusinessClock,
    ) -> Self {
        Self {
            pricing: Arc::new(PricingService::new(
                price_list_repo.clone(),
                rule_repo.clone(),
                catalog.clone(),
                audit.clone(),
                clock,
            )),
            supplier_discounts: Arc::new(SupplierDiscountService::new(
                price_list_repo.clone(),
                audit.clone(),
            )),
            price_lists: Arc::new(PriceListService::new(
                price_list_repo.clone(),
                rule_repo.clone(),
                catalog.clone(),
                audit.clone(),
                clock,
            )),
            audit_history: Arc::new(AuditHistoryService::new(audit_trail, catalog)),
            rules: Arc::new(RuleService::new(rule_repo, price_list_repo, audit)),
        }
    }

    /// Register the services and the API routes
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(json_config())
            .app_data(web::Data::new(self.pricing.clone()))
            .app_data(web::Data::new(self.supplier_discounts.clone()))
            .app_data(web::Data::new(self.price_lists.clone()))
            .app_data(web::Data::new(self.rules.clone()))
            .app_data(web::Data::new(self.audit_history.clone()))
            .configure(pricing::controllers::configure)
            .configure(price_lists::controllers::configure)
            .configure(rules::controllers::configure)
            .configure(audit::controllers::configure);
    }
}
