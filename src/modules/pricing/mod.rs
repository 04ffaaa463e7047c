// Pricing module: the price-resolution engine and its HTTP surface

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{
    BatchItemError, BatchPricingResult, CalculateBatchRequest, CalculatePriceRequest, OrderLine,
    PricingResult, RegisterSupplierDiscountRequest, MAX_QUANTITY,
};
pub use services::{run_stages, PricingContext, PricingService, StageOutcome};
