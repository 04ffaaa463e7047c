pub mod engine;
pub mod pricing_service;
pub mod result_builder;

pub use engine::{line_total, run_stages, PricingContext, StageOutcome};
pub use pricing_service::PricingService;
pub use result_builder::{build_result, discount_percentage, CostFloor};
