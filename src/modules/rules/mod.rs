// Rules module: commercial pricing rules, product bundles and the stage
// matchers that pick and fold them into a running price

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{
    AppliedRule, BundleRequirement, BundleTarget, DiscountKind, PricingRule, ProductBundle,
    RuleKind, RuleScope,
};
pub use repositories::{MySqlRuleRepository, RuleRepository};
pub use services::{RuleService, StageInput};
