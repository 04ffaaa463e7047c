mod applied_rule;
mod bundle;
mod rule;

pub use applied_rule::AppliedRule;
pub use bundle::{BundleRequirement, BundleRequirementRow, BundleRow, BundleTarget, ProductBundle};
pub use rule::{DiscountKind, PricingRule, PricingRuleRow, RuleKind, RuleScope};
