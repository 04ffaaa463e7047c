pub mod combination;
pub mod rule_service;
pub mod stage_matcher;
pub mod validation;

pub use combination::{apply_bundles, bundle_is_satisfied, MatchedOrderLine};
pub use rule_service::RuleService;
pub use stage_matcher::{apply_stage, select_rule, StageInput};
pub use validation::{validate_bundle, validate_rule};
