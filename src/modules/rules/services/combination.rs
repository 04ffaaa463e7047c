use rust_decimal::Decimal;

use crate::modules::catalog::ItemScope;
use crate::modules::rules::models::{AppliedRule, ProductBundle};

/// Order line with its item resolved in the catalog tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedOrderLine {
    pub item: ItemScope,
    pub quantity: Decimal,
}

/// Every requirement must be covered by the summed quantity of the order
/// lines whose item matches its target.
pub fn bundle_is_satisfied(bundle: &ProductBundle, lines: &[MatchedOrderLine]) -> bool {
    bundle.requirements.iter().all(|requirement| {
        let found: Decimal = lines
            .iter()
            .filter(|line| requirement.target.matches(&line.item))
            .map(|line| line.quantity)
            .sum();
        found >= Decimal::from(requirement.required_quantity)
    })
}

/// First active bundle (storage order, not priority) satisfied by the order
/// discounts the running price of the item being priced.
pub fn apply_bundles(
    bundles: &[ProductBundle],
    lines: &[MatchedOrderLine],
    running_price: Decimal,
) -> (Decimal, Option<AppliedRule>) {
    let matched = bundles
        .iter()
        .filter(|bundle| bundle.active)
        .find(|bundle| bundle_is_satisfied(bundle, lines));

    match matched {
        Some(bundle) => {
            let new_price = bundle.apply(running_price);
            tracing::debug!(
                bundle_id = bundle.id,
                bundle = %bundle.name,
                price_before = %running_price,
                price_after = %new_price,
                "Bundle discount applied"
            );
            (new_price, Some(AppliedRule::from_bundle(bundle)))
        }
        None => (running_price, None),
    }
}
