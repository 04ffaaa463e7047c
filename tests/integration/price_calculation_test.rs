// Single-item price calculation over in-memory storage

mod helpers;

use std::sync::Arc;

use helpers::*;
use precios::core::{AppError, BusinessClock};
use precios::modules::audit::{AuditDispatcher, AuditOperation};
use precios::modules::price_lists::{ItemBasePrice, PriceList, SalesChannel};
use precios::modules::pricing::{CalculatePriceRequest, OrderLine, PricingService, MAX_QUANTITY};
use precios::modules::rules::{BundleTarget, DiscountKind, RuleKind, RuleScope};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn request(item_id: i64, quantity: Decimal) -> CalculatePriceRequest {
    let mut request = CalculatePriceRequest::new(COMPANY, item_id, quantity);
    request.as_of_date = Some(date(2025, 6, 1));
    request
}

#[tokio::test]
async fn test_no_rules_returns_base_price() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1500.00));

    let result = world
        .pricing()
        .calculate_price(&request(100, dec!(1)))
        .await
        .unwrap();

    assert_eq!(result.final_price, dec!(1500.00));
    assert_eq!(result.base_price, dec!(1500.00));
    assert!(result.applied_rules.is_empty());
    assert_eq!(result.discount_total, Decimal::ZERO);
    assert_eq!(result.discount_percentage, Decimal::ZERO);
    assert_eq!(result.price_list_name, "General 2025");
    assert_eq!(result.item_name, "Taladro percutor");
}

#[tokio::test]
async fn test_unit_scale_rule_applies_from_min_quantity() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1500.00));
    let mut scale = rule(1, RuleKind::UnitScale, DiscountKind::Percentage, dec!(10));
    scale.min_quantity = Some(dec!(10));
    world.rules.add_rule(scale);

    let result = world
        .pricing()
        .calculate_price(&request(100, dec!(15)))
        .await
        .unwrap();

    assert_eq!(result.final_price, dec!(1350.00));
    assert_eq!(result.total_amount, dec!(20250.00));
    assert_eq!(result.applied_rules.len(), 1);
    assert_eq!(result.applied_rules[0].kind, RuleKind::UnitScale);
    assert_eq!(result.applied_rules[0].min_quantity, Some(dec!(10)));

    // below the threshold the rule does not apply
    let result = world
        .pricing()
        .calculate_price(&request(100, dec!(9)))
        .await
        .unwrap();
    assert_eq!(result.final_price, dec!(1500.00));
}

#[tokio::test]
async fn test_channel_then_unit_scale_compound() {
    let world = World::new();
    world.scope_list_to(SalesChannel::Store);
    world.price_lists.add_price(LIST, 100, dec!(1500.00));

    let mut channel = rule(1, RuleKind::Channel, DiscountKind::Percentage, dec!(5));
    channel.channel = Some(SalesChannel::Store);
    let mut scale = rule(2, RuleKind::UnitScale, DiscountKind::Percentage, dec!(10));
    scale.min_quantity = Some(dec!(10));
    world.rules.add_rule(scale);
    world.rules.add_rule(channel);

    let mut req = request(100, dec!(15));
    req.channel = Some(SalesChannel::Store);
    let result = world.pricing().calculate_price(&req).await.unwrap();

    assert_eq!(result.final_price, dec!(1282.50));
    let kinds: Vec<RuleKind> = result.applied_rules.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![RuleKind::Channel, RuleKind::UnitScale]);
    assert_eq!(result.discount_total, dec!(217.50));
    assert_eq!(result.discount_percentage, dec!(14.5));
}

#[tokio::test]
async fn test_group_bundle_discounts_item_priced_alone() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(5.00));
    world.price_lists.add_price(LIST, 101, dec!(5.00));
    world.rules.add_bundle(bundle(
        1,
        "Kit taller",
        DiscountKind::Percentage,
        dec!(15),
        vec![(BundleTarget::Group(10), 2)],
    ));

    let mut req = request(100, dec!(1));
    req.order_lines = Some(vec![
        OrderLine::new(100, dec!(1)),
        OrderLine::new(101, dec!(1)),
    ]);
    let result = world.pricing().calculate_price(&req).await.unwrap();

    assert_eq!(result.final_price, dec!(4.25));
    assert_eq!(result.applied_rules.len(), 1);
    assert_eq!(result.applied_rules[0].kind, RuleKind::Combination);
    assert_eq!(result.applied_rules[0].name, "Kit taller");

    // without order lines no bundle is attempted
    let result = world
        .pricing()
        .calculate_price(&request(100, dec!(1)))
        .await
        .unwrap();
    assert_eq!(result.final_price, dec!(5.00));
}

#[tokio::test]
async fn test_below_cost_result_is_reported_not_rejected() {
    let world = World::new();
    // seeded directly, bypassing write validation
    world.price_lists.add_price(LIST, 100, dec!(800.00));

    let result = world
        .pricing()
        .calculate_price(&request(100, dec!(1)))
        .await
        .unwrap();

    assert_eq!(result.final_price, dec!(800.00));
    assert_eq!(result.last_cost, dec!(1000));
    assert!(result.below_cost);
    assert!(!result.authorized_below_cost);
}

#[tokio::test]
async fn test_below_cost_echoes_stored_authorization() {
    let world = World::new();
    world.price_lists.add_base_price(ItemBasePrice {
        id: 0,
        price_list_id: LIST,
        item_id: 100,
        base_price: dec!(800.00),
        below_cost: true,
        authorized_below_cost: true,
        supplier_discount: dec!(55),
        notes: "Promo proveedor".to_string(),
    });

    let result = world
        .pricing()
        .calculate_price(&request(100, dec!(1)))
        .await
        .unwrap();

    assert!(result.below_cost);
    assert!(result.authorized_below_cost);
    assert_eq!(result.supplier_discount, dec!(55));
}

#[tokio::test]
async fn test_discount_into_below_cost_is_authorized_only_by_stored_flag() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1050.00));
    world
        .rules
        .add_rule(rule(1, RuleKind::UnitScale, DiscountKind::Percentage, dec!(10)));

    let result = world
        .pricing()
        .calculate_price(&request(100, dec!(1)))
        .await
        .unwrap();

    assert_eq!(result.final_price, dec!(945.00));
    assert!(result.below_cost);
    assert!(!result.authorized_below_cost);
}

#[tokio::test]
async fn test_all_five_stages_compound_in_order() {
    let world = World::new();
    world.scope_list_to(SalesChannel::Online);
    world.price_lists.add_price(LIST, 100, dec!(1000));
    world.price_lists.add_price(LIST, 101, dec!(10));

    let mut channel = rule(1, RuleKind::Channel, DiscountKind::Percentage, dec!(10));
    channel.channel = Some(SalesChannel::Online);
    let unit = rule(2, RuleKind::UnitScale, DiscountKind::FixedAmount, dec!(100));
    let amount = rule(3, RuleKind::AmountScale, DiscountKind::Percentage, dec!(10));
    let order = rule(4, RuleKind::OrderAmount, DiscountKind::FixedAmount, dec!(29));
    for r in [order, amount, unit, channel] {
        world.rules.add_rule(r);
    }
    world.rules.add_bundle(bundle(
        1,
        "Taladro con brocas",
        DiscountKind::Percentage,
        dec!(50),
        vec![(BundleTarget::Item(100), 1), (BundleTarget::Item(101), 1)],
    ));

    let mut req = request(100, dec!(1));
    req.channel = Some(SalesChannel::Online);
    req.order_amount = Some(dec!(1010));
    req.order_lines = Some(vec![
        OrderLine::new(100, dec!(1)),
        OrderLine::new(101, dec!(1)),
    ]);
    let result = world.pricing().calculate_price(&req).await.unwrap();

    // 1000 -10% = 900 ; -100 = 800 ; -10% = 720 ; -29 = 691 ; -50% = 345.5
    assert_eq!(result.final_price, dec!(345.5));
    let kinds: Vec<RuleKind> = result.applied_rules.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RuleKind::Channel,
            RuleKind::UnitScale,
            RuleKind::AmountScale,
            RuleKind::OrderAmount,
            RuleKind::Combination,
        ]
    );
}

#[tokio::test]
async fn test_amount_scale_checks_discounted_line_amount() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(100));

    let unit = rule(1, RuleKind::UnitScale, DiscountKind::Percentage, dec!(20));
    // base × qty = 1000 would match, discounted 80 × 10 = 800 does not
    let mut amount = rule(2, RuleKind::AmountScale, DiscountKind::Percentage, dec!(5));
    amount.min_amount = Some(dec!(900));
    world.rules.add_rule(unit);
    world.rules.add_rule(amount);

    let result = world
        .pricing()
        .calculate_price(&request(100, dec!(10)))
        .await
        .unwrap();

    assert_eq!(result.final_price, dec!(80));
    assert_eq!(result.applied_rules.len(), 1);
}

#[tokio::test]
async fn test_fixed_discount_clamps_at_zero() {
    let world = World::new();
    world.price_lists.add_price(LIST, 101, dec!(5.00));
    world
        .rules
        .add_rule(rule(1, RuleKind::UnitScale, DiscountKind::FixedAmount, dec!(7.50)));

    let result = world
        .pricing()
        .calculate_price(&request(101, dec!(2)))
        .await
        .unwrap();

    assert_eq!(result.final_price, Decimal::ZERO);
    assert_eq!(result.total_amount, Decimal::ZERO);
    assert_eq!(result.discount_percentage, dec!(100));
}

#[tokio::test]
async fn test_scoped_rules_follow_catalog_tree() {
    let world = World::new();
    world.price_lists.add_price(LIST, 110, dec!(50));
    world.price_lists.add_price(LIST, 200, dec!(50));

    let mut line_rule = rule(1, RuleKind::UnitScale, DiscountKind::Percentage, dec!(10));
    line_rule.scope = RuleScope::Line(1);
    world.rules.add_rule(line_rule);

    // item 110 sits in group 11 under line 1
    let in_line = world
        .pricing()
        .calculate_price(&request(110, dec!(1)))
        .await
        .unwrap();
    assert_eq!(in_line.final_price, dec!(45));

    let other_line = world
        .pricing()
        .calculate_price(&request(200, dec!(1)))
        .await
        .unwrap();
    assert_eq!(other_line.final_price, dec!(50));
}

#[tokio::test]
async fn test_higher_priority_wins_within_stage() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1000));

    let mut low = rule(1, RuleKind::UnitScale, DiscountKind::Percentage, dec!(30));
    low.priority = 1;
    let mut high = rule(2, RuleKind::UnitScale, DiscountKind::Percentage, dec!(5));
    high.priority = 10;
    world.rules.add_rule(low);
    world.rules.add_rule(high);

    let result = world
        .pricing()
        .calculate_price(&request(100, dec!(1)))
        .await
        .unwrap();

    assert_eq!(result.final_price, dec!(950));
    assert_eq!(result.applied_rules.len(), 1);
}

#[tokio::test]
async fn test_inactive_rules_are_ignored() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1000));
    let mut inactive = rule(1, RuleKind::UnitScale, DiscountKind::Percentage, dec!(50));
    inactive.active = false;
    world.rules.add_rule(inactive);

    let result = world
        .pricing()
        .calculate_price(&request(100, dec!(1)))
        .await
        .unwrap();

    assert_eq!(result.final_price, dec!(1000));
}

#[tokio::test]
async fn test_missing_price_list_is_not_found() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1000));

    let mut req = request(100, dec!(1));
    req.as_of_date = Some(date(2024, 12, 31));
    let err = world.pricing().calculate_price(&req).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.kind(), "NOT_FOUND");
}

#[tokio::test]
async fn test_missing_base_price_is_not_found() {
    let world = World::new();

    let err = world
        .pricing()
        .calculate_price(&request(100, dec!(1)))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_unknown_and_inactive_items_are_not_found() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1000));
    world.catalog.deactivate_item(100);

    let err = world
        .pricing()
        .calculate_price(&request(100, dec!(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = world
        .pricing()
        .calculate_price(&request(999, dec!(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_non_positive_quantity_is_rejected() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1000));

    for quantity in [Decimal::ZERO, dec!(-3)] {
        let err = world
            .pricing()
            .calculate_price(&request(100, quantity))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_huge_quantity_is_rejected_instead_of_overflowing() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1500));

    let err = world
        .pricing()
        .calculate_price(&request(100, Decimal::MAX / dec!(100)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "VALIDATION_ERROR");

    let result = world
        .pricing()
        .calculate_price(&request(100, MAX_QUANTITY))
        .await
        .unwrap();
    assert_eq!(result.total_amount, dec!(1500) * MAX_QUANTITY);
}

#[tokio::test]
async fn test_branch_request_never_falls_back_to_company_list() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1000));

    let mut req = request(100, dec!(1));
    req.branch_id = Some(7);
    let err = world.pricing().calculate_price(&req).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let branch_list = PriceList {
        branch_id: Some(7),
        ..general_list(2, "Sucursal Norte")
    };
    world.price_lists.add_list(branch_list);
    world.price_lists.add_price(2, 100, dec!(990));

    let result = world.pricing().calculate_price(&req).await.unwrap();
    assert_eq!(result.price_list_id, 2);
    assert_eq!(result.final_price, dec!(990));
}

#[tokio::test]
async fn test_channel_request_only_resolves_list_of_that_channel() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1000));

    let mut req = request(100, dec!(1));
    req.channel = Some(SalesChannel::Store);
    let err = world.pricing().calculate_price(&req).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    world.scope_list_to(SalesChannel::Store);
    let result = world.pricing().calculate_price(&req).await.unwrap();
    assert_eq!(result.price_list_id, LIST);

    // a channel-scoped list is still found when the request names no channel
    let result = world
        .pricing()
        .calculate_price(&request(100, dec!(1)))
        .await
        .unwrap();
    assert_eq!(result.price_list_id, LIST);
}

#[tokio::test]
async fn test_latest_starting_list_wins_overlap() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1000));
    world.price_lists.add_list(PriceList {
        start_date: date(2025, 5, 1),
        ..general_list(2, "Campaña mayo")
    });
    world.price_lists.add_price(2, 100, dec!(900));

    let result = world
        .pricing()
        .calculate_price(&request(100, dec!(1)))
        .await
        .unwrap();
    assert_eq!(result.price_list_name, "Campaña mayo");

    // before the campaign starts the general list applies
    let mut req = request(100, dec!(1));
    req.as_of_date = Some(date(2025, 4, 30));
    let result = world.pricing().calculate_price(&req).await.unwrap();
    assert_eq!(result.price_list_id, LIST);
}

#[tokio::test]
async fn test_identical_requests_give_identical_results() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1234.56));
    world
        .rules
        .add_rule(rule(1, RuleKind::UnitScale, DiscountKind::Percentage, dec!(3.3)));

    let mut req = request(100, dec!(7));
    req.order_amount = Some(dec!(5000));
    let service = world.pricing();
    let first = service.calculate_price(&req).await.unwrap();
    let second = service.calculate_price(&req).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_calculation_is_audited() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1500));

    world
        .pricing()
        .calculate_price(&request(100, dec!(2)))
        .await
        .unwrap();

    let entries = world.audit_entries(1).await;
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.operation, AuditOperation::Calculation);
    assert_eq!(entry.table, "price_calculation");
    assert_eq!(entry.record_id, 100);
    let after = entry.after.as_ref().unwrap();
    assert_eq!(after["below_cost"], false);
    assert!(after["applied_rules"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_audit_failure_does_not_fail_calculation() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1500));

    let (broken, _writer) = AuditDispatcher::spawn(Arc::new(BrokenAuditSink), 4);
    let service = PricingService::new(
        world.price_lists.clone(),
        world.rules.clone(),
        world.catalog.clone(),
        broken,
        BusinessClock::utc(),
    );

    let result = service.calculate_price(&request(100, dec!(1))).await;
    assert!(result.is_ok());

    // and neither does a dispatcher with no writer at all
    let service = PricingService::new(
        world.price_lists.clone(),
        world.rules.clone(),
        world.catalog.clone(),
        AuditDispatcher::disabled(),
        BusinessClock::utc(),
    );
    assert!(service.calculate_price(&request(100, dec!(1))).await.is_ok());
}

#[tokio::test]
async fn test_catalog_failure_is_unexpected() {
    let world = World::new();
    world.price_lists.add_price(LIST, 100, dec!(1500));

    let service = PricingService::new(
        world.price_lists.clone(),
        world.rules.clone(),
        Arc::new(UnavailableCatalog),
        world.audit.clone(),
        BusinessClock::utc(),
    );

    let err = service
        .calculate_price(&request(100, dec!(1)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "UNEXPECTED");
    assert!(!err.public_message().contains("catalog unavailable"));
}

#[tokio::test]
async fn test_dangling_catalog_references_are_internal_errors() {
    let world = World::new();
    // group 30 points at a line that was never loaded
    world.catalog.add_group(30, 3);
    world.catalog.add_item(300, 30, "Lija", dec!(1));
    world.price_lists.add_price(LIST, 300, dec!(2));
    // item 310 points at a group that was never loaded
    world.catalog.add_item(310, 31, "Cinta", dec!(1));
    world.price_lists.add_price(LIST, 310, dec!(2));

    let pricing = world.pricing();
    assert!(matches!(
        pricing.calculate_price(&request(300, dec!(1))).await,
        Err(AppError::Internal(_))
    ));
    assert!(matches!(
        pricing.calculate_price(&request(310, dec!(1))).await,
        Err(AppError::Internal(_))
    ));
}
