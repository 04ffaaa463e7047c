// Write paths: price lists, base prices, bulk loads, rules and bundles

mod helpers;

use helpers::*;
use precios::core::AppError;
use precios::modules::audit::AuditOperation;
use precios::modules::pricing::CalculatePriceRequest;
use precios::modules::price_lists::models::{BasePriceInput, DuplicatePriceList};
use precios::modules::price_lists::{NewPriceList, PriceListQuery, PriceListType, SalesChannel};
use precios::modules::rules::{BundleTarget, DiscountKind, RuleKind};
use rust_decimal_macros::dec;

fn new_list(name: &str, start: chrono::NaiveDate, end: Option<chrono::NaiveDate>) -> NewPriceList {
    NewPriceList {
        company_id: COMPANY,
        branch_id: None,
        name: name.to_string(),
        list_type: PriceListType::Wholesale,
        channel: Some(SalesChannel::Distributor),
        start_date: start,
        end_date: end,
        active: true,
    }
}

#[tokio::test]
async fn test_overlapping_active_list_is_rejected() {
    let world = World::new();
    let service = world.services().price_lists;

    // the general list is open-ended from 2025-01-01
    let err = service
        .create_price_list(new_list("Mayorista", date(2026, 1, 1), None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // an inactive list never clashes
    let mut inactive = new_list("Borrador", date(2026, 1, 1), None);
    inactive.active = false;
    assert!(service.create_price_list(inactive).await.is_ok());

    // a window that ends before the general list starts is fine
    let created = service
        .create_price_list(new_list("Mayorista 2024", date(2024, 1, 1), Some(date(2024, 12, 31))))
        .await
        .unwrap();
    assert_eq!(created.list_type, PriceListType::Wholesale);
    assert_eq!(world.price_lists.list_count(), 3);
}

#[tokio::test]
async fn test_branch_list_only_clashes_within_branch() {
    let world = World::new();
    let service = world.services().price_lists;

    let mut branch = new_list("Sucursal 7", date(2025, 3, 1), None);
    branch.branch_id = Some(7);
    assert!(service.create_price_list(branch).await.is_ok());

    let mut again = new_list("Sucursal 7 bis", date(2025, 6, 1), None);
    again.branch_id = Some(7);
    assert!(service.create_price_list(again).await.is_err());
}

#[tokio::test]
async fn test_inverted_window_is_rejected() {
    let world = World::new();
    let service = world.services().price_lists;

    let err = service
        .create_price_list(new_list("Mal", date(2024, 6, 1), Some(date(2024, 5, 1))))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_below_cost_price_needs_authorization_or_supplier_discount() {
    let world = World::new();
    let service = world.services().price_lists;

    // item 100 costs 1000
    let err = service
        .upsert_base_price(LIST, BasePriceInput::new(100, dec!(800)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut authorized = BasePriceInput::new(100, dec!(800));
    authorized.authorized_below_cost = true;
    let stored = service.upsert_base_price(LIST, authorized).await.unwrap();
    assert!(stored.below_cost);

    let mut discounted = BasePriceInput::new(100, dec!(750));
    discounted.supplier_discount = dec!(50);
    let stored = service.upsert_base_price(LIST, discounted).await.unwrap();
    assert!(stored.below_cost);
    assert_eq!(stored.base_price, dec!(750));
}

#[tokio::test]
async fn test_base_price_bounds() {
    let world = World::new();
    let service = world.services().price_lists;

    let err = service
        .upsert_base_price(LIST, BasePriceInput::new(101, dec!(1000000)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut odd_discount = BasePriceInput::new(101, dec!(10));
    odd_discount.supplier_discount = dec!(20);
    assert!(service.upsert_base_price(LIST, odd_discount).await.is_err());

    assert!(service
        .upsert_base_price(LIST, BasePriceInput::new(101, dec!(999999.99)))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_upsert_replaces_and_audits() {
    let world = World::new();
    let service = world.services().price_lists;

    let first = service
        .upsert_base_price(LIST, BasePriceInput::new(110, dec!(25)))
        .await
        .unwrap();
    let second = service
        .upsert_base_price(LIST, BasePriceInput::new(110, dec!(27.5)))
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.base_price, dec!(27.5));

    let entries = world.audit_entries(2).await;
    assert_eq!(entries[0].operation, AuditOperation::Creation);
    assert_eq!(entries[1].operation, AuditOperation::Modification);
    assert_eq!(entries[1].before.as_ref().unwrap()["item_id"], 110);
    assert_eq!(entries[1].record_id, first.id);
}

#[tokio::test]
async fn test_unknown_list_or_item_is_not_found() {
    let world = World::new();
    let service = world.services().price_lists;

    let err = service
        .upsert_base_price(99, BasePriceInput::new(110, dec!(25)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = service
        .upsert_base_price(LIST, BasePriceInput::new(999, dec!(25)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_bulk_load_collects_row_errors() {
    let world = World::new();
    let service = world.services().price_lists;

    let result = service
        .bulk_load_prices(
            LIST,
            vec![
                BasePriceInput::new(110, dec!(25)),
                BasePriceInput::new(100, dec!(500)),
                BasePriceInput::new(999, dec!(1)),
                BasePriceInput::new(200, dec!(45)),
            ],
        )
        .await
        .unwrap();

    assert_eq!(result.stored.len(), 2);
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.errors[0].index, 1);
    assert_eq!(result.errors[0].kind, "VALIDATION_ERROR");
    assert_eq!(result.errors[1].item_id, 999);
    assert_eq!(result.errors[1].kind, "NOT_FOUND");
}

#[tokio::test]
async fn test_empty_bulk_load_is_rejected() {
    let world = World::new();
    let err = world
        .services()
        .price_lists
        .bulk_load_prices(LIST, vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_cost_check_reports_margin() {
    let world = World::new();
    let service = world.services().price_lists;

    let check = service.check_price(100, dec!(1200)).await.unwrap();
    assert!(check.check.valid);
    assert_eq!(check.margin_percentage, dec!(20.00));

    let check = service.check_price(100, dec!(900)).await.unwrap();
    assert!(!check.check.valid);
    assert!(check.check.requires_authorization);
    assert_eq!(check.margin_percentage, dec!(-10.00));
}

#[tokio::test]
async fn test_rule_creation_validates_and_assigns_id() {
    let world = World::new();
    let service = world.services().rules;

    let mut scale = rule(0, RuleKind::UnitScale, DiscountKind::Percentage, dec!(10));
    scale.min_quantity = Some(dec!(12));
    scale.max_quantity = Some(dec!(24));
    let created = service.create_rule(scale.clone()).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(world.rules.rule_count(), 1);

    let mut inverted = scale.clone();
    inverted.max_quantity = Some(dec!(6));
    assert!(matches!(
        service.create_rule(inverted).await,
        Err(AppError::Validation(_))
    ));

    let mut channel_without_channel = rule(0, RuleKind::Channel, DiscountKind::Percentage, dec!(5));
    channel_without_channel.channel = None;
    assert!(service.create_rule(channel_without_channel).await.is_err());

    let mut orphan = scale;
    orphan.price_list_id = 77;
    assert!(matches!(
        service.create_rule(orphan).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_bundle_creation_requires_requirements() {
    let world = World::new();
    let service = world.services().rules;

    let empty = bundle(0, "Vacio", DiscountKind::Percentage, dec!(10), vec![]);
    assert!(matches!(
        service.create_bundle(empty).await,
        Err(AppError::Validation(_))
    ));

    let zero_quantity = bundle(
        0,
        "Cero",
        DiscountKind::Percentage,
        dec!(10),
        vec![(BundleTarget::Line(1), 0)],
    );
    assert!(service.create_bundle(zero_quantity).await.is_err());

    let kit = bundle(
        0,
        "Kit pintura",
        DiscountKind::FixedAmount,
        dec!(3),
        vec![(BundleTarget::Line(2), 2), (BundleTarget::Item(110), 1)],
    );
    let created = service.create_bundle(kit).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.requirements.len(), 2);

    let entries = world.audit_entries(1).await;
    assert_eq!(entries[0].table, "product_bundles");
}

#[tokio::test]
async fn test_duplicate_copies_prices_and_rules_into_inactive_list() {
    let world = World::new();
    world.scope_list_to(SalesChannel::Store);
    world.price_lists.add_price(LIST, 100, dec!(1500));
    world.price_lists.add_price(LIST, 200, dec!(45));
    world
        .rules
        .add_rule(rule(1, RuleKind::OrderAmount, DiscountKind::Percentage, dec!(5)));
    world.rules.add_bundle(bundle(
        2,
        "Kit",
        DiscountKind::Percentage,
        dec!(10),
        vec![(BundleTarget::Item(100), 1)],
    ));
    let service = world.services().price_lists;

    let duplicated = service
        .duplicate_price_list(
            LIST,
            DuplicatePriceList {
                start_date: date(2026, 1, 1),
                end_date: Some(date(2026, 12, 31)),
            },
        )
        .await
        .unwrap();

    assert_ne!(duplicated.list.id, LIST);
    assert_eq!(duplicated.list.name, "General 2025 (Copia)");
    assert!(!duplicated.list.active);
    assert_eq!(duplicated.list.channel, Some(SalesChannel::Store));
    assert_eq!(duplicated.list.start_date, date(2026, 1, 1));
    assert_eq!(duplicated.prices_copied, 2);
    assert_eq!(duplicated.rules_copied, 1);

    let detail = service.list_detail(duplicated.list.id).await.unwrap();
    assert_eq!(detail.prices.len(), 2);
    assert!(detail.prices.iter().all(|p| p.price_list_id == duplicated.list.id));
    assert!(detail.prices.iter().all(|p| p.notes.is_empty()));
    assert_eq!(detail.rules.len(), 1);
    assert_eq!(detail.rules[0].price_list_id, duplicated.list.id);
    assert!(detail.bundles.is_empty());

    // the source is untouched
    let source = service.list_detail(LIST).await.unwrap();
    assert_eq!(source.prices.len(), 2);
    assert_eq!(source.bundles.len(), 1);

    let entries = world.audit_entries(1).await;
    assert_eq!(entries[0].operation, AuditOperation::Creation);
    assert_eq!(entries[0].table, "price_lists");
    assert_eq!(entries[0].record_id, duplicated.list.id);
    assert!(entries[0].before.is_some());
}

#[tokio::test]
async fn test_duplicate_checks_window_and_source() {
    let world = World::new();
    let service = world.services().price_lists;

    let inverted = DuplicatePriceList {
        start_date: date(2026, 6, 1),
        end_date: Some(date(2026, 5, 1)),
    };
    assert!(matches!(
        service.duplicate_price_list(LIST, inverted).await,
        Err(AppError::Validation(_))
    ));

    let open_ended = DuplicatePriceList {
        start_date: date(2026, 1, 1),
        end_date: None,
    };
    assert!(matches!(
        service.duplicate_price_list(404, open_ended).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(world.price_lists.list_count(), 1);
}

#[tokio::test]
async fn test_current_list_carries_prices_rules_and_bundles() {
    let world = World::new();
    world.price_lists.add_price(LIST, 110, dec!(25));
    world
        .rules
        .add_rule(rule(1, RuleKind::UnitScale, DiscountKind::Percentage, dec!(15)));
    world.rules.add_bundle(bundle(
        2,
        "Kit",
        DiscountKind::FixedAmount,
        dec!(3),
        vec![(BundleTarget::Line(2), 2)],
    ));
    let service = world.services().price_lists;

    let query = PriceListQuery {
        company_id: COMPANY,
        branch_id: None,
        channel: None,
        as_of: Some(date(2025, 6, 1)),
    };
    let detail = service.current_list(&query).await.unwrap();
    assert_eq!(detail.list.id, LIST);
    assert_eq!(detail.prices.len(), 1);
    assert_eq!(detail.prices[0].item_id, 110);
    assert_eq!(detail.rules.len(), 1);
    assert_eq!(detail.bundles.len(), 1);

    // before the general list starts nothing is in force
    let too_early = PriceListQuery {
        as_of: Some(date(2024, 6, 1)),
        ..query
    };
    assert!(matches!(
        service.current_list(&too_early).await,
        Err(AppError::NotFound(_))
    ));

    assert!(matches!(
        service.list_detail(404).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_item_history_is_newest_first_and_item_scoped() {
    let world = World::new();
    let services = world.services();

    services
        .price_lists
        .upsert_base_price(LIST, BasePriceInput::new(110, dec!(25)))
        .await
        .unwrap();
    services
        .price_lists
        .upsert_base_price(LIST, BasePriceInput::new(110, dec!(28)))
        .await
        .unwrap();
    services
        .price_lists
        .upsert_base_price(LIST, BasePriceInput::new(101, dec!(5)))
        .await
        .unwrap();
    let mut request = CalculatePriceRequest::new(COMPANY, 110, dec!(2));
    request.as_of_date = Some(date(2025, 6, 1));
    services.pricing.calculate_price(&request).await.unwrap();
    world.audit_entries(4).await;

    let history = services.audit_history.item_history(110).await.unwrap();
    let operations: Vec<AuditOperation> = history.iter().map(|e| e.operation).collect();
    assert_eq!(
        operations,
        vec![
            AuditOperation::Calculation,
            AuditOperation::Modification,
            AuditOperation::Creation,
        ]
    );
    assert!(history[1].before.is_some());

    // the item exists but was never priced
    assert!(services.audit_history.item_history(200).await.unwrap().is_empty());

    assert!(matches!(
        services.audit_history.item_history(999).await,
        Err(AppError::NotFound(_))
    ));
}
