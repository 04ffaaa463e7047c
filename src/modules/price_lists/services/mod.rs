pub mod base_price;
pub mod price_list_service;
pub mod resolver;
pub mod supplier_discount;

pub use base_price::{check_cost, margin_percentage, validate_base_price, BasePriceLookup, CostCheck};
pub use price_list_service::{BulkLoadError, BulkLoadResult, PriceCheck, PriceListService};
pub use resolver::{select_current, PriceListQuery, PriceListResolver};
pub use supplier_discount::{validate_supplier_discount, SupplierDiscountService};
