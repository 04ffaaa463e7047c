// Price lists module: list resolution, base prices and supplier discounts

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{ItemBasePrice, NewPriceList, PriceList, PriceListType, SalesChannel};
pub use repositories::{MySqlPriceListRepository, PriceListRepository};
pub use services::{PriceListQuery, PriceListResolver, PriceListService, SupplierDiscountService};
