pub mod price_list_repository;

pub use price_list_repository::{MySqlPriceListRepository, PriceListRepository};
