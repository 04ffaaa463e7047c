pub mod audit;
pub mod catalog;
pub mod health;
pub mod price_lists;
pub mod pricing;
pub mod rules;
