//! Precios pricing engine library
//!
//! Resolves the price of catalog items from the price list in force, its
//! commercial rules and product bundles, and records an audit trail of
//! price writes and calculations.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::audit;
pub use modules::catalog;
pub use modules::price_lists;
pub use modules::pricing;
pub use modules::rules;
