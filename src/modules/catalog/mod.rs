// Catalog module: product lines, groups and items consumed by the pricing engine

pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Item, ItemScope, ProductGroup, ProductLine};
pub use repositories::{CatalogStore, MySqlCatalogStore};
pub use services::resolve_item_scope;
