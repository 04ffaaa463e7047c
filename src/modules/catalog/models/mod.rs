mod item;

pub use item::{Item, ItemScope, ProductGroup, ProductLine};
