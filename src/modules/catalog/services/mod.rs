pub mod hierarchy;

pub use hierarchy::resolve_item_scope;
