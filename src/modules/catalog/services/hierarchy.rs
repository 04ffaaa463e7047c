use crate::core::{AppError, Result};
use crate::modules::catalog::models::{Item, ItemScope};
use crate::modules::catalog::repositories::CatalogStore;

/// Resolve the group and line an item sits under.
///
/// A dangling group or line reference is a catalog integrity problem, not a
/// caller error, so it surfaces as `Internal`.
pub async fn resolve_item_scope(catalog: &dyn CatalogStore, item: &Item) -> Result<ItemScope> {
    let group = catalog.get_group(item.group_id).await?.ok_or_else(|| {
        AppError::internal(format!(
            "Item {} references missing group {}",
            item.id, item.group_id
        ))
    })?;

    let line = catalog.get_line(group.line_id).await?.ok_or_else(|| {
        AppError::internal(format!(
            "Group {} references missing line {}",
            group.id, group.line_id
        ))
    })?;

    Ok(ItemScope::new(item.id, group.id, line.id))
}
