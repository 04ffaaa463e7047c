use std::sync::Arc;

use crate::core::{AppError, Result};
use crate::modules::audit::models::AuditEntry;
use crate::modules::audit::repositories::AuditTrail;
use crate::modules::catalog::CatalogStore;

/// Per-item view over the audit trail
pub struct AuditHistoryService {
    trail: Arc<dyn AuditTrail>,
    catalog: Arc<dyn CatalogStore>,
}

impl AuditHistoryService {
    pub fn new(trail: Arc<dyn AuditTrail>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self { trail, catalog }
    }

    /// Price calculations and base price changes of one item, newest first.
    /// Inactive items keep their history; unknown items are `NotFound`.
    pub async fn item_history(&self, item_id: i64) -> Result<Vec<AuditEntry>> {
        self.catalog
            .get_item(item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Item {} not found", item_id)))?;

        let entries = self.trail.history_for_item(item_id).await?;
        tracing::debug!(item_id, entries = entries.len(), "Audit history read");

        Ok(entries)
    }
}
