use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::audit::models::{AuditEntry, AuditRow, BASE_PRICE_TABLE, CALCULATION_TABLE};

/// Destination for audit records
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: &AuditEntry) -> Result<()>;
}

/// Read side of the audit trail
#[async_trait]
pub trait AuditTrail: Send + Sync {
    /// Calculations of an item and changes to any of its base prices,
    /// newest first
    async fn history_for_item(&self, item_id: i64) -> Result<Vec<AuditEntry>>;
}

/// Persists audit records into the `price_audit` table
pub struct MySqlAuditSink {
    pool: MySqlPool,
}

impl MySqlAuditSink {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for MySqlAuditSink {
    async fn record(&self, entry: &AuditEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO price_audit (
                operation, table_name, record_id, user_name, before_data, after_data, recorded_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.operation.to_string())
        .bind(&entry.table)
        .bind(entry.record_id)
        .bind(&entry.user)
        .bind(entry.before.as_ref().map(|v| v.to_string()))
        .bind(entry.after.as_ref().map(|v| v.to_string()))
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl AuditTrail for MySqlAuditSink {
    async fn history_for_item(&self, item_id: i64) -> Result<Vec<AuditEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(
            r#"
            SELECT operation, table_name, record_id, user_name,
                   before_data, after_data, recorded_at
            FROM price_audit
            WHERE (table_name = ? AND record_id = ?)
               OR (table_name = ? AND record_id IN (
                       SELECT id FROM item_base_prices WHERE item_id = ?
                   ))
            ORDER BY recorded_at DESC, id DESC
            "#,
        )
        .bind(CALCULATION_TABLE)
        .bind(item_id)
        .bind(BASE_PRICE_TABLE)
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AuditEntry::try_from).collect()
    }
}
