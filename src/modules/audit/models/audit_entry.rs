use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::core::{AppError, Result};

// Record families written to the trail
pub const PRICE_LIST_TABLE: &str = "price_lists";
pub const BASE_PRICE_TABLE: &str = "item_base_prices";
pub const RULE_TABLE: &str = "pricing_rules";
pub const BUNDLE_TABLE: &str = "product_bundles";
/// Calculations are keyed by item id
pub const CALCULATION_TABLE: &str = "price_calculation";

/// Kind of change an audit record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOperation {
    Creation,
    Modification,
    Deletion,
    Calculation,
}

impl std::fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditOperation::Creation => write!(f, "CREATION"),
            AuditOperation::Modification => write!(f, "MODIFICATION"),
            AuditOperation::Deletion => write!(f, "DELETION"),
            AuditOperation::Calculation => write!(f, "CALCULATION"),
        }
    }
}

impl std::str::FromStr for AuditOperation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "CREATION" => Ok(AuditOperation::Creation),
            "MODIFICATION" => Ok(AuditOperation::Modification),
            "DELETION" => Ok(AuditOperation::Deletion),
            "CALCULATION" => Ok(AuditOperation::Calculation),
            _ => Err(format!("Invalid audit operation: {}", s)),
        }
    }
}

/// One audit trail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub operation: AuditOperation,
    /// Logical table or record family, e.g. `item_base_prices`
    pub table: String,
    pub record_id: i64,
    pub user: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(operation: AuditOperation, table: impl Into<String>, record_id: i64) -> Self {
        Self {
            operation,
            table: table.into(),
            record_id,
            user: String::new(),
            before: None,
            after: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_before(mut self, before: Option<Value>) -> Self {
        self.before = before;
        self
    }

    pub fn with_after(mut self, after: Option<Value>) -> Self {
        self.after = after;
        self
    }

    pub fn by_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }
}

/// Raw `price_audit` row; snapshots are stored as JSON text
#[derive(Debug, FromRow)]
pub struct AuditRow {
    pub operation: String,
    pub table_name: String,
    pub record_id: i64,
    pub user_name: String,
    pub before_data: Option<String>,
    pub after_data: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl TryFrom<AuditRow> for AuditEntry {
    type Error = AppError;

    fn try_from(row: AuditRow) -> Result<Self> {
        let parse = |data: Option<String>| -> Result<Option<Value>> {
            data.map(|text| serde_json::from_str(&text))
                .transpose()
                .map_err(|e| AppError::internal(format!("Corrupt audit snapshot: {}", e)))
        };

        Ok(AuditEntry {
            operation: row.operation.parse().map_err(AppError::Internal)?,
            table: row.table_name,
            record_id: row.record_id,
            user: row.user_name,
            before: parse(row.before_data)?,
            after: parse(row.after_data)?,
            recorded_at: row.recorded_at,
        })
    }
}

/// JSON snapshot of a record for the audit trail.
/// A value that cannot be serialized is logged and recorded as absent.
pub fn snapshot<T: Serialize>(value: &T) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(json) => Some(json),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to snapshot record for audit");
            None
        }
    }
}
