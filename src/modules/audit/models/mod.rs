mod audit_entry;

pub use audit_entry::{
    snapshot, AuditEntry, AuditOperation, AuditRow, BASE_PRICE_TABLE, BUNDLE_TABLE,
    CALCULATION_TABLE, PRICE_LIST_TABLE, RULE_TABLE,
};
