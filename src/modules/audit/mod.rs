// Audit module: explicit audit trail for price writes and price calculations

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{
    snapshot, AuditEntry, AuditOperation, BASE_PRICE_TABLE, BUNDLE_TABLE, CALCULATION_TABLE,
    PRICE_LIST_TABLE, RULE_TABLE,
};
pub use repositories::{AuditSink, AuditTrail, MySqlAuditSink};
pub use services::{AuditDispatcher, AuditHistoryService};
