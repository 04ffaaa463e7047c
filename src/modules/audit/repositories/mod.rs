pub mod audit_sink;

pub use audit_sink::{AuditSink, AuditTrail, MySqlAuditSink};
