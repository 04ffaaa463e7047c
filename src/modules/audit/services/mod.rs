pub mod dispatcher;
pub mod history;

pub use dispatcher::AuditDispatcher;
pub use history::AuditHistoryService;
