use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::modules::audit::models::AuditEntry;
use crate::modules::audit::repositories::AuditSink;

/// Hands audit records to a background writer.
///
/// `submit` never waits and never fails: a full or closed queue drops the
/// record with a warning, and sink errors are logged by the writer task.
#[derive(Clone)]
pub struct AuditDispatcher {
    sender: mpsc::Sender<AuditEntry>,
}

impl AuditDispatcher {
    /// Start the writer task draining into `sink`.
    /// The task ends once every dispatcher clone has been dropped.
    pub fn spawn(sink: Arc<dyn AuditSink>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::channel::<AuditEntry>(capacity.max(1));

        let handle = tokio::spawn(async move {
            while let Some(entry) = receiver.recv().await {
                if let Err(err) = sink.record(&entry).await {
                    warn!(
                        error = %err,
                        operation = %entry.operation,
                        table = %entry.table,
                        record_id = entry.record_id,
                        "Failed to persist audit record"
                    );
                }
            }
            debug!("Audit writer stopped");
        });

        (Self { sender }, handle)
    }

    /// Dispatcher whose records go nowhere
    pub fn disabled() -> Self {
        let (sender, _receiver) = mpsc::channel(1);
        Self { sender }
    }

    pub fn submit(&self, entry: AuditEntry) {
        match self.sender.try_send(entry) {
            Ok(()) => {}
            Err(TrySendError::Full(entry)) => {
                warn!(
                    operation = %entry.operation,
                    record_id = entry.record_id,
                    "Audit queue full, dropping record"
                );
            }
            Err(TrySendError::Closed(entry)) => {
                debug!(
                    operation = %entry.operation,
                    record_id = entry.record_id,
                    "Audit queue closed, dropping record"
                );
            }
        }
    }
}
