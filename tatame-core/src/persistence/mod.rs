//! Debounced persistence
//!
//! Mutations never touch storage directly. They mark their section dirty
//! through a [`PersistHandle`]; the [`PersistenceWorker`] coalesces marks
//! and, once the debounce window passes without a new mark, saves a fresh
//! snapshot of every dirty section.

mod worker;

pub use worker::{PersistenceWorker, SnapshotSource};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::storage::StorageSection;

/// Default idle interval before a flush
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Observable state of the persistence worker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub is_syncing: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub(crate) enum PersistCommand {
    Dirty(StorageSection),
    /// Save everything pending now, reply when done
    Flush(oneshot::Sender<()>),
}

/// Cheap clonable sender side of the worker
#[derive(Debug, Clone)]
pub struct PersistHandle {
    tx: mpsc::UnboundedSender<PersistCommand>,
    status: Arc<Mutex<SyncStatus>>,
}

impl PersistHandle {
    /// Schedule a save of `section`
    pub fn mark_dirty(&self, section: StorageSection) {
        if self.tx.send(PersistCommand::Dirty(section)).is_err() {
            tracing::warn!(section = %section, "Persistence worker stopped, change not scheduled");
        }
    }

    /// Save all pending sections without waiting for the debounce window
    pub async fn flush(&self) {
        let (reply, done) = oneshot::channel();
        if self.tx.send(PersistCommand::Flush(reply)).is_err() {
            return;
        }
        let _ = done.await;
    }

    pub fn status(&self) -> SyncStatus {
        self.status.lock().clone()
    }
}

/// Create a worker and the handle that feeds it
pub fn channel(
    storage: Arc<dyn crate::storage::Storage>,
    source: Arc<dyn SnapshotSource>,
    debounce: std::time::Duration,
    shutdown: tokio_util::sync::CancellationToken,
) -> (PersistHandle, PersistenceWorker) {
    let (tx, rx) = mpsc::unbounded_channel();
    let status = Arc::new(Mutex::new(SyncStatus::default()));
    let handle = PersistHandle {
        tx,
        status: status.clone(),
    };
    let worker = PersistenceWorker::new(storage, source, rx, status, debounce, shutdown);
    (handle, worker)
}
