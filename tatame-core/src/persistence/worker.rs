//! PersistenceWorker - write-coalescing background task

use parking_lot::Mutex;
use serde_json::Value;
use shared::error::AppResult;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::{PersistCommand, SyncStatus};
use crate::storage::{Storage, StorageSection};

/// Delay before retrying sections whose save failed
const RETRY_DELAY_MS: u64 = 5000;

/// Produces the current serialized content of a section
pub trait SnapshotSource: Send + Sync {
    fn snapshot(&self, section: StorageSection) -> AppResult<Value>;
}

pub struct PersistenceWorker {
    storage: Arc<dyn Storage>,
    source: Arc<dyn SnapshotSource>,
    rx: mpsc::UnboundedReceiver<PersistCommand>,
    status: Arc<Mutex<SyncStatus>>,
    debounce: Duration,
    shutdown: CancellationToken,
}

impl PersistenceWorker {
    pub(crate) fn new(
        storage: Arc<dyn Storage>,
        source: Arc<dyn SnapshotSource>,
        rx: mpsc::UnboundedReceiver<PersistCommand>,
        status: Arc<Mutex<SyncStatus>>,
        debounce: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            storage,
            source,
            rx,
            status,
            debounce,
            shutdown,
        }
    }

    /// Run until shutdown or until every handle is dropped.
    ///
    /// Each dirty mark pushes the deadline back by the debounce window;
    /// pending sections are always flushed before the loop exits.
    pub async fn run(mut self) {
        tracing::info!(debounce_ms = self.debounce.as_millis() as u64, "PersistenceWorker started");

        let mut pending: BTreeSet<StorageSection> = BTreeSet::new();
        let mut deadline: Option<Instant> = None;

        loop {
            let sleep_until = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("PersistenceWorker shutting down");
                    // Marks sent just before cancellation are still queued
                    while let Ok(cmd) = self.rx.try_recv() {
                        self.absorb(cmd, &mut pending).await;
                    }
                    if !pending.is_empty() {
                        self.flush_pending(&mut pending).await;
                    }
                    break;
                }

                _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                    self.flush_pending(&mut pending).await;
                    deadline = (!pending.is_empty())
                        .then(|| Instant::now() + Duration::from_millis(RETRY_DELAY_MS));
                }

                cmd = self.rx.recv() => {
                    match cmd {
                        Some(PersistCommand::Dirty(section)) => {
                            pending.insert(section);
                            deadline = Some(Instant::now() + self.debounce);
                        }
                        Some(cmd @ PersistCommand::Flush(_)) => {
                            self.absorb(cmd, &mut pending).await;
                            deadline = (!pending.is_empty())
                                .then(|| Instant::now() + Duration::from_millis(RETRY_DELAY_MS));
                        }
                        None => {
                            tracing::info!("Persistence channel closed, PersistenceWorker stopping");
                            if !pending.is_empty() {
                                self.flush_pending(&mut pending).await;
                            }
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!("PersistenceWorker stopped");
    }

    async fn absorb(&self, cmd: PersistCommand, pending: &mut BTreeSet<StorageSection>) {
        match cmd {
            PersistCommand::Dirty(section) => {
                pending.insert(section);
            }
            PersistCommand::Flush(reply) => {
                self.flush_pending(pending).await;
                let _ = reply.send(());
            }
        }
    }

    /// Save every pending section. Failed sections stay pending.
    async fn flush_pending(&self, pending: &mut BTreeSet<StorageSection>) {
        if pending.is_empty() {
            return;
        }
        self.status.lock().is_syncing = true;

        let mut last_error = None;
        for section in pending.clone() {
            match self.save_section(section).await {
                Ok(()) => {
                    pending.remove(&section);
                }
                Err(e) => {
                    tracing::error!(section = %section, error = %e, "Failed to persist section");
                    last_error = Some(format!("{section}: {e}"));
                }
            }
        }

        let mut status = self.status.lock();
        status.is_syncing = false;
        match last_error {
            Some(error) => status.last_error = Some(error),
            None => {
                status.last_sync_at = Some(shared::util::now());
                status.last_error = None;
                tracing::debug!("Persisted all pending sections");
            }
        }
    }

    async fn save_section(&self, section: StorageSection) -> AppResult<()> {
        // Snapshot at flush time, not at mark time
        let data = self.source.snapshot(section)?;
        self.storage.save(section, &data).await?;
        Ok(())
    }
}
