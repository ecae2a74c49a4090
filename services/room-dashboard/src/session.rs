//! Dashboard session: owns the view-model lifecycle
//!
//! Mounting creates an empty store, starts the one-shot snapshot load and
//! opens the change subscription. Both producers feed a single update queue
//! drained by one applier task, so the store is only ever written from one
//! place. Unmounting releases the subscription exactly once.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::realtime::{ChangeSource, ChangeStream};
use crate::reading::Reading;
use crate::snapshot::SnapshotSource;
use crate::state::{new_store_handle, StoreHandle, ViewModel};

/// A state change delivered to the update queue
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Full replacement from the bulk load
    Snapshot(Vec<Reading>),
    /// One row from the change stream
    Change(Reading),
}

/// Apply one update to the store
pub fn apply_update(store: &mut ViewModel, update: Update) {
    match update {
        Update::Snapshot(readings) => {
            tracing::info!("Snapshot loaded with {} rows", readings.len());
            store.replace_with(readings);
        }
        Update::Change(reading) => {
            tracing::debug!("Applying change for '{}'", reading.key());
            store.upsert(reading);
        }
    }
}

/// A mounted dashboard view
pub struct DashboardSession {
    store: StoreHandle,
    revision: watch::Receiver<u64>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    released: bool,
}

impl DashboardSession {
    /// Mount the view: start the snapshot load and the subscription
    ///
    /// Returns without waiting for either; both deliver through the update
    /// queue once they complete.
    pub async fn mount(
        snapshot: Arc<dyn SnapshotSource>,
        changes: Arc<dyn ChangeSource>,
    ) -> Self {
        let store = new_store_handle();
        let cancel = CancellationToken::new();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel::<Update>();
        let (revision_tx, revision) = watch::channel(0u64);

        tracing::info!("Mounting dashboard session");

        let mut tasks = Vec::new();

        tasks.push(tokio::spawn(apply_loop(
            updates_rx,
            Arc::clone(&store),
            revision_tx,
            cancel.clone(),
        )));

        let snapshot_tx = updates_tx.clone();
        let snapshot_cancel = cancel.clone();
        tasks.push(tokio::spawn(async move {
            tokio::select! {
                biased;
                result = snapshot.fetch() => match result {
                    Ok(readings) => {
                        let _ = snapshot_tx.send(Update::Snapshot(readings));
                    }
                    Err(e) => tracing::warn!("Snapshot load failed, keeping current view: {}", e),
                },
                _ = snapshot_cancel.cancelled() => tracing::debug!("Snapshot load cancelled"),
            }
        }));

        tasks.push(tokio::spawn(subscribe_and_listen(
            changes,
            updates_tx,
            cancel.clone(),
        )));

        Self {
            store,
            revision,
            cancel,
            tasks,
            released: false,
        }
    }

    /// Handle to the store for rendering
    pub fn store(&self) -> StoreHandle {
        Arc::clone(&self.store)
    }

    /// Receiver that ticks after every applied update
    pub fn revisions(&self) -> watch::Receiver<u64> {
        self.revision.clone()
    }

    /// Tear the view down and wait for the subscription to be released
    pub async fn unmount(mut self) {
        self.release();
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
        tracing::info!("Dashboard session unmounted");
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.cancel.cancel();
        }
    }
}

impl Drop for DashboardSession {
    fn drop(&mut self) {
        self.release();
    }
}

async fn apply_loop(
    mut updates: mpsc::UnboundedReceiver<Update>,
    store: StoreHandle,
    revision: watch::Sender<u64>,
    cancel: CancellationToken,
) {
    loop {
        let update = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            update = updates.recv() => match update {
                Some(update) => update,
                None => break,
            },
        };

        apply_update(&mut *store.write().await, update);
        revision.send_modify(|r| *r += 1);
    }
    tracing::debug!("Update queue stopped");
}

async fn subscribe_and_listen(
    changes: Arc<dyn ChangeSource>,
    updates: mpsc::UnboundedSender<Update>,
    cancel: CancellationToken,
) {
    // An acquired stream always reaches listen_loop, which releases it
    let stream = tokio::select! {
        biased;
        result = changes.subscribe() => match result {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!("Change subscription failed, view will not update: {}", e);
                return;
            }
        },
        _ = cancel.cancelled() => {
            tracing::debug!("Change subscription cancelled before it was established");
            return;
        }
    };

    listen_loop(stream, updates, cancel).await;
}

async fn listen_loop(
    mut stream: Box<dyn ChangeStream>,
    updates: mpsc::UnboundedSender<Update>,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            event = stream.next_event() => event,
        };

        let Some(event) = event else {
            tracing::warn!("Change stream ended, view keeps its last state");
            break;
        };

        match event.new_row() {
            Ok(reading) => {
                if updates.send(Update::Change(reading)).is_err() {
                    break;
                }
            }
            Err(e) => tracing::debug!("Skipping {:?} change: {}", event.kind, e),
        }
    }

    if let Err(e) = stream.close().await {
        tracing::warn!("Failed to release change subscription: {}", e);
    }
}
