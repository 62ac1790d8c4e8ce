//! Catalog store
//!
//! Authoritative local copy of one remote collection. Views read snapshots
//! (or subscribe to changes); only `load` and the `apply_*` write-through
//! methods mutate it.

use crate::error::{SyncError, SyncResult};
use crate::remote::CatalogApi;
use serde::Serialize;
use shared::catalog::{CatalogRecord, ProductFamily};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Fetch status of a store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Last fetch failed; the previous records are still served
    Failed { message: String },
}

/// Records plus load status, as published to subscribers
#[derive(Debug)]
pub struct CatalogSnapshot<R> {
    pub records: Arc<Vec<R>>,
    pub load_state: LoadState,
}

impl<R> Clone for CatalogSnapshot<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            load_state: self.load_state.clone(),
        }
    }
}

struct StoreInner<R: CatalogRecord> {
    api: Arc<dyn CatalogApi<R>>,
    family: ProductFamily,
    state: watch::Sender<CatalogSnapshot<R>>,
    cancel: CancellationToken,
    /// Sequence of the most recently started load
    load_seq: AtomicU64,
}

/// Shared handle to a catalog store
pub struct CatalogStore<R: CatalogRecord> {
    inner: Arc<StoreInner<R>>,
}

impl<R: CatalogRecord> Clone for CatalogStore<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Collapse duplicate ids: first position kept, last value wins
fn dedupe<R: CatalogRecord>(family: ProductFamily, records: Vec<R>) -> Vec<R> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut unique: Vec<R> = Vec::with_capacity(records.len());
    for record in records {
        match positions.get(record.id()) {
            Some(&pos) => {
                tracing::warn!(family = %family, id = %record.id(), "Duplicate id in fetched collection");
                unique[pos] = record;
            }
            None => {
                positions.insert(record.id().to_string(), unique.len());
                unique.push(record);
            }
        }
    }
    unique
}

impl<R: CatalogRecord> CatalogStore<R> {
    pub fn new(api: Arc<dyn CatalogApi<R>>) -> Self {
        let family = api.family();
        let (state, _) = watch::channel(CatalogSnapshot {
            records: Arc::new(Vec::new()),
            load_state: LoadState::Idle,
        });
        Self {
            inner: Arc::new(StoreInner {
                api,
                family,
                state,
                cancel: CancellationToken::new(),
                load_seq: AtomicU64::new(0),
            }),
        }
    }

    pub fn family(&self) -> ProductFamily {
        self.inner.family
    }

    /// Current records
    pub fn snapshot(&self) -> Arc<Vec<R>> {
        Arc::clone(&self.inner.state.borrow().records)
    }

    pub fn load_state(&self) -> LoadState {
        self.inner.state.borrow().load_state.clone()
    }

    /// Receiver notified on every store change
    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot<R>> {
        self.inner.state.subscribe()
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.inner
            .state
            .borrow()
            .records
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Token cancelled by [`CatalogStore::shutdown`]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Cancel in-flight loads; no state is written afterwards
    pub fn shutdown(&self) {
        tracing::debug!(family = %self.inner.family, "Catalog store shutting down");
        self.inner.cancel.cancel();
    }

    /// Apply `f` unless the store has been shut down
    fn write(&self, f: impl FnOnce(&mut CatalogSnapshot<R>) -> bool) -> bool {
        if self.inner.cancel.is_cancelled() {
            tracing::debug!(family = %self.inner.family, "Store shut down, write skipped");
            return false;
        }
        self.inner.state.send_if_modified(f)
    }

    /// Fetch the whole collection and replace local state
    ///
    /// On failure the previous records stay in place and the load state
    /// becomes `Failed`. Returns the number of records loaded.
    pub async fn load(&self) -> SyncResult<usize> {
        let family = self.inner.family;
        let cancel = &self.inner.cancel;
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let seq = self.inner.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.write(|s| {
            s.load_state = LoadState::Loading;
            true
        });
        tracing::info!(family = %family, seq, "Loading catalog");

        let result = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(family = %family, seq, "Load cancelled");
                return Err(SyncError::Cancelled);
            }
            result = self.inner.api.fetch_all() => result,
        };

        if self.inner.load_seq.load(Ordering::SeqCst) != seq {
            tracing::debug!(family = %family, seq, "Superseded by a newer load, result dropped");
            return match result {
                Ok(records) => Ok(records.len()),
                Err(source) => Err(SyncError::Load { family, source }),
            };
        }

        match result {
            Ok(records) => {
                let records = dedupe(family, records);
                let count = records.len();
                if !self.write(|s| {
                    s.records = Arc::new(records);
                    s.load_state = LoadState::Ready;
                    true
                }) {
                    return Err(SyncError::Cancelled);
                }
                tracing::info!(family = %family, count, "Catalog loaded");
                Ok(count)
            }
            Err(source) => {
                tracing::error!(family = %family, error = %source, "Catalog load failed");
                self.write(|s| {
                    s.load_state = LoadState::Failed {
                        message: source.to_string(),
                    };
                    true
                });
                Err(SyncError::Load { family, source })
            }
        }
    }

    /// Re-run [`CatalogStore::load`] after a failure
    pub async fn retry(&self) -> SyncResult<usize> {
        tracing::info!(family = %self.inner.family, "Retrying catalog load");
        self.load().await
    }

    /// Append a created record (replaces in place if the id is already present)
    pub fn apply_created(&self, record: R) -> bool {
        let family = self.inner.family;
        self.write(|s| {
            let records = Arc::make_mut(&mut s.records);
            match records.iter_mut().find(|r| r.id() == record.id()) {
                Some(existing) => {
                    tracing::warn!(family = %family, id = %record.id(), "Created record already present, replacing");
                    *existing = record;
                }
                None => {
                    tracing::debug!(family = %family, id = %record.id(), "Record created");
                    records.push(record);
                }
            }
            true
        })
    }

    /// Replace the record with the same id in place; unknown ids are ignored
    pub fn apply_updated(&self, record: R) -> bool {
        let family = self.inner.family;
        self.write(|s| {
            let Some(pos) = s.records.iter().position(|r| r.id() == record.id()) else {
                tracing::warn!(family = %family, id = %record.id(), "Updated record not in store");
                return false;
            };
            tracing::debug!(family = %family, id = %record.id(), "Record updated");
            Arc::make_mut(&mut s.records)[pos] = record;
            true
        })
    }

    /// Remove the record with `id`; unknown ids are a no-op
    pub fn apply_deleted(&self, id: &str) -> bool {
        let family = self.inner.family;
        self.write(|s| {
            let Some(pos) = s.records.iter().position(|r| r.id() == id) else {
                return false;
            };
            tracing::debug!(family = %family, id = %id, "Record deleted");
            Arc::make_mut(&mut s.records).remove(pos);
            true
        })
    }
}
