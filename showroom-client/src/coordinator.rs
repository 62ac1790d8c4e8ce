// showroom-client/src/coordinator.rs
// 管理员变更协调器 - 提交锁、媒体提交、写回存储

use crate::auth::{AuthorizationGate, Credential, require_admin};
use crate::config::ClientConfig;
use crate::error::{ClientError, SyncError, SyncResult};
use crate::media::{MediaUploader, PreviewRegistry};
use crate::remote::CatalogApi;
use crate::session::EditSession;
use crate::store::CatalogStore;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};
use shared::catalog::{CatalogRecord, ProductFamily, RecordDraft};
use shared::error::AppError;
use std::fmt;
use std::sync::Arc;

/// Kind of remote mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-record submit latch
///
/// A key is held from the moment a mutation starts until its guard drops,
/// whichever way the mutation ends.
#[derive(Debug, Clone, Default)]
pub struct SubmitLatch {
    in_flight: Arc<DashMap<String, MutationKind>>,
}

impl SubmitLatch {
    pub fn acquire(&self, key: &str, kind: MutationKind) -> SyncResult<LatchGuard> {
        match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(held) => {
                tracing::warn!(key = %key, requested = %kind, held = %held.get(), "Submit rejected, already in flight");
                Err(SyncError::SubmitInProgress {
                    key: key.to_string(),
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(kind);
                Ok(LatchGuard {
                    in_flight: Arc::clone(&self.in_flight),
                    key: key.to_string(),
                })
            }
        }
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.in_flight.contains_key(key)
    }
}

/// Releases a latch key on drop
#[derive(Debug)]
pub struct LatchGuard {
    in_flight: Arc<DashMap<String, MutationKind>>,
    key: String,
}

impl Drop for LatchGuard {
    fn drop(&mut self) {
        self.in_flight.remove(&self.key);
    }
}

/// Confirmed intent to delete one record
///
/// Produced by [`MutationCoordinator::request_delete`]; reusable if the
/// delete call fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    id: String,
    display_name: String,
    family: ProductFamily,
}

impl DeleteConfirmation {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name to show in the "are you sure" prompt
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn family(&self) -> ProductFamily {
        self.family
    }
}

/// Orchestrates create/update/delete for one record family
///
/// Writes are pessimistic: the store changes only after the remote call
/// succeeds.
pub struct MutationCoordinator<D: RecordDraft> {
    api: Arc<dyn CatalogApi<D::Record>>,
    uploader: Arc<dyn MediaUploader>,
    store: CatalogStore<D::Record>,
    gate: Arc<dyn AuthorizationGate>,
    latch: SubmitLatch,
    previews: PreviewRegistry,
    max_upload_bytes: u64,
}

impl<D: RecordDraft> MutationCoordinator<D> {
    pub fn new(
        api: Arc<dyn CatalogApi<D::Record>>,
        uploader: Arc<dyn MediaUploader>,
        store: CatalogStore<D::Record>,
        gate: Arc<dyn AuthorizationGate>,
    ) -> Self {
        Self {
            api,
            uploader,
            store,
            gate,
            latch: SubmitLatch::default(),
            previews: PreviewRegistry::new(),
            max_upload_bytes: crate::config::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Build with the gate and upload limit taken from `config`
    pub fn from_config(
        config: &ClientConfig,
        api: Arc<dyn CatalogApi<D::Record>>,
        uploader: Arc<dyn MediaUploader>,
        store: CatalogStore<D::Record>,
    ) -> Self {
        Self::new(api, uploader, store, config.gate()).with_max_upload_bytes(config.max_upload_bytes)
    }

    pub fn with_max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Share a preview registry (e.g. to observe live previews)
    pub fn with_preview_registry(mut self, registry: PreviewRegistry) -> Self {
        self.previews = registry;
        self
    }

    pub fn store(&self) -> &CatalogStore<D::Record> {
        &self.store
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    fn family(&self) -> ProductFamily {
        self.store.family()
    }

    /// Whether a mutation is in flight for `key` (a record id or session key)
    pub fn is_submitting(&self, key: &str) -> bool {
        self.latch.is_held(key)
    }

    /// Open an add form
    pub fn begin_create(&self) -> SyncResult<EditSession<D>> {
        if !self.gate.is_admin() {
            return Err(SyncError::AdminRequired);
        }
        Ok(EditSession::create(self.previews.clone(), self.max_upload_bytes))
    }

    /// Open an edit form for a record in the store
    pub fn begin_edit(&self, id: &str) -> SyncResult<EditSession<D>> {
        if !self.gate.is_admin() {
            return Err(SyncError::AdminRequired);
        }
        let record = self.store.get(id).ok_or_else(|| {
            SyncError::Validation(AppError::not_found(self.family().as_str()).with_detail("id", id))
        })?;
        Ok(EditSession::edit(&record, self.previews.clone(), self.max_upload_bytes))
    }

    /// Submit a session: create for new records, update otherwise
    ///
    /// On error the session is left intact for a retry; on success the
    /// caller should drop it.
    pub async fn submit(&self, session: &mut EditSession<D>) -> SyncResult<D::Record> {
        if session.is_new() {
            self.submit_create(session).await
        } else {
            self.submit_update(session).await
        }
    }

    pub async fn submit_create(&self, session: &mut EditSession<D>) -> SyncResult<D::Record> {
        let family = self.family();
        let credential = require_admin(self.gate.as_ref())?;
        let _guard = self.latch.acquire(session.key(), MutationKind::Create)?;

        let payload = self.prepare(session, &credential).await?;
        tracing::info!(family = %family, key = %session.key(), "Creating record");

        let record = self
            .api
            .create(&payload, &credential)
            .await
            .map_err(|source| self.rejected(MutationKind::Create, source))?;

        tracing::info!(family = %family, id = %record.id(), "Record created");
        self.store.apply_created(record.clone());
        Ok(record)
    }

    pub async fn submit_update(&self, session: &mut EditSession<D>) -> SyncResult<D::Record> {
        let family = self.family();
        let id = session
            .target_id()
            .ok_or_else(|| SyncError::Validation(AppError::validation("no record to update")))?
            .to_string();
        let credential = require_admin(self.gate.as_ref())?;
        let _guard = self.latch.acquire(&id, MutationKind::Update)?;

        let payload = self.prepare(session, &credential).await?;
        tracing::info!(family = %family, id = %id, "Updating record");

        let record = self
            .api
            .update(&id, &payload, &credential)
            .await
            .map_err(|source| self.rejected(MutationKind::Update, source))?;

        tracing::info!(family = %family, id = %record.id(), "Record updated");
        self.store.apply_updated(record.clone());
        Ok(record)
    }

    /// Validate, commit media, then build the request body
    async fn prepare(
        &self,
        session: &mut EditSession<D>,
        credential: &Credential,
    ) -> SyncResult<serde_json::Value> {
        session.validate()?;
        let media = session
            .media_mut()
            .commit(self.uploader.as_ref(), credential)
            .await?;
        let payload = session.draft().build_payload(media);
        serde_json::to_value(&payload).map_err(|e| {
            let kind = if session.is_new() {
                MutationKind::Create
            } else {
                MutationKind::Update
            };
            self.rejected(kind, ClientError::Serialization(e))
        })
    }

    fn rejected(&self, action: MutationKind, source: ClientError) -> SyncError {
        tracing::error!(family = %self.family(), action = %action, error = %source, "Mutation failed");
        SyncError::Mutation {
            action,
            family: self.family(),
            source,
        }
    }

    /// First step of a delete: resolve the record to confirm
    pub fn request_delete(&self, id: &str) -> SyncResult<DeleteConfirmation> {
        if !self.gate.is_admin() {
            return Err(SyncError::AdminRequired);
        }
        let record = self.store.get(id).ok_or_else(|| {
            SyncError::Validation(AppError::not_found(self.family().as_str()).with_detail("id", id))
        })?;
        Ok(DeleteConfirmation {
            id: record.id().to_string(),
            display_name: record.display_name().into_owned(),
            family: self.family(),
        })
    }

    /// Second step of a delete: perform the remote call and remove locally
    pub async fn confirm_delete(&self, confirmation: &DeleteConfirmation) -> SyncResult<()> {
        let credential = require_admin(self.gate.as_ref())?;
        let _guard = self.latch.acquire(confirmation.id(), MutationKind::Delete)?;

        tracing::info!(family = %confirmation.family, id = %confirmation.id, "Deleting record");
        self.api
            .delete(confirmation.id(), &credential)
            .await
            .map_err(|source| self.rejected(MutationKind::Delete, source))?;

        self.store.apply_deleted(confirmation.id());
        tracing::info!(family = %confirmation.family, id = %confirmation.id, "Record deleted");
        Ok(())
    }
}
