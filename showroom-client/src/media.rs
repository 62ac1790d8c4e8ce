//! Media upload pipeline
//!
//! Media for a record being edited lives here as an ordered list of
//! [`MediaEntry`] values. Selecting a file only creates a local preview;
//! nothing touches the network until [`MediaPipeline::commit`] runs at
//! submit time, and that step is all-or-nothing.

use crate::auth::Credential;
use crate::error::{ClientResult, SyncError, SyncResult};
use crate::http::NetworkHttpClient;
use async_trait::async_trait;
use dashmap::DashMap;
use futures::future::join_all;
use shared::error::{AppError, ErrorCode};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// A file picked from local storage, held in memory until upload
#[derive(Clone)]
pub struct LocalFile {
    name: String,
    content_type: String,
    data: Arc<[u8]>,
}

impl LocalFile {
    /// Content type is guessed from the file name
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let content_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            name,
            content_type,
            data: Arc::from(data.into()),
        }
    }

    /// Override the guessed content type (e.g. from a file picker)
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        Ok(Self::new(name, data))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Registry of live local previews
///
/// Every [`PreviewHandle`] is registered here while alive and removed when
/// dropped, so `live_count() == 0` means nothing leaked.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<DashMap<Uuid, String>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preview for a selected file
    pub fn register(&self, file: &LocalFile) -> PreviewHandle {
        let id = Uuid::new_v4();
        let url = format!("preview://{}/{}", id, file.name());
        self.live.insert(id, url.clone());
        PreviewHandle {
            id,
            url,
            registry: self.clone(),
        }
    }

    pub fn is_live(&self, id: &Uuid) -> bool {
        self.live.contains_key(id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    fn revoke(&self, id: &Uuid) {
        if self.live.remove(id).is_some() {
            tracing::trace!(preview = %id, "Preview revoked");
        }
    }
}

/// Owned local preview; revoked on drop
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    url: String,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.revoke(&self.id);
    }
}

/// One media slot of a record being edited
#[derive(Debug)]
pub enum MediaEntry {
    /// Already persisted
    Committed { url: String },
    /// Selected locally, not uploaded yet
    Pending { file: LocalFile, preview: PreviewHandle },
}

impl MediaEntry {
    pub fn is_pending(&self) -> bool {
        matches!(self, MediaEntry::Pending { .. })
    }

    /// URL to render: the committed URL or the local preview
    pub fn display_url(&self) -> &str {
        match self {
            MediaEntry::Committed { url } => url,
            MediaEntry::Pending { preview, .. } => preview.url(),
        }
    }
}

/// Upload one file, returning its permanent URL
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, file: &LocalFile, credential: &Credential) -> ClientResult<String>;
}

/// Uploader backed by the multipart upload endpoint
#[derive(Debug, Clone)]
pub struct HttpMediaUploader {
    http: NetworkHttpClient,
    path: String,
}

impl HttpMediaUploader {
    pub fn new(http: NetworkHttpClient, path: impl Into<String>) -> Self {
        Self {
            http,
            path: path.into(),
        }
    }
}

#[async_trait]
impl MediaUploader for HttpMediaUploader {
    async fn upload(&self, file: &LocalFile, credential: &Credential) -> ClientResult<String> {
        let response = self.http.upload(&self.path, file, Some(credential)).await?;
        tracing::debug!(file = %file.name(), url = %response.url, "Image uploaded");
        Ok(response.url)
    }
}

/// Selection limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaLimits {
    pub max_bytes: u64,
    /// Upper bound on entries; `None` = unlimited
    pub max_entries: Option<usize>,
}

impl Default for MediaLimits {
    fn default() -> Self {
        Self {
            max_bytes: crate::config::DEFAULT_MAX_UPLOAD_BYTES,
            max_entries: None,
        }
    }
}

/// Ordered committed + pending media for one edit session
#[derive(Debug)]
pub struct MediaPipeline {
    entries: Vec<MediaEntry>,
    registry: PreviewRegistry,
    limits: MediaLimits,
}

impl MediaPipeline {
    /// Start from a record's committed URLs
    pub fn new(registry: PreviewRegistry, committed: Vec<String>, limits: MediaLimits) -> Self {
        Self {
            entries: committed
                .into_iter()
                .map(|url| MediaEntry::Committed { url })
                .collect(),
            registry,
            limits,
        }
    }

    pub fn entries(&self) -> &[MediaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pending()).count()
    }

    pub fn display_urls(&self) -> Vec<&str> {
        self.entries.iter().map(MediaEntry::display_url).collect()
    }

    /// All URLs, if nothing is pending
    pub fn committed_urls(&self) -> Option<Vec<String>> {
        self.entries
            .iter()
            .map(|entry| match entry {
                MediaEntry::Committed { url } => Some(url.clone()),
                MediaEntry::Pending { .. } => None,
            })
            .collect()
    }

    fn check(&self, file: &LocalFile) -> Result<(), AppError> {
        if !file.content_type().starts_with("image/") {
            return Err(AppError::with_message(
                ErrorCode::UnsupportedMediaType,
                format!("{} is not an image", file.name()),
            )
            .with_detail("file", file.name())
            .with_detail("content_type", file.content_type()));
        }
        if file.size() == 0 {
            return Err(AppError::validation(format!("{} is empty", file.name()))
                .with_detail("file", file.name()));
        }
        if file.size() > self.limits.max_bytes {
            return Err(AppError::new(ErrorCode::FileTooLarge)
                .with_detail("file", file.name())
                .with_detail("size", file.size())
                .with_detail("max_size", self.limits.max_bytes));
        }
        if let Some(max) = self.limits.max_entries
            && self.entries.len() >= max
        {
            return Err(AppError::validation(format!("At most {} image(s) allowed", max))
                .with_detail("max_entries", max));
        }
        Ok(())
    }

    /// Phase 1: append a pending entry; returns its position
    pub fn select(&mut self, file: LocalFile) -> SyncResult<usize> {
        self.check(&file).map_err(SyncError::Validation)?;
        let preview = self.registry.register(&file);
        tracing::debug!(file = %file.name(), size = file.size(), preview = %preview.id(), "Media selected");
        self.entries.push(MediaEntry::Pending { file, preview });
        Ok(self.entries.len() - 1)
    }

    /// Drop an entry; a pending entry's preview is revoked with it
    pub fn remove(&mut self, index: usize) -> SyncResult<()> {
        if index >= self.entries.len() {
            return Err(out_of_range(index, self.entries.len()));
        }
        let removed = self.entries.remove(index);
        tracing::debug!(index, pending = removed.is_pending(), "Media removed");
        Ok(())
    }

    /// Reorder: move the entry at `from` to position `to`
    pub fn move_entry(&mut self, from: usize, to: usize) -> SyncResult<()> {
        let len = self.entries.len();
        if from >= len {
            return Err(out_of_range(from, len));
        }
        if to >= len {
            return Err(out_of_range(to, len));
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }

    /// Phase 2: upload every pending file and resolve the full URL list
    ///
    /// Uploads run concurrently and are all awaited before deciding. On any
    /// failure the entries are left exactly as they were; on success every
    /// pending entry becomes committed at its original position.
    pub async fn commit(
        &mut self,
        uploader: &dyn MediaUploader,
        credential: &Credential,
    ) -> SyncResult<Vec<String>> {
        let pending: Vec<(usize, &LocalFile)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| match entry {
                MediaEntry::Pending { file, .. } => Some((i, file)),
                MediaEntry::Committed { .. } => None,
            })
            .collect();

        let total = pending.len();
        if total > 0 {
            tracing::info!(pending = total, "Uploading media");
        }

        let results = join_all(
            pending
                .iter()
                .map(|(_, file)| uploader.upload(file, credential)),
        )
        .await;

        let mut uploaded = Vec::with_capacity(total);
        let mut first_failure = None;
        let mut failed = 0;
        for ((index, file), result) in pending.iter().zip(results) {
            match result {
                Ok(url) => uploaded.push((*index, url)),
                Err(e) => {
                    tracing::warn!(file = %file.name(), error = %e, "Media upload failed");
                    failed += 1;
                    if first_failure.is_none() {
                        first_failure = Some((file.name().to_string(), e));
                    }
                }
            }
        }

        if let Some((file, source)) = first_failure {
            return Err(SyncError::Upload {
                file,
                failed,
                total,
                source,
            });
        }

        for (index, url) in uploaded {
            self.entries[index] = MediaEntry::Committed { url };
        }

        self.committed_urls()
            .ok_or_else(|| SyncError::Validation(AppError::internal("media left pending after commit")))
    }
}

fn out_of_range(index: usize, len: usize) -> SyncError {
    SyncError::Validation(
        AppError::new(ErrorCode::MediaIndexOutOfRange)
            .with_detail("index", index)
            .with_detail("len", len),
    )
}
