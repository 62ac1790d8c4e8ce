//! Edit session: the working copy behind an add/edit form

use crate::error::{SyncError, SyncResult};
use crate::media::{MediaLimits, MediaPipeline, PreviewRegistry};
use shared::catalog::{CatalogRecord, RecordDraft};
use shared::error::{AppError, ErrorCode};
use uuid::Uuid;

/// Form draft plus media state for one record
///
/// Dropping the session releases every local preview it still holds.
#[derive(Debug)]
pub struct EditSession<D: RecordDraft> {
    /// Submit latch key: the record id, or a per-session key for creates
    key: String,
    /// Record being edited; `None` for a create
    target: Option<String>,
    draft: D,
    media: MediaPipeline,
}

impl<D: RecordDraft> EditSession<D> {
    /// Blank session for a new record
    pub fn create(registry: PreviewRegistry, max_bytes: u64) -> Self {
        Self {
            key: format!("session:{}", Uuid::new_v4()),
            target: None,
            draft: D::default(),
            media: MediaPipeline::new(registry, Vec::new(), Self::limits(max_bytes)),
        }
    }

    /// Session prefilled from an existing record
    pub fn edit(record: &D::Record, registry: PreviewRegistry, max_bytes: u64) -> Self {
        Self {
            key: record.id().to_string(),
            target: Some(record.id().to_string()),
            draft: D::from_record(record),
            media: MediaPipeline::new(registry, record.media().to_vec(), Self::limits(max_bytes)),
        }
    }

    fn limits(max_bytes: u64) -> MediaLimits {
        MediaLimits {
            max_bytes,
            max_entries: D::MAX_MEDIA,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn target_id(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_new(&self) -> bool {
        self.target.is_none()
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn media(&self) -> &MediaPipeline {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut MediaPipeline {
        &mut self.media
    }

    /// Required fields filled and at least one media entry present
    pub fn validate(&self) -> SyncResult<()> {
        self.draft.validate().map_err(SyncError::Validation)?;
        if self.media.is_empty() {
            return Err(SyncError::Validation(AppError::new(ErrorCode::MediaRequired)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::LocalFile;
    use serde_json::json;
    use shared::models::{PromotionDraft, Tyre, TyreDraft};

    fn tyre() -> Tyre {
        serde_json::from_value(json!({
            "_id": "t-42",
            "brand": "CEAT",
            "model": "Milaze",
            "price": "₹4,100",
            "size": "165/80R14",
            "images": ["https://cdn.test/m1.jpg", "https://cdn.test/m2.jpg"]
        }))
        .unwrap()
    }

    #[test]
    fn test_edit_session_prefills() {
        let session: EditSession<TyreDraft> =
            EditSession::edit(&tyre(), PreviewRegistry::new(), 1024);
        assert_eq!(session.key(), "t-42");
        assert_eq!(session.target_id(), Some("t-42"));
        assert!(!session.is_new());
        assert_eq!(session.draft().model, "Milaze");
        assert_eq!(
            session.media().display_urls(),
            vec!["https://cdn.test/m1.jpg", "https://cdn.test/m2.jpg"]
        );
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_create_sessions_have_distinct_keys() {
        let a: EditSession<TyreDraft> = EditSession::create(PreviewRegistry::new(), 1024);
        let b: EditSession<TyreDraft> = EditSession::create(PreviewRegistry::new(), 1024);
        assert!(a.is_new());
        assert!(a.key().starts_with("session:"));
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_validate_requires_media() {
        let mut session: EditSession<TyreDraft> =
            EditSession::create(PreviewRegistry::new(), 1024);
        {
            let draft = session.draft_mut();
            draft.brand = "MRF".into();
            draft.model = "ZLX".into();
            draft.price = "₹2,000".into();
            draft.size = "90/100-10".into();
        }
        let err = session.validate().unwrap_err();
        assert_eq!(err.code(), ErrorCode::MediaRequired);

        session.media_mut().select(LocalFile::new("zlx.jpg", vec![1, 2, 3])).unwrap();
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_missing_field_first() {
        let session: EditSession<TyreDraft> = EditSession::create(PreviewRegistry::new(), 1024);
        let err = session.validate().unwrap_err();
        assert_eq!(err.code(), ErrorCode::RequiredField);
    }

    #[test]
    fn test_promotion_session_caps_media() {
        let mut session: EditSession<PromotionDraft> =
            EditSession::create(PreviewRegistry::new(), 1024);
        session.media_mut().select(LocalFile::new("a.jpg", vec![1])).unwrap();
        assert!(session.media_mut().select(LocalFile::new("b.jpg", vec![1])).is_err());
    }

    #[test]
    fn test_dropping_session_revokes_previews() {
        let registry = PreviewRegistry::new();
        let mut session: EditSession<TyreDraft> = EditSession::edit(&tyre(), registry.clone(), 1024);
        session.media_mut().select(LocalFile::new("new.jpg", vec![1])).unwrap();
        assert_eq!(registry.live_count(), 1);
        drop(session);
        assert_eq!(registry.live_count(), 0);
    }
}
