//! Promotion Model (offers and hero carousel slides)

use super::serde_helpers::{media_list, text};
use crate::catalog::{Attribute, CatalogRecord, RecordDraft};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A promotional banner; carries at most one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    #[serde(rename = "_id", alias = "id", deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub title: String,
    #[serde(default, deserialize_with = "text")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "text")]
    pub description: String,
    #[serde(default, deserialize_with = "media_list")]
    pub image: Vec<String>,
}

impl CatalogRecord for Promotion {
    const BRANDS: &'static [&'static str] = &[];

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.title)
    }

    fn attribute(&self, _attribute: Attribute) -> &str {
        ""
    }

    fn media(&self) -> &[String] {
        &self.image
    }

    fn matches_text(&self, needle: &str) -> bool {
        [&self.title, &self.subtitle, &self.description]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionDraft {
    pub title: String,
    pub subtitle: String,
    pub description: String,
}

/// Request body; the image is a single URL on the wire
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromotionPayload {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image: String,
}

impl RecordDraft for PromotionDraft {
    type Record = Promotion;
    type Payload = PromotionPayload;

    const MAX_MEDIA: Option<usize> = Some(1);

    fn from_record(record: &Promotion) -> Self {
        Self {
            title: record.title.clone(),
            subtitle: record.subtitle.clone(),
            description: record.description.clone(),
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::required("title").with_detail("form", "promotion"));
        }
        Ok(())
    }

    fn build_payload(&self, media: Vec<String>) -> PromotionPayload {
        PromotionPayload {
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.clone(),
            description: self.description.clone(),
            image: media.into_iter().next().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_promotion_single_image() {
        let p: Promotion = serde_json::from_value(json!({
            "_id": "o1",
            "title": "Monsoon Sale",
            "image": "https://cdn.example/upload/w_1200,h_400/banner.jpg"
        }))
        .unwrap();
        assert_eq!(p.media().len(), 1);
        assert_eq!(p.brand(), "Other");
        assert!(p.matches_text("monsoon"));
    }

    #[test]
    fn test_promotion_payload_flattens_image() {
        let draft = PromotionDraft {
            title: "Festive offer".into(),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());
        let payload = draft.build_payload(vec!["https://cdn.example/f.jpg".into()]);
        assert_eq!(payload.image, "https://cdn.example/f.jpg");
        assert_eq!(draft.build_payload(Vec::new()).image, "");
        assert_eq!(PromotionDraft::MAX_MEDIA, Some(1));
    }
}
