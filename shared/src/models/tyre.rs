//! Tyre Model

use super::serde_helpers::{media_list, text, text_list};
use crate::catalog::{Attribute, CatalogRecord, Facet, RecordDraft, TYRE_BRANDS, leading_int};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Vehicle class a tyre fits, derived from its section width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    Bike,
    Car,
    Other,
}

impl VehicleClass {
    /// Widths up to 175 mm are two-wheeler tyres, up to 215 mm passenger car tyres
    pub fn from_size(size: &str) -> Self {
        let width = size.split('/').next().and_then(leading_int);
        match width {
            Some(w) if w <= 175 => VehicleClass::Bike,
            Some(w) if w <= 215 => VehicleClass::Car,
            _ => VehicleClass::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::Bike => "Bike",
            VehicleClass::Car => "Car",
            VehicleClass::Other => "Other",
        }
    }
}

/// Tyre entity as stored by the remote catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tyre {
    #[serde(rename = "_id", alias = "id", deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub brand: String,
    #[serde(default, deserialize_with = "text")]
    pub model: String,
    #[serde(default, deserialize_with = "media_list")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "text")]
    pub price: String,
    #[serde(default, deserialize_with = "text")]
    pub original_price: String,
    #[serde(default, deserialize_with = "text")]
    pub discount: String,
    /// e.g. `195/65R15`
    #[serde(default, deserialize_with = "text")]
    pub size: String,
    #[serde(rename = "type", default, deserialize_with = "text")]
    pub tyre_type: String,
    #[serde(default, deserialize_with = "text")]
    pub pattern: String,
    #[serde(default, deserialize_with = "text")]
    pub compound: String,
    #[serde(default, deserialize_with = "text")]
    pub max_load: String,
    #[serde(default, deserialize_with = "text")]
    pub max_speed: String,
    #[serde(default, deserialize_with = "text_list")]
    pub offers: Vec<String>,
    #[serde(default, deserialize_with = "text_list")]
    pub features: Vec<String>,
}

impl Tyre {
    pub fn vehicle_class(&self) -> VehicleClass {
        VehicleClass::from_size(&self.size)
    }
}

impl CatalogRecord for Tyre {
    const BRANDS: &'static [&'static str] = TYRE_BRANDS;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Cow<'_, str> {
        match (self.brand.is_empty(), self.model.is_empty()) {
            (false, false) => Cow::Owned(format!("{} {}", self.brand, self.model)),
            (true, _) => Cow::Borrowed(&self.model),
            (false, true) => Cow::Borrowed(&self.brand),
        }
    }

    fn attribute(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::Price => &self.price,
            Attribute::Width => &self.size,
            Attribute::MaxLoad => &self.max_load,
            Attribute::MaxSpeed => &self.max_speed,
            _ => "",
        }
    }

    fn media(&self) -> &[String] {
        &self.images
    }

    fn matches_text(&self, needle: &str) -> bool {
        self.display_name().to_lowercase().contains(needle)
            || [&self.brand, &self.model, &self.size]
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }

    fn facet(&self, facet: Facet) -> Option<Cow<'_, str>> {
        match facet {
            Facet::VehicleClass => Some(Cow::Borrowed(self.vehicle_class().as_str())),
            Facet::TyreType if !self.tyre_type.is_empty() => Some(Cow::Borrowed(&self.tyre_type)),
            Facet::TyreType => None,
        }
    }
}

/// Tyre form state; offers and features are edited as comma-separated text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TyreDraft {
    pub brand: String,
    pub model: String,
    pub price: String,
    pub original_price: String,
    pub discount: String,
    pub size: String,
    pub tyre_type: String,
    pub pattern: String,
    pub compound: String,
    pub max_load: String,
    pub max_speed: String,
    pub offers: String,
    pub features: String,
}

/// Request body for create/update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TyrePayload {
    pub brand: String,
    pub model: String,
    pub images: Vec<String>,
    pub price: String,
    pub original_price: String,
    pub discount: String,
    pub size: String,
    #[serde(rename = "type")]
    pub tyre_type: String,
    pub pattern: String,
    pub compound: String,
    pub max_load: String,
    pub max_speed: String,
    pub offers: Vec<String>,
    pub features: Vec<String>,
}

fn split_comma_field(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl RecordDraft for TyreDraft {
    type Record = Tyre;
    type Payload = TyrePayload;

    fn from_record(record: &Tyre) -> Self {
        Self {
            brand: record.brand.clone(),
            model: record.model.clone(),
            price: record.price.clone(),
            original_price: record.original_price.clone(),
            discount: record.discount.clone(),
            size: record.size.clone(),
            tyre_type: record.tyre_type.clone(),
            pattern: record.pattern.clone(),
            compound: record.compound.clone(),
            max_load: record.max_load.clone(),
            max_speed: record.max_speed.clone(),
            offers: record.offers.join(", "),
            features: record.features.join(", "),
        }
    }

    fn validate(&self) -> AppResult<()> {
        let required = [
            ("brand", &self.brand),
            ("model", &self.model),
            ("price", &self.price),
            ("size", &self.size),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(AppError::required(*field).with_detail("form", "tyre")),
            None => Ok(()),
        }
    }

    fn build_payload(&self, media: Vec<String>) -> TyrePayload {
        TyrePayload {
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            images: media,
            price: self.price.clone(),
            original_price: self.original_price.clone(),
            discount: self.discount.clone(),
            size: self.size.trim().to_string(),
            tyre_type: self.tyre_type.clone(),
            pattern: self.pattern.clone(),
            compound: self.compound.clone(),
            max_load: self.max_load.clone(),
            max_speed: self.max_speed.clone(),
            offers: split_comma_field(&self.offers),
            features: split_comma_field(&self.features),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn tyre(size: &str, kind: &str) -> Tyre {
        serde_json::from_value(json!({
            "_id": "t1",
            "brand": "MRF",
            "model": "ZVTV",
            "size": size,
            "type": kind,
            "price": "₹5,400",
            "images": "https://cdn.example/zvtv.jpg",
            "offers": "Free alignment, Free fitting",
            "features": ["Radial", ""]
        }))
        .unwrap()
    }

    #[test]
    fn test_vehicle_class_from_width() {
        assert_eq!(VehicleClass::from_size("100/90-17"), VehicleClass::Bike);
        assert_eq!(VehicleClass::from_size("175/65R14"), VehicleClass::Bike);
        assert_eq!(VehicleClass::from_size("195/65R15"), VehicleClass::Car);
        assert_eq!(VehicleClass::from_size("215/60R16"), VehicleClass::Car);
        assert_eq!(VehicleClass::from_size("265/65R17"), VehicleClass::Other);
        assert_eq!(VehicleClass::from_size(""), VehicleClass::Other);
        assert_eq!(VehicleClass::from_size("R15"), VehicleClass::Other);
    }

    #[test]
    fn test_tyre_ingestion() {
        let t = tyre("195/65R15", "Tubeless");
        assert_eq!(t.display_name(), "MRF ZVTV");
        assert_eq!(t.media(), ["https://cdn.example/zvtv.jpg".to_string()]);
        assert_eq!(t.offers, vec!["Free alignment", "Free fitting"]);
        assert_eq!(t.features, vec!["Radial"]);
        assert_eq!(t.brand(), "MRF");
        assert_eq!(t.derived_price(), Decimal::from(5400));
        assert_eq!(t.numeric(Attribute::Width), Decimal::from(195));
    }

    #[test]
    fn test_tyre_text_match_includes_size() {
        let t = tyre("195/65R15", "Tubeless");
        assert!(t.matches_text("195/65"));
        assert!(t.matches_text("zvtv"));
        assert!(!t.matches_text("ceat"));
    }

    #[test]
    fn test_tyre_facets() {
        let t = tyre("90/90-17", "Tube Type");
        assert_eq!(t.facet(Facet::VehicleClass).as_deref(), Some("Bike"));
        assert_eq!(t.facet(Facet::TyreType).as_deref(), Some("Tube Type"));
        assert_eq!(tyre("90/90-17", "").facet(Facet::TyreType), None);
    }

    #[test]
    fn test_tyre_draft_round_trip_fields() {
        let t = tyre("195/65R15", "Tubeless");
        let draft = TyreDraft::from_record(&t);
        assert_eq!(draft.offers, "Free alignment, Free fitting");
        assert!(draft.validate().is_ok());

        let payload = draft.build_payload(t.images.clone());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "Tubeless");
        assert_eq!(json["maxLoad"], "");
        assert_eq!(json["offers"], json!(["Free alignment", "Free fitting"]));
    }

    #[test]
    fn test_tyre_draft_requires_size() {
        let draft = TyreDraft {
            brand: "CEAT".into(),
            model: "Milaze".into(),
            price: "₹4,000".into(),
            ..Default::default()
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(err.message, "size is required");
    }
}
