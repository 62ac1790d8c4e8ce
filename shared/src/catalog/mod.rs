//! Catalog record abstraction
//!
//! Vehicles, tyres and promotions all flow through the same store, filter
//! and mutation machinery. [`CatalogRecord`] is the read side of that
//! contract and [`RecordDraft`] the write side (form values → request body).

pub mod brand;
pub mod criteria;
pub mod extract;

use crate::error::AppResult;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Debug;

pub use brand::{OTHER_BRAND, TYRE_BRANDS, VEHICLE_BRANDS, classify_brand};
pub use criteria::{DEFAULT_PAGE_SIZE, DisplayCutoff, FilterCriteria, Range};
pub use extract::{extract_number, leading_int, parse_bound};

/// Remote collection a record family lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductFamily {
    Vehicles,
    Tyres,
    /// Promotional offers
    Offers,
    /// Hero carousel slides
    Slides,
}

impl ProductFamily {
    /// Path segment under `/api/`
    pub fn path(&self) -> &'static str {
        match self {
            ProductFamily::Vehicles => "bikes",
            ProductFamily::Tyres => "tyres",
            ProductFamily::Offers => "offers",
            ProductFamily::Slides => "carousal",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductFamily::Vehicles => "vehicles",
            ProductFamily::Tyres => "tyres",
            ProductFamily::Offers => "offers",
            ProductFamily::Slides => "slides",
        }
    }
}

impl std::fmt::Display for ProductFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filterable numeric attributes
///
/// Each record family exposes the subset that applies to it; the rest read
/// as an empty display string (and therefore extract to zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Price,
    Engine,
    Mileage,
    MaxPower,
    MaxTorque,
    FuelTank,
    /// Tyre section width, the leading number of the size
    Width,
    MaxLoad,
    MaxSpeed,
}

/// Categorical filters with an implicit "All" value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    /// Bike / Car / Other, derived from tyre width
    VehicleClass,
    /// Tyre construction type (Tubeless, Tube Type, ...)
    TyreType,
}

/// A record held by the catalog store
pub trait CatalogRecord:
    Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Brand vocabulary used by [`CatalogRecord::brand`]
    const BRANDS: &'static [&'static str];

    /// Server-assigned identity
    fn id(&self) -> &str;

    fn display_name(&self) -> Cow<'_, str>;

    /// Display string for an attribute; empty when the family has no such attribute
    fn attribute(&self, attribute: Attribute) -> &str;

    /// Committed media URLs in display order
    fn media(&self) -> &[String];

    /// Case-insensitive search against an already lower-cased needle
    fn matches_text(&self, needle: &str) -> bool {
        self.display_name().to_lowercase().contains(needle)
    }

    /// Value of a categorical facet, if the family has it
    fn facet(&self, _facet: Facet) -> Option<Cow<'_, str>> {
        None
    }

    fn price_display(&self) -> &str {
        self.attribute(Attribute::Price)
    }

    /// Numeric price used for filtering
    fn derived_price(&self) -> Decimal {
        extract_number(self.price_display())
    }

    /// Numeric value of an attribute used for range filtering
    fn numeric(&self, attribute: Attribute) -> Decimal {
        extract_number(self.attribute(attribute))
    }

    /// Brand derived from the display name
    fn brand(&self) -> &'static str {
        classify_brand(Self::BRANDS, &self.display_name())
    }
}

/// Form values for creating or updating a record
pub trait RecordDraft: Clone + Debug + Default + Send + Sync + 'static {
    type Record: CatalogRecord;
    /// Request body sent to the remote catalog
    type Payload: Serialize + Debug + Send + Sync + 'static;

    /// Upper bound on media entries, if the record shape has one
    const MAX_MEDIA: Option<usize> = None;

    /// Prefill from an existing record (media is handled by the edit session)
    fn from_record(record: &Self::Record) -> Self;

    /// Check required fields
    fn validate(&self) -> AppResult<()>;

    /// Build the request body from the fields and the fully committed media list
    fn build_payload(&self, media: Vec<String>) -> Self::Payload;
}

/// Keep non-blank, trimmed entries of a repeatable form field
pub fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_paths() {
        assert_eq!(ProductFamily::Vehicles.path(), "bikes");
        assert_eq!(ProductFamily::Tyres.path(), "tyres");
        assert_eq!(ProductFamily::Slides.path(), "carousal");
        assert_eq!(ProductFamily::Offers.to_string(), "offers");
    }

    #[test]
    fn test_non_blank() {
        let values = vec![" Red ".to_string(), "".to_string(), "  ".to_string(), "Blue".to_string()];
        assert_eq!(non_blank(&values), vec!["Red", "Blue"]);
    }
}
