//! Vehicle (two-wheeler) Model

use super::serde_helpers::{default_priority, media_list, priority, text, text_list};
use crate::catalog::{Attribute, CatalogRecord, RecordDraft, VEHICLE_BRANDS, non_blank};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;

/// Vehicle specification block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSpecs {
    #[serde(default, deserialize_with = "text")]
    pub engine: String,
    #[serde(default, deserialize_with = "text")]
    pub mileage: String,
    #[serde(default, deserialize_with = "text")]
    pub max_power: String,
    #[serde(default, deserialize_with = "text")]
    pub max_torque: String,
    #[serde(default, deserialize_with = "text")]
    pub fuel_tank: String,
}

/// Financing plan shown on the offer sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmiOption {
    #[serde(default, alias = "tenure", deserialize_with = "text")]
    pub duration: String,
    #[serde(default, deserialize_with = "text")]
    pub amount: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub popular: bool,
}

impl EmiOption {
    pub fn new(duration: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            duration: duration.into(),
            amount: amount.into(),
            popular: false,
        }
    }

    /// Both duration and amount filled in
    pub fn is_complete(&self) -> bool {
        !self.duration.trim().is_empty() && !self.amount.trim().is_empty()
    }
}

/// Vehicle entity as stored by the remote catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "_id", alias = "id", deserialize_with = "text")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    /// Ex-showroom / original price
    #[serde(default, deserialize_with = "text")]
    pub price_range: String,
    /// Price shown to customers
    #[serde(default, deserialize_with = "text")]
    pub final_price: String,
    #[serde(default, deserialize_with = "text")]
    pub discount: String,
    #[serde(default, deserialize_with = "text")]
    pub emi_starting_from: String,
    #[serde(default, deserialize_with = "media_list")]
    pub image: Vec<String>,
    #[serde(default = "default_priority", deserialize_with = "priority")]
    pub priority: i64,
    #[serde(default, deserialize_with = "nullable_specs")]
    pub specs: VehicleSpecs,
    #[serde(default, deserialize_with = "text_list")]
    pub special_offers: Vec<String>,
    #[serde(default, deserialize_with = "emi_options")]
    pub emi_options: Vec<EmiOption>,
    #[serde(default, deserialize_with = "text_list")]
    pub available_colors: Vec<String>,
}

fn nullable_specs<'de, D>(deserializer: D) -> Result<VehicleSpecs, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<VehicleSpecs>::deserialize(deserializer)?.unwrap_or_default())
}

fn emi_options<'de, D>(deserializer: D) -> Result<Vec<EmiOption>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<EmiOption>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter(EmiOption::is_complete)
        .collect())
}

impl CatalogRecord for Vehicle {
    const BRANDS: &'static [&'static str] = VEHICLE_BRANDS;

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn attribute(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::Price => &self.final_price,
            Attribute::Engine => &self.specs.engine,
            Attribute::Mileage => &self.specs.mileage,
            Attribute::MaxPower => &self.specs.max_power,
            Attribute::MaxTorque => &self.specs.max_torque,
            Attribute::FuelTank => &self.specs.fuel_tank,
            Attribute::Width | Attribute::MaxLoad | Attribute::MaxSpeed => "",
        }
    }

    fn media(&self) -> &[String] {
        &self.image
    }
}

/// Vehicle form state
///
/// Repeatable fields (offers, colors, EMI rows) keep blank rows while the
/// form is open; they are cleaned in [`VehicleDraft::build_payload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleDraft {
    pub name: String,
    pub price_range: String,
    pub final_price: String,
    pub discount: String,
    pub emi_starting_from: String,
    /// Raw priority input; non-numeric falls back to 1
    pub priority: String,
    pub specs: VehicleSpecs,
    pub special_offers: Vec<String>,
    pub emi_options: Vec<EmiOption>,
    pub available_colors: Vec<String>,
}

impl Default for VehicleDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            price_range: String::new(),
            final_price: String::new(),
            discount: String::new(),
            emi_starting_from: String::new(),
            priority: default_priority().to_string(),
            specs: VehicleSpecs::default(),
            special_offers: vec![String::new()],
            emi_options: vec![EmiOption::default()],
            available_colors: vec![String::new()],
        }
    }
}

/// Request body for create/update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePayload {
    pub name: String,
    pub price_range: String,
    pub final_price: String,
    pub discount: String,
    pub emi_starting_from: String,
    pub image: Vec<String>,
    pub priority: i64,
    pub specs: VehicleSpecs,
    pub special_offers: Vec<String>,
    pub emi_options: Vec<EmiOption>,
    pub available_colors: Vec<String>,
}

fn or_blank_row<T: Clone + Default>(values: &[T]) -> Vec<T> {
    if values.is_empty() {
        vec![T::default()]
    } else {
        values.to_vec()
    }
}

impl RecordDraft for VehicleDraft {
    type Record = Vehicle;
    type Payload = VehiclePayload;

    fn from_record(record: &Vehicle) -> Self {
        Self {
            name: record.name.clone(),
            price_range: record.price_range.clone(),
            final_price: record.final_price.clone(),
            discount: record.discount.clone(),
            emi_starting_from: record.emi_starting_from.clone(),
            priority: record.priority.to_string(),
            specs: record.specs.clone(),
            special_offers: or_blank_row(&record.special_offers),
            emi_options: or_blank_row(&record.emi_options),
            available_colors: or_blank_row(&record.available_colors),
        }
    }

    fn validate(&self) -> AppResult<()> {
        let required = [
            ("name", &self.name),
            ("priceRange", &self.price_range),
            ("finalPrice", &self.final_price),
            ("discount", &self.discount),
            ("emiStartingFrom", &self.emi_starting_from),
            ("engine", &self.specs.engine),
            ("mileage", &self.specs.mileage),
            ("maxPower", &self.specs.max_power),
            ("fuelTank", &self.specs.fuel_tank),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(AppError::required(*field).with_detail("form", "vehicle")),
            None => Ok(()),
        }
    }

    fn build_payload(&self, media: Vec<String>) -> VehiclePayload {
        VehiclePayload {
            name: self.name.trim().to_string(),
            price_range: self.price_range.clone(),
            final_price: self.final_price.clone(),
            discount: self.discount.clone(),
            emi_starting_from: self.emi_starting_from.clone(),
            image: media,
            priority: self.priority.trim().parse().unwrap_or(default_priority()),
            specs: self.specs.clone(),
            special_offers: non_blank(&self.special_offers),
            emi_options: self
                .emi_options
                .iter()
                .filter(|o| o.is_complete())
                .cloned()
                .collect(),
            available_colors: non_blank(&self.available_colors),
        }
    }
}
