use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::{NA, SET_JOINER};
use crate::pipeline::processing::normalize::harddisk_range;
use crate::pipeline::processing::rules::{Color, Feature, GraphicsClass, OperatingSystem, Vocabulary};

/// A column decomposed into `(brand, model)`; either half may be `"NA"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Compound {
    pub brand: String,
    pub model: String,
}

impl Compound {
    pub fn new(brand: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
        }
    }

    pub fn na() -> Self {
        Self::new(NA, NA)
    }
}

impl Default for Compound {
    fn default() -> Self {
        Self::na()
    }
}

/// Source text of a listing, one field per input column.
///
/// Missing cells load as empty strings; the categorical stage replaces the
/// text columns with their case-folded, trimmed form (or `"NA"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawFields {
    pub brand: String,
    pub model: String,
    pub screen_size: String,
    pub color: String,
    pub harddisk: String,
    pub cpu: String,
    pub ram: String,
    pub os: String,
    pub special_features: String,
    pub graphics: String,
    pub graphics_coprocessor: String,
    pub cpu_speed: String,
    pub rating: String,
    pub price: String,
}

/// One laptop listing as it moves through the pipeline.
///
/// Classified fields start at their sentinel and are filled in by the stage
/// that owns them; `source` keeps the text those stages read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub brand: String,
    pub model: String,
    pub source: RawFields,

    pub screen_size_in: f64,
    pub harddisk_gb: f64,
    pub ram_gb: f64,
    pub cpu_speed_ghz: f64,
    pub rating: f64,
    pub price_dollar: f64,

    pub color: Color,
    pub os: OperatingSystem,
    pub special_features: BTreeSet<Feature>,
    pub graphics: GraphicsClass,
    pub gpu: Compound,
    pub cpu: Compound,
}

impl Listing {
    pub fn from_source(source: RawFields) -> Self {
        Self {
            brand: NA.to_string(),
            model: NA.to_string(),
            source,
            screen_size_in: 0.0,
            harddisk_gb: 0.0,
            ram_gb: 0.0,
            cpu_speed_ghz: 0.0,
            rating: 0.0,
            price_dollar: 0.0,
            color: Color::Na,
            os: OperatingSystem::Na,
            special_features: BTreeSet::new(),
            graphics: GraphicsClass::Na,
            gpu: Compound::na(),
            cpu: Compound::na(),
        }
    }

    /// Identity of the cleaned values, used for exact-row de-duplication.
    ///
    /// Raw source text is left out: two listings that clean to the same values
    /// are the same row.
    pub fn dedup_key(&self) -> ListingKey {
        ListingKey {
            text: [
                self.brand.clone(),
                self.model.clone(),
                self.cpu.brand.clone(),
                self.cpu.model.clone(),
                self.gpu.brand.clone(),
                self.gpu.model.clone(),
            ],
            numbers: [
                self.screen_size_in.to_bits(),
                self.harddisk_gb.to_bits(),
                self.ram_gb.to_bits(),
                self.cpu_speed_ghz.to_bits(),
                self.rating.to_bits(),
                self.price_dollar.to_bits(),
            ],
            color: self.color,
            os: self.os,
            special_features: self.special_features.clone(),
            graphics: self.graphics,
        }
    }

    /// Feature labels as a single cell: sorted, `", "`-joined, `"NA"` when empty.
    pub fn special_features_label(&self) -> String {
        if self.special_features.is_empty() {
            return NA.to_string();
        }
        self.special_features
            .iter()
            .map(|feature| feature.label())
            .collect::<Vec<_>>()
            .join(SET_JOINER)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingKey {
    text: [String; 6],
    numbers: [u64; 6],
    color: Color,
    os: OperatingSystem,
    special_features: BTreeSet<Feature>,
    graphics: GraphicsClass,
}

/// A row of the cleaned output table, in output column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    pub brand: String,
    pub model: String,
    pub screen_size_in: f64,
    pub color: String,
    pub harddisk_gb: i64,
    pub harddisk_range_gb: String,
    pub cpu_brand: String,
    pub cpu_model: String,
    pub ram_gb: i64,
    pub os: String,
    pub special_features: String,
    pub graphics: String,
    pub gpu_brand: String,
    pub gpu_model: String,
    pub rating: f64,
    pub price_dollar: f64,
}

impl From<&Listing> for OutputRow {
    fn from(listing: &Listing) -> Self {
        Self {
            brand: listing.brand.clone(),
            model: listing.model.clone(),
            screen_size_in: listing.screen_size_in,
            color: listing.color.label().to_string(),
            harddisk_gb: listing.harddisk_gb.round() as i64,
            harddisk_range_gb: harddisk_range(listing.harddisk_gb),
            cpu_brand: listing.cpu.brand.clone(),
            cpu_model: listing.cpu.model.clone(),
            ram_gb: listing.ram_gb.round() as i64,
            os: listing.os.label().to_string(),
            special_features: listing.special_features_label(),
            graphics: listing.graphics.label().to_string(),
            gpu_brand: listing.gpu.brand.clone(),
            gpu_model: listing.gpu.model.clone(),
            rating: listing.rating,
            price_dollar: listing.price_dollar,
        }
    }
}
