mod translation;
mod update;

pub use translation::{Locale, TranslationRecord};
pub use update::{field_map, ListingField, TranslationField, UpdateRequest};

use crate::error::{CatalogError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Property category accepted on canonical listings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Apartment,
    House,
    Villa,
    Land,
    Farm,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Apartment,
        Category::House,
        Category::Villa,
        Category::Land,
        Category::Farm,
    ];

    /// Localized spellings a translation record may carry instead of the
    /// canonical name. `شفة` is a legacy misspelling kept for stored records.
    const LOCALIZED_ALIASES: [&'static str; 3] = ["بيت", "شقة", "شفة"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Apartment => "apartment",
            Category::House => "house",
            Category::Villa => "villa",
            Category::Land => "land",
            Category::Farm => "farm",
        }
    }

    /// Category check for translation records: canonical names plus aliases.
    pub fn is_valid_translation(value: &str) -> bool {
        value.parse::<Category>().is_ok() || Self::LOCALIZED_ALIASES.contains(&value)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| CatalogError::validation(format!("invalid category '{}'", s)))
    }
}

/// Publication status of a listing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    #[serde(alias = "deactive")]
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }
}

/// Whether an asset lands in `visuals` or `videos`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    const VIDEO_EXTENSIONS: [&'static str; 2] = ["mp4", "mov"];

    pub fn classify(extension: &str) -> Self {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        if Self::VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// An image or video stored with the storage provider
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MediaAsset {
    pub url: String,
    pub file_type: String,
    #[serde(alias = "public_id")]
    pub storage_id: String,
}

impl MediaAsset {
    pub fn kind(&self) -> MediaKind {
        MediaKind::classify(&self.file_type)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct School {
    pub name: String,
}

/// Canonical listing document, one per real-world property
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Listing {
    /// Assigned by the document store; never part of the stored source.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub agency_id: String,
    pub complex_id: String,
    pub complex_name: String,

    pub title: String,
    pub description: String,
    pub category: String,
    pub flat_no: String,
    pub floor_number: i64,
    pub building_number: String,
    pub direction_face: String,
    pub property_type: String,
    pub property_kind: String,
    pub built_year: i64,

    pub price: i64,
    pub currency: String,
    pub rooms: i64,
    pub bathrooms: i64,
    pub bedrooms: i64,
    pub living_rooms: i64,
    pub hall: i64,
    pub balcony: i64,
    pub kitchen: i64,
    pub space: f64,
    pub building_size: f64,
    pub area: f64,

    pub location: String,
    pub country: String,
    pub city: String,
    pub gps: Coordinates,
    pub near_schools: Vec<School>,

    pub visuals: Vec<MediaAsset>,
    pub videos: Vec<MediaAsset>,
    pub property_pic: Option<MediaAsset>,

    pub promoted: bool,
    pub for_rent: bool,
    pub property_no: String,
    #[serde(alias = "Viewers")]
    pub viewers: i64,
    pub status: Status,
    pub date_created: Option<DateTime<Utc>>,
    pub is_sold: bool,
    pub is_new: bool,
    pub is_commercial: bool,
    pub sold_date: String,
}

impl Listing {
    /// Field checks required before a listing is accepted for creation
    pub fn validate(&self) -> Result<()> {
        self.category.parse::<Category>().map(|_| ())
    }
}

/// Documents whose identifier lives outside their stored source
pub trait Identified {
    fn set_id(&mut self, id: String);
}

impl Identified for Listing {
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
