use super::{Category, Identified, TranslationField};
use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language selector for translated reads and writes
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
    Kur,
}

impl Locale {
    /// Canonical listings are written in this locale.
    pub const DEFAULT: Locale = Locale::En;

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
            Locale::Kur => "kur",
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ar" => Ok(Locale::Ar),
            "kur" => Ok(Locale::Kur),
            other => Err(CatalogError::validation(format!("invalid language '{}'", other))),
        }
    }
}

/// Locale-specific overrides for one listing.
///
/// An empty string means "no override" for that field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationRecord {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "property_id")]
    pub listing_id: String,
    #[serde(rename = "local")]
    pub locale: Locale,

    pub title: String,
    pub description: String,
    pub category: String,
    pub city: String,
    pub location: String,
    pub property_type: String,
    pub direction_face: String,
}

impl TranslationRecord {
    /// Checks a record must pass before it is written
    pub fn validate(&self) -> Result<()> {
        if !self.category.is_empty() && !Category::is_valid_translation(&self.category) {
            return Err(CatalogError::validation(format!(
                "invalid category '{}'",
                self.category
            )));
        }
        Ok(())
    }

    /// Exact, case-sensitive match on the `(property_id, local)` key
    pub fn belongs_to(&self, listing_id: &str, locale: Locale) -> bool {
        self.listing_id == listing_id && self.locale == locale
    }

    /// All seven overridable fields, empty ones included, for a rewrite of a
    /// stored record.
    pub fn replacement_fields(&self) -> Vec<TranslationField> {
        vec![
            TranslationField::Description(self.description.clone()),
            TranslationField::City(self.city.clone()),
            TranslationField::Location(self.location.clone()),
            TranslationField::Category(self.category.clone()),
            TranslationField::PropertyType(self.property_type.clone()),
            TranslationField::DirectionFace(self.direction_face.clone()),
            TranslationField::Title(self.title.clone()),
        ]
    }
}

impl Identified for TranslationRecord {
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
