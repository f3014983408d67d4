use super::{Category, Coordinates, MediaAsset, School, Status};
use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// One typed partial-update target on a listing.
///
/// Wire form is `{"field": "<name>", "value": <json>}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ListingField {
    Title(String),
    Description(String),
    Category(Category),
    ComplexName(String),
    FlatNo(String),
    FloorNumber(i64),
    BuildingNumber(String),
    DirectionFace(String),
    PropertyType(String),
    PropertyKind(String),
    BuiltYear(i64),
    Price(i64),
    Currency(String),
    Rooms(i64),
    Bathrooms(i64),
    Bedrooms(i64),
    LivingRooms(i64),
    Hall(i64),
    Balcony(i64),
    Kitchen(i64),
    Space(f64),
    BuildingSize(f64),
    Area(f64),
    Location(String),
    Country(String),
    City(String),
    Gps(Coordinates),
    NearSchools(Vec<School>),
    Visuals(Vec<MediaAsset>),
    Videos(Vec<MediaAsset>),
    PropertyPic(Option<MediaAsset>),
    Promoted(bool),
    ForRent(bool),
    PropertyNo(String),
    Viewers(i64),
    Status(Status),
    IsSold(bool),
    IsNew(bool),
    IsCommercial(bool),
    SoldDate(String),
}

impl ListingField {
    /// Build a field from its wire name and an untyped value
    pub fn parse(field: &str, value: Value) -> Result<Self> {
        serde_json::from_value(json!({ "field": field, "value": value }))
            .map_err(|e| CatalogError::validation(format!("invalid update for '{}': {}", field, e)))
    }
}

/// Overridable fields of a translation record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TranslationField {
    Title(String),
    Description(String),
    Category(String),
    City(String),
    Location(String),
    PropertyType(String),
    DirectionFace(String),
}

/// Body of an update-fields request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateRequest {
    #[serde(default)]
    pub fields: Vec<ListingField>,
}

impl UpdateRequest {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| CatalogError::validation(format!("invalid update request: {}", e)))
    }
}

/// Flatten typed fields into the `name -> value` document a store merges.
/// Later entries for the same name win.
pub fn field_map<F: Serialize>(fields: &[F]) -> Result<Map<String, Value>> {
    let mut doc = Map::new();
    for field in fields {
        let encoded = serde_json::to_value(field)
            .map_err(|e| CatalogError::backend(format!("failed to encode update: {}", e)))?;
        let Value::Object(mut pair) = encoded else {
            return Err(CatalogError::backend("update field did not encode to an object"));
        };
        let name = match pair.remove("field") {
            Some(Value::String(name)) => name,
            _ => return Err(CatalogError::backend("update field is missing its name")),
        };
        let value = pair.remove("value").unwrap_or(Value::Null);
        doc.insert(name, value);
    }
    Ok(doc)
}
