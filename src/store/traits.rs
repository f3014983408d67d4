use super::types::Sort;
use crate::error::Result;
use crate::models::{Listing, ListingField, Locale, Status, TranslationField, TranslationRecord};
use crate::query::BoolQuery;
use async_trait::async_trait;

/// System of record for listings and their translation records.
///
/// Listings live in one collection and translation records in another,
/// matched to listings by `(property_id, local)`. Handles are shared across
/// concurrent requests, so implementations must be safe to call in parallel.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a listing and return the identifier the store assigned
    async fn create_listing(&self, listing: &Listing) -> Result<String>;

    /// Fails with `NotFound` when no listing has this identifier
    async fn listing_by_id(&self, id: &str) -> Result<Listing>;

    async fn all_listings(&self, sort: &Sort) -> Result<Vec<Listing>>;

    async fn listings_by_status(&self, status: Status, sort: &Sort) -> Result<Vec<Listing>>;

    async fn search_listings(&self, query: &BoolQuery, sort: &Sort) -> Result<Vec<Listing>>;

    /// Partial update: each named field is replaced wholesale, every other
    /// field is left untouched. Returns the document after the update.
    async fn update_listing(&self, id: &str, fields: &[ListingField]) -> Result<Listing>;

    async fn create_translation(&self, record: &TranslationRecord) -> Result<String>;

    /// `Ok(None)` when the listing has no record for this locale. Keys are
    /// compared exactly.
    async fn translation_for(
        &self,
        listing_id: &str,
        locale: Locale,
    ) -> Result<Option<TranslationRecord>>;

    /// Every `locale` record belonging to one of `listing_ids`
    async fn translations_for(
        &self,
        listing_ids: &[String],
        locale: Locale,
    ) -> Result<Vec<TranslationRecord>>;

    async fn update_translation(
        &self,
        id: &str,
        fields: &[TranslationField],
    ) -> Result<TranslationRecord>;

    /// Name of the backend, for logs
    fn backend_name(&self) -> &'static str;
}
