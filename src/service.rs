use crate::error::{CatalogError, Result};
use crate::media::MediaLifecycleManager;
use crate::models::{Listing, ListingField, Locale, Status, TranslationRecord};
use crate::query::{compile, FilterSpec};
use crate::storage::{MediaFile, StorageProvider};
use crate::store::{DocumentStore, Sort};
use crate::translation;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Entry point for every listing operation.
///
/// Reads take an optional locale; `None` or the default locale returns
/// canonical documents without looking up translations.
pub struct ListingService {
    store: Arc<dyn DocumentStore>,
    media: MediaLifecycleManager,
}

impl ListingService {
    pub fn new(store: Arc<dyn DocumentStore>, storage: Arc<dyn StorageProvider>) -> Self {
        let media = MediaLifecycleManager::new(Arc::clone(&store), storage);
        Self { store, media }
    }

    /// Validate and insert a new listing, stamped active and dated now
    pub async fn create(&self, mut listing: Listing) -> Result<Listing> {
        listing.validate()?;

        listing.id.clear();
        listing.status = Status::Active;
        listing.date_created = Some(Utc::now());

        let id = self.store.create_listing(&listing).await?;
        info!("Created listing {} ({})", id, listing.category);
        listing.id = id;
        Ok(listing)
    }

    pub async fn get(&self, id: &str, locale: Option<Locale>) -> Result<Listing> {
        let listing = self.store.listing_by_id(id).await?;
        if !translation::needs_overlay(locale) {
            return Ok(listing);
        }

        let record = self.store.translation_for(id, locale.unwrap_or_default()).await?;
        Ok(translation::apply(locale, listing, record.as_ref()))
    }

    /// Listing in the given locale; same as `get` with an explicit locale
    pub async fn get_translated(&self, id: &str, locale: Locale) -> Result<Listing> {
        self.get(id, Some(locale)).await
    }

    /// All listings, or only those with `status`
    pub async fn list(
        &self,
        status: Option<Status>,
        sort: &Sort,
        locale: Option<Locale>,
    ) -> Result<Vec<Listing>> {
        let listings = match status {
            Some(status) => self.store.listings_by_status(status, sort).await?,
            None => self.store.all_listings(sort).await?,
        };
        self.localize(listings, locale).await
    }

    pub async fn search(
        &self,
        filter: &FilterSpec,
        sort: &Sort,
        locale: Option<Locale>,
    ) -> Result<Vec<Listing>> {
        let query = compile(filter);
        debug!("Searching {} with {:?}", self.store.backend_name(), query);

        let listings = self.store.search_listings(&query, sort).await?;
        self.localize(listings, locale).await
    }

    pub async fn update(&self, id: &str, fields: Vec<ListingField>) -> Result<Listing> {
        if fields.is_empty() {
            return Err(CatalogError::validation("update request has no fields"));
        }
        info!("Updating {} field(s) on listing {}", fields.len(), id);
        self.store.update_listing(id, &fields).await
    }

    pub async fn upload_media(&self, id: &str, files: &[MediaFile]) -> Result<Listing> {
        self.media.upload(id, files).await
    }

    pub async fn delete_media(&self, id: &str, media_id: &str) -> Result<Listing> {
        self.media.delete(id, media_id).await
    }

    pub async fn upload_cover(&self, id: &str, file: &MediaFile) -> Result<Listing> {
        self.media.upload_cover(id, file).await
    }

    /// Insert or rewrite the `locale` record of a listing and return the
    /// listing with that record overlaid
    pub async fn translate(
        &self,
        id: &str,
        mut record: TranslationRecord,
        locale: Locale,
    ) -> Result<Listing> {
        record.id.clear();
        record.listing_id = id.to_string();
        record.locale = locale;
        record.validate()?;

        let mut listing = self.store.listing_by_id(id).await?;

        let written = match self.store.translation_for(id, locale).await? {
            Some(existing) => {
                info!("Rewriting {} translation of listing {}", locale, id);
                self.store
                    .update_translation(&existing.id, &record.replacement_fields())
                    .await?
            }
            None => {
                info!("Adding {} translation to listing {}", locale, id);
                record.id = self.store.create_translation(&record).await?;
                record
            }
        };

        translation::overlay(&mut listing, &written);
        Ok(listing)
    }

    async fn localize(&self, listings: Vec<Listing>, locale: Option<Locale>) -> Result<Vec<Listing>> {
        let Some(locale) = locale.filter(|locale| !locale.is_default()) else {
            return Ok(listings);
        };
        let ids: Vec<String> = listings.iter().map(|listing| listing.id.clone()).collect();
        let records = self.store.translations_for(&ids, locale).await?;
        debug!("Overlaying {} {} record(s)", records.len(), locale);
        Ok(translation::apply_many(Some(locale), listings, &records))
    }
}
