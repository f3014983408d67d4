use super::traits::DocumentStore;
use super::types::Sort;
use super::{decode_source, encode_source};
use crate::error::{CatalogError, Result};
use crate::models::{
    field_map, Identified, Listing, ListingField, Locale, Status, TranslationField,
    TranslationRecord,
};
use crate::query::matcher::{compare_field, lookup};
use crate::query::BoolQuery;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

struct StoredDocument {
    id: String,
    source: Value,
}

/// Insertion-ordered collection of JSON documents
#[derive(Default)]
struct Collection {
    documents: RwLock<Vec<StoredDocument>>,
}

impl Collection {
    fn insert(&self, source: Map<String, Value>) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        documents.push(StoredDocument {
            id: id.clone(),
            source: Value::Object(source),
        });
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<Option<Value>> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents
            .iter()
            .find(|doc| doc.id == id)
            .map(|doc| doc.source.clone()))
    }

    fn search(&self, query: &BoolQuery, sort: &Sort) -> Result<Vec<(String, Value)>> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        let mut hits: Vec<(String, Value)> = documents
            .iter()
            .filter(|doc| query.matches(&doc.source))
            .map(|doc| (doc.id.clone(), doc.source.clone()))
            .collect();
        drop(documents);

        if let Some(field) = &sort.field {
            hits.sort_by(|(_, a), (_, b)| {
                let order = compare_field(lookup(a, field), lookup(b, field));
                if sort.ascending {
                    order
                } else {
                    order.reverse()
                }
            });
        }
        Ok(hits)
    }

    /// Merge top-level fields into the stored source
    fn merge(&self, id: &str, fields: Map<String, Value>) -> Result<Option<Value>> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        let Some(doc) = documents.iter_mut().find(|doc| doc.id == id) else {
            return Ok(None);
        };
        if let Value::Object(source) = &mut doc.source {
            source.extend(fields);
        }
        Ok(Some(doc.source.clone()))
    }
}

fn poisoned() -> CatalogError {
    CatalogError::backend("in-memory store lock poisoned")
}

fn decode_all<T>(hits: Vec<(String, Value)>) -> Result<Vec<T>>
where
    T: DeserializeOwned + Identified,
{
    hits.into_iter()
        .map(|(id, source)| decode_source(&id, source))
        .collect()
}

/// Document store kept in process memory.
///
/// Behaves like the search backend for development and tests: identifiers
/// are assigned on insert, updates merge whole top-level fields, and there is
/// no version check between a read and a later update.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    listings: Collection,
    translations: Collection,
    listing_updates: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of partial updates applied to listings so far
    pub fn listing_update_count(&self) -> usize {
        self.listing_updates.load(Ordering::SeqCst)
    }

    /// Decoded translation records passing `keep`, in insertion order
    fn translations_where<F>(&self, keep: F) -> Result<Vec<TranslationRecord>>
    where
        F: Fn(&TranslationRecord) -> bool,
    {
        let hits = self.translations.search(&BoolQuery::match_all(), &Sort::unsorted())?;
        let records: Vec<TranslationRecord> = decode_all(hits)?;
        Ok(records.into_iter().filter(|record| keep(record)).collect())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_listing(&self, listing: &Listing) -> Result<String> {
        let id = self.listings.insert(encode_source(listing)?)?;
        debug!(listing_id = %id, "stored listing in memory");
        Ok(id)
    }

    async fn listing_by_id(&self, id: &str) -> Result<Listing> {
        match self.listings.get(id)? {
            Some(source) => decode_source(id, source),
            None => Err(CatalogError::not_found(format!(
                "no listing was found with id {}",
                id
            ))),
        }
    }

    async fn all_listings(&self, sort: &Sort) -> Result<Vec<Listing>> {
        decode_all(self.listings.search(&BoolQuery::match_all(), sort)?)
    }

    async fn listings_by_status(&self, status: Status, sort: &Sort) -> Result<Vec<Listing>> {
        let query = BoolQuery::matching("status", status.as_str());
        decode_all(self.listings.search(&query, sort)?)
    }

    async fn search_listings(&self, query: &BoolQuery, sort: &Sort) -> Result<Vec<Listing>> {
        decode_all(self.listings.search(query, sort)?)
    }

    async fn update_listing(&self, id: &str, fields: &[ListingField]) -> Result<Listing> {
        let changes = field_map(fields)?;
        let updated = self.listings.merge(id, changes)?.ok_or_else(|| {
            CatalogError::not_found(format!("no listing was found with id {}", id))
        })?;
        self.listing_updates.fetch_add(1, Ordering::SeqCst);
        decode_source(id, updated)
    }

    async fn create_translation(&self, record: &TranslationRecord) -> Result<String> {
        self.translations.insert(encode_source(record)?)
    }

    async fn translation_for(
        &self,
        listing_id: &str,
        locale: Locale,
    ) -> Result<Option<TranslationRecord>> {
        let records = self.translations_where(|record| record.belongs_to(listing_id, locale))?;
        Ok(records.into_iter().next())
    }

    async fn translations_for(
        &self,
        listing_ids: &[String],
        locale: Locale,
    ) -> Result<Vec<TranslationRecord>> {
        let wanted: HashSet<&str> = listing_ids.iter().map(String::as_str).collect();
        self.translations_where(|record| {
            record.locale == locale && wanted.contains(record.listing_id.as_str())
        })
    }

    async fn update_translation(
        &self,
        id: &str,
        fields: &[TranslationField],
    ) -> Result<TranslationRecord> {
        let changes = field_map(fields)?;
        let updated = self.translations.merge(id, changes)?.ok_or_else(|| {
            CatalogError::not_found(format!("no translation was found with id {}", id))
        })?;
        decode_source(id, updated)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
