use super::traits::DocumentStore;
use super::types::Sort;
use super::{decode_source, encode_source};
use crate::error::{CatalogError, Result};
use crate::models::{
    field_map, Listing, ListingField, Locale, Status, TranslationField, TranslationRecord,
};
use crate::query::BoolQuery;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Connection settings for the Elasticsearch document store
#[derive(Debug, Clone)]
pub struct ElasticSettings {
    pub url: String,
    pub listing_index: String,
    pub translation_index: String,
    pub page_size: usize,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct IndexResponse {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source", default)]
    source: Value,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: Value,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    #[serde(rename = "_id")]
    id: String,
    get: Option<UpdateSource>,
}

#[derive(Debug, Deserialize)]
struct UpdateSource {
    #[serde(rename = "_source")]
    source: Value,
}

/// Document store backed by Elasticsearch's REST API.
///
/// One `reqwest::Client` is created at construction and reused for every
/// request; it is safe to share across concurrent callers.
pub struct ElasticStore {
    client: Client,
    settings: ElasticSettings,
}

impl ElasticStore {
    pub fn new(settings: ElasticSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| CatalogError::backend(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, settings })
    }

    fn endpoint(&self, index: &str, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.settings.url.trim_end_matches('/'),
            index,
            path
        )
    }

    async fn index_document(&self, index: &str, source: Map<String, Value>) -> Result<String> {
        let url = self.endpoint(index, "_doc?refresh=wait_for");
        debug!("Indexing document into {}", index);

        let response = self
            .client
            .post(&url)
            .json(&source)
            .send()
            .await
            .map_err(transport)?;
        let body: IndexResponse = read_json(expect_success(response, index).await?).await?;
        Ok(body.id)
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Option<(String, Value)>> {
        let url = self.endpoint(index, &format!("_doc/{}", id));
        debug!("Fetching {} from {}", id, index);

        let response = self.client.get(&url).send().await.map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: GetResponse = read_json(expect_success(response, index).await?).await?;
        Ok(body.found.then_some((body.id, body.source)))
    }

    async fn search(&self, index: &str, query: &BoolQuery, sort: &Sort) -> Result<Vec<(String, Value)>> {
        let body = search_body(query, sort, self.settings.page_size);
        self.run_search(index, &body).await
    }

    async fn run_search(&self, index: &str, body: &Value) -> Result<Vec<(String, Value)>> {
        let url = self.endpoint(index, "_search");
        debug!("Searching {} with {}", index, body);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            warn!("Index {} does not exist; treating search as empty", index);
            return Ok(Vec::new());
        }
        let body: SearchResponse = read_json(expect_success(response, index).await?).await?;
        Ok(body
            .hits
            .hits
            .into_iter()
            .map(|hit| (hit.id, hit.source))
            .collect())
    }

    /// Translation records in `locale` for a batch of listing ids, keeping
    /// only exact key matches
    async fn lookup_translations(
        &self,
        listing_ids: &[String],
        locale: Locale,
    ) -> Result<Vec<TranslationRecord>> {
        let size = self.settings.page_size.max(listing_ids.len());
        let body = translation_lookup_body(listing_ids, locale, size);
        let hits = self.run_search(&self.settings.translation_index, &body).await?;
        let records: Vec<TranslationRecord> = decode_hits(hits)?;
        Ok(records
            .into_iter()
            .filter(|record| listing_ids.iter().any(|id| record.belongs_to(id, locale)))
            .collect())
    }

    async fn update_document(
        &self,
        index: &str,
        id: &str,
        changes: Map<String, Value>,
    ) -> Result<Option<(String, Value)>> {
        let url = self.endpoint(index, &format!("_update/{}?_source=true&refresh=wait_for", id));
        debug!("Updating {} in {} ({} fields)", id, index, changes.len());

        let response = self
            .client
            .post(&url)
            .json(&json!({ "doc": changes }))
            .send()
            .await
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: UpdateResponse = read_json(expect_success(response, index).await?).await?;
        let source = body
            .get
            .map(|get| get.source)
            .ok_or_else(|| CatalogError::backend("update response did not include the document"))?;
        Ok(Some((body.id, source)))
    }
}

/// Request body for `_search`
fn search_body(query: &BoolQuery, sort: &Sort, size: usize) -> Value {
    let mut body = json!({
        "query": query.to_dsl(),
        "size": size,
    });
    if let Some(field) = &sort.field {
        let order = if sort.ascending { "asc" } else { "desc" };
        body["sort"] = json!([{ field.clone(): { "order": order } }]);
    }
    body
}

/// Request body matching translation records on their exact key. Uses
/// `term`/`terms` on the keyword sub-fields so ids are never analyzed.
fn translation_lookup_body(listing_ids: &[String], locale: Locale, size: usize) -> Value {
    json!({
        "query": {
            "bool": {
                "filter": [
                    { "terms": { "property_id.keyword": listing_ids } },
                    { "term": { "local.keyword": locale.as_str() } }
                ]
            }
        },
        "size": size,
    })
}

/// Splits ids so no lookup asks for more hits than one page holds
fn id_batches(listing_ids: &[String], page_size: usize) -> std::slice::Chunks<'_, String> {
    listing_ids.chunks(page_size.max(1))
}

fn transport(err: reqwest::Error) -> CatalogError {
    CatalogError::backend(format!("search backend request failed: {}", err))
}

async fn expect_success(response: Response, index: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response.text().await.unwrap_or_default();
    warn!("Search backend returned {} for index {}", status, index);
    Err(CatalogError::backend(format!(
        "search backend returned {} for index {}: {}",
        status, index, detail
    )))
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| CatalogError::backend(format!("failed to parse search backend response: {}", e)))
}

fn listing_not_found(id: &str) -> CatalogError {
    CatalogError::not_found(format!("no listing was found with id {}", id))
}

fn decode_hits<T>(hits: Vec<(String, Value)>) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned + crate::models::Identified,
{
    hits.into_iter()
        .map(|(id, source)| decode_source(&id, source))
        .collect()
}

#[async_trait]
impl DocumentStore for ElasticStore {
    async fn create_listing(&self, listing: &Listing) -> Result<String> {
        self.index_document(&self.settings.listing_index, encode_source(listing)?)
            .await
    }

    async fn listing_by_id(&self, id: &str) -> Result<Listing> {
        match self.get_document(&self.settings.listing_index, id).await? {
            Some((id, source)) => decode_source(&id, source),
            None => Err(listing_not_found(id)),
        }
    }

    async fn all_listings(&self, sort: &Sort) -> Result<Vec<Listing>> {
        let hits = self
            .search(&self.settings.listing_index, &BoolQuery::match_all(), sort)
            .await?;
        decode_hits(hits)
    }

    async fn listings_by_status(&self, status: Status, sort: &Sort) -> Result<Vec<Listing>> {
        let query = BoolQuery::matching("status", status.as_str());
        let hits = self.search(&self.settings.listing_index, &query, sort).await?;
        decode_hits(hits)
    }

    async fn search_listings(&self, query: &BoolQuery, sort: &Sort) -> Result<Vec<Listing>> {
        let hits = self.search(&self.settings.listing_index, query, sort).await?;
        decode_hits(hits)
    }

    async fn update_listing(&self, id: &str, fields: &[ListingField]) -> Result<Listing> {
        let changes = field_map(fields)?;
        match self
            .update_document(&self.settings.listing_index, id, changes)
            .await?
        {
            Some((id, source)) => decode_source(&id, source),
            None => Err(listing_not_found(id)),
        }
    }

    async fn create_translation(&self, record: &TranslationRecord) -> Result<String> {
        self.index_document(&self.settings.translation_index, encode_source(record)?)
            .await
    }

    async fn translation_for(
        &self,
        listing_id: &str,
        locale: Locale,
    ) -> Result<Option<TranslationRecord>> {
        let records = self
            .lookup_translations(&[listing_id.to_string()], locale)
            .await?;
        Ok(records.into_iter().next())
    }

    async fn translations_for(
        &self,
        listing_ids: &[String],
        locale: Locale,
    ) -> Result<Vec<TranslationRecord>> {
        let mut records = Vec::new();
        for batch in id_batches(listing_ids, self.settings.page_size) {
            records.extend(self.lookup_translations(batch, locale).await?);
        }
        Ok(records)
    }

    async fn update_translation(
        &self,
        id: &str,
        fields: &[TranslationField],
    ) -> Result<TranslationRecord> {
        let changes = field_map(fields)?;
        match self
            .update_document(&self.settings.translation_index, id, changes)
            .await?
        {
            Some((id, source)) => decode_source(&id, source),
            None => Err(CatalogError::not_found(format!(
                "no translation was found with id {}",
                id
            ))),
        }
    }

    fn backend_name(&self) -> &'static str {
        "elasticsearch"
    }
}
