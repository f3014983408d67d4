pub mod elastic;
pub mod memory;
pub mod traits;
pub mod types;

pub use elastic::{ElasticSettings, ElasticStore};
pub use memory::InMemoryDocumentStore;
pub use traits::DocumentStore;
pub use types::Sort;

use crate::error::{CatalogError, Result};
use crate::models::Identified;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Serialize a document into its stored source, without the identifier
pub(crate) fn encode_source<T: Serialize>(doc: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(doc) {
        Ok(Value::Object(mut source)) => {
            source.remove("id");
            Ok(source)
        }
        Ok(_) => Err(CatalogError::backend("document did not serialize to an object")),
        Err(e) => Err(CatalogError::backend(format!("failed to encode document: {}", e))),
    }
}

/// Rebuild a typed document from a stored source and its identifier
pub(crate) fn decode_source<T>(id: &str, source: Value) -> Result<T>
where
    T: DeserializeOwned + Identified,
{
    let mut doc: T = serde_json::from_value(source).map_err(|e| {
        CatalogError::backend(format!("failed to parse stored document {}: {}", id, e))
    })?;
    doc.set_id(id.to_string());
    Ok(doc)
}
