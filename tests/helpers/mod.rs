#![allow(dead_code)]

use async_trait::async_trait;
use listing_catalog::models::Listing;
use listing_catalog::storage::{InMemoryStorage, MediaFile, StorageProvider, StoredObject};
use listing_catalog::store::InMemoryDocumentStore;
use listing_catalog::{CatalogError, ListingService, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

pub fn listing(title: &str, category: &str, city: &str, price: i64) -> Listing {
    Listing {
        title: title.to_string(),
        description: format!("{} in {}", title, city),
        category: category.to_string(),
        city: city.to_string(),
        location: "Downtown".to_string(),
        property_type: "residential".to_string(),
        price,
        rooms: 3,
        area: 120.0,
        ..Default::default()
    }
}

pub fn apartment() -> Listing {
    listing("Apartment near the citadel", "apartment", "Erbil", 95_000)
}

pub fn file(name: &str) -> MediaFile {
    MediaFile::new(name, name.as_bytes().to_vec())
}

/// Storage provider stub with scripted failures and an optional gate that
/// holds every `save` until a fixed number of callers are waiting.
pub struct ScriptedStorage {
    inner: InMemoryStorage,
    fail_on_save: Option<usize>,
    gate: Option<Barrier>,
    save_calls: AtomicUsize,
    deleted: Mutex<Vec<String>>,
}

impl ScriptedStorage {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStorage::new(),
            fail_on_save: None,
            gate: None,
            save_calls: AtomicUsize::new(0),
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// Fail the `call`-th save (1-based)
    pub fn failing_on_save(call: usize) -> Self {
        Self {
            fail_on_save: Some(call),
            ..Self::new()
        }
    }

    pub fn gated(parties: usize) -> Self {
        Self {
            gate: Some(Barrier::new(parties)),
            ..Self::new()
        }
    }

    pub fn stored_count(&self) -> usize {
        self.inner.len()
    }

    pub fn holds(&self, public_id: &str) -> bool {
        self.inner.contains(public_id)
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageProvider for ScriptedStorage {
    async fn save(&self, file: &MediaFile, public_id: &str, folder: &str) -> Result<StoredObject> {
        let call = self.save_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(gate) = &self.gate {
            gate.wait().await;
        }
        if self.fail_on_save == Some(call) {
            return Err(CatalogError::storage(format!(
                "provider rejected {}",
                file.file_name
            )));
        }
        self.inner.save(file, public_id, folder).await
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        self.deleted.lock().unwrap().push(public_id.to_string());
        self.inner.delete(public_id).await
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

pub struct Harness {
    pub service: ListingService,
    pub store: Arc<InMemoryDocumentStore>,
    pub storage: Arc<ScriptedStorage>,
}

pub fn harness(storage: ScriptedStorage) -> Harness {
    let store = Arc::new(InMemoryDocumentStore::new());
    let storage = Arc::new(storage);
    let service = ListingService::new(store.clone(), storage.clone());
    Harness {
        service,
        store,
        storage,
    }
}
