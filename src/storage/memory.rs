use super::traits::{MediaFile, StorageProvider, StoredObject};
use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Storage provider kept in process memory, for development and tests
#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.objects
            .lock()
            .map(|objects| objects.contains_key(public_id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StorageProvider for InMemoryStorage {
    async fn save(&self, file: &MediaFile, public_id: &str, folder: &str) -> Result<StoredObject> {
        let extension = file.extension().ok_or_else(|| {
            CatalogError::storage(format!("file '{}' has no extension", file.file_name))
        })?;
        let key = format!("{}/{}", folder, public_id);

        self.objects
            .lock()
            .map_err(|_| CatalogError::storage("in-memory storage lock poisoned"))?
            .insert(key.clone(), file.bytes.clone());

        Ok(StoredObject {
            url: format!("memory://{}.{}", key, extension),
            extension,
            public_id: key,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        self.objects
            .lock()
            .map_err(|_| CatalogError::storage("in-memory storage lock poisoned"))?
            .remove(public_id);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}
