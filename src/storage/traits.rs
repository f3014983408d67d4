use crate::error::Result;
use crate::models::MediaAsset;
use async_trait::async_trait;
use std::path::Path;

/// An uploaded file waiting to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Lower-cased extension of the original file name, if any
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// What the provider reports back for a stored file
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub url: String,
    pub extension: String,
    pub public_id: String,
}

impl From<StoredObject> for MediaAsset {
    fn from(stored: StoredObject) -> Self {
        MediaAsset {
            url: stored.url,
            file_type: stored.extension,
            storage_id: stored.public_id,
        }
    }
}

/// Blob storage for listing media
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Store a file under `folder` and return its public URL, type and
    /// storage identifier
    async fn save(&self, file: &MediaFile, public_id: &str, folder: &str) -> Result<StoredObject>;

    /// Remove a stored file by the identifier `save` returned
    async fn delete(&self, public_id: &str) -> Result<()>;

    /// Name of the provider, for logs
    fn provider_name(&self) -> &'static str;
}
