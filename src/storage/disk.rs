use super::traits::{MediaFile, StorageProvider, StoredObject};
use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Stores media on the local filesystem as `<root>/<folder>/<public id>.<ext>`
/// and hands out URLs under a public base URL that serves `root`.
///
/// Storage identifiers have the form `<folder>/<public id>`.
pub struct DiskStorage {
    root: PathBuf,
    public_base_url: String,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

/// Path segments must stay inside the storage root
fn check_segment(segment: &str) -> Result<()> {
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains(['/', '\\']) {
        return Err(CatalogError::storage(format!(
            "invalid storage path segment '{}'",
            segment
        )));
    }
    Ok(())
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> CatalogError {
    CatalogError::storage(format!("failed to {} {}: {}", action, path.display(), err))
}

#[async_trait]
impl StorageProvider for DiskStorage {
    async fn save(&self, file: &MediaFile, public_id: &str, folder: &str) -> Result<StoredObject> {
        check_segment(folder)?;
        check_segment(public_id)?;
        let extension = file.extension().ok_or_else(|| {
            CatalogError::storage(format!("file '{}' has no extension", file.file_name))
        })?;

        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_error("create", &dir, e))?;

        let file_name = format!("{}.{}", public_id, extension);
        let path = dir.join(&file_name);
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| io_error("write", &path, e))?;
        debug!("Saved {} bytes to {}", file.bytes.len(), path.display());

        Ok(StoredObject {
            url: format!(
                "{}/{}/{}",
                self.public_base_url.trim_end_matches('/'),
                folder,
                file_name
            ),
            extension,
            public_id: format!("{}/{}", folder, public_id),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        let (folder, stem) = public_id.split_once('/').ok_or_else(|| {
            CatalogError::storage(format!("malformed storage id '{}'", public_id))
        })?;
        check_segment(folder)?;
        check_segment(stem)?;

        let dir = self.root.join(folder);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Nothing stored under {}; skipping delete of {}", dir.display(), public_id);
                return Ok(());
            }
            Err(e) => return Err(io_error("read", &dir, e)),
        };

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error("read", &dir, e))?
        {
            let path = entry.path();
            if path.file_stem().and_then(|s| s.to_str()) == Some(stem) {
                tokio::fs::remove_file(&path)
                    .await
                    .map_err(|e| io_error("remove", &path, e))?;
                removed += 1;
            }
        }

        if removed == 0 {
            warn!("No stored file matched {}", public_id);
        } else {
            debug!("Removed {} file(s) for {}", removed, public_id);
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "disk"
    }
}
