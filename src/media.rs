//! Attaching and detaching listing media.
//!
//! Every operation reads the listing, edits its media sequences in memory and
//! writes them back whole through one partial update. Nothing guards the gap
//! between that read and that write: two calls racing on the same listing
//! both start from the same sequences and the later write drops whatever the
//! earlier one added or removed.

use crate::error::Result;
use crate::models::{Listing, ListingField, MediaAsset, MediaKind};
use crate::storage::{MediaFile, StorageProvider};
use crate::store::DocumentStore;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct MediaLifecycleManager {
    store: Arc<dyn DocumentStore>,
    storage: Arc<dyn StorageProvider>,
}

impl MediaLifecycleManager {
    pub fn new(store: Arc<dyn DocumentStore>, storage: Arc<dyn StorageProvider>) -> Self {
        Self { store, storage }
    }

    /// Store each file in order and append it to `visuals` or `videos`.
    ///
    /// The first storage failure aborts the batch. Files stored before it
    /// stay with the provider but are not attached, and the listing is not
    /// written.
    pub async fn upload(&self, listing_id: &str, files: &[MediaFile]) -> Result<Listing> {
        let listing = self.store.listing_by_id(listing_id).await?;
        let mut visuals = listing.visuals;
        let mut videos = listing.videos;

        for (stored, file) in files.iter().enumerate() {
            let public_id = Uuid::new_v4().simple().to_string();
            let object = match self.storage.save(file, &public_id, listing_id).await {
                Ok(object) => object,
                Err(err) => {
                    warn!(
                        "Upload to listing {} failed on '{}'; {} file(s) already sent to {} are not attached",
                        listing_id,
                        file.file_name,
                        stored,
                        self.storage.provider_name()
                    );
                    return Err(err);
                }
            };
            debug!("Stored {} as {}", file.file_name, object.public_id);

            let asset = MediaAsset::from(object);
            match asset.kind() {
                MediaKind::Video => videos.push(asset),
                MediaKind::Image => visuals.push(asset),
            }
        }

        info!("Attaching {} file(s) to listing {}", files.len(), listing_id);
        self.write_media(listing_id, visuals, videos).await
    }

    /// Detach the asset whose storage identifier is `media_id`.
    ///
    /// An unknown `media_id` leaves the provider alone and rewrites the
    /// unchanged sequences.
    pub async fn delete(&self, listing_id: &str, media_id: &str) -> Result<Listing> {
        let listing = self.store.listing_by_id(listing_id).await?;

        let (visuals, removed_visuals) = split_off(listing.visuals, media_id);
        let (videos, removed_videos) = split_off(listing.videos, media_id);

        let stored_as_image = removed_visuals
            .iter()
            .any(|asset| asset.kind() == MediaKind::Image);
        let stored_as_video = removed_videos
            .iter()
            .any(|asset| asset.kind() == MediaKind::Video);

        if stored_as_image || stored_as_video {
            self.storage.delete(media_id).await?;
            info!("Deleted media {} from listing {}", media_id, listing_id);
        } else if removed_visuals.is_empty() && removed_videos.is_empty() {
            debug!("Media {} is not attached to listing {}", media_id, listing_id);
        } else {
            warn!(
                "Media {} on listing {} was filed under the wrong kind; detaching without deleting",
                media_id, listing_id
            );
        }

        self.write_media(listing_id, visuals, videos).await
    }

    /// Replace the cover picture, deleting the previous one from storage
    pub async fn upload_cover(&self, listing_id: &str, file: &MediaFile) -> Result<Listing> {
        let listing = self.store.listing_by_id(listing_id).await?;

        if let Some(previous) = listing.property_pic {
            self.storage.delete(&previous.storage_id).await?;
            debug!("Removed previous cover {}", previous.storage_id);
        }

        let public_id = Uuid::new_v4().simple().to_string();
        let cover = MediaAsset::from(self.storage.save(file, &public_id, listing_id).await?);
        info!("Setting cover of listing {} to {}", listing_id, cover.storage_id);

        self.store
            .update_listing(listing_id, &[ListingField::PropertyPic(Some(cover))])
            .await
    }

    async fn write_media(
        &self,
        listing_id: &str,
        visuals: Vec<MediaAsset>,
        videos: Vec<MediaAsset>,
    ) -> Result<Listing> {
        self.store
            .update_listing(
                listing_id,
                &[ListingField::Visuals(visuals), ListingField::Videos(videos)],
            )
            .await
    }
}

/// Partition into (kept, removed) by storage identifier
fn split_off(assets: Vec<MediaAsset>, media_id: &str) -> (Vec<MediaAsset>, Vec<MediaAsset>) {
    assets
        .into_iter()
        .partition(|asset| asset.storage_id != media_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str, ext: &str) -> MediaAsset {
        MediaAsset {
            url: format!("memory://{}.{}", id, ext),
            file_type: ext.to_string(),
            storage_id: id.to_string(),
        }
    }

    #[test]
    fn split_off_keeps_order_of_survivors() {
        let (kept, removed) = split_off(
            vec![asset("a", "jpg"), asset("b", "png"), asset("c", "jpg")],
            "b",
        );
        assert_eq!(kept, vec![asset("a", "jpg"), asset("c", "jpg")]);
        assert_eq!(removed, vec![asset("b", "png")]);

        let (kept, removed) = split_off(vec![asset("a", "jpg")], "zzz");
        assert_eq!(kept.len(), 1);
        assert!(removed.is_empty());
    }
}
