use anyhow::{bail, Context, Result};
use listing_catalog::config::Config;
use listing_catalog::models::{Listing, Locale};
use listing_catalog::query::FilterSpec;
use listing_catalog::storage::{DiskStorage, MediaFile};
use listing_catalog::store::{ElasticStore, Sort};
use listing_catalog::ListingService;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage:
  catalog import <listings.json>
  catalog search <filter.json> [locale]
  catalog attach <listing-id> <file>...
  catalog detach <listing-id> <media-id>";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!("🏠 Listing catalog ({})", config.elasticsearch_url);

    let store = ElasticStore::new(config.elastic_settings())
        .context("Failed to create search backend client")?;
    let storage = DiskStorage::new(config.media_root.clone(), config.public_base_url.clone());
    let service = ListingService::new(Arc::new(store), Arc::new(storage));

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["import", path] => import(&service, path).await,
        ["search", path] => search(&service, path, None).await,
        ["search", path, locale] => search(&service, path, Some(locale.parse()?)).await,
        ["attach", listing_id, files @ ..] if !files.is_empty() => {
            attach(&service, listing_id, files).await
        }
        ["detach", listing_id, media_id] => {
            let listing = service.delete_media(listing_id, media_id).await?;
            info!(
                "Listing {} now has {} visual(s) and {} video(s)",
                listing.id,
                listing.visuals.len(),
                listing.videos.len()
            );
            Ok(())
        }
        _ => bail!("{}", USAGE),
    }
}

async fn import(service: &ListingService, path: &str) -> Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path))?;
    let listings: Vec<Listing> =
        serde_json::from_str(&raw).with_context(|| format!("{} is not a listing array", path))?;

    info!("Importing {} listings from {}", listings.len(), path);
    for listing in listings {
        let title = listing.title.clone();
        let created = service
            .create(listing)
            .await
            .with_context(|| format!("Failed to import '{}'", title))?;
        println!("{}\t{}", created.id, created.title);
    }
    Ok(())
}

async fn search(service: &ListingService, path: &str, locale: Option<Locale>) -> Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path))?;
    let filter = FilterSpec::from_json(&raw)?;

    let listings = service.search(&filter, &Sort::unsorted(), locale).await?;
    info!("✅ Found {} listings", listings.len());
    println!("{}", serde_json::to_string_pretty(&listings)?);
    Ok(())
}

async fn attach(service: &ListingService, listing_id: &str, paths: &[&str]) -> Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for &path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path))?;
        let file_name = Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(path)
            .to_string();
        files.push(MediaFile::new(file_name, bytes));
    }

    let listing = service.upload_media(listing_id, &files).await?;
    for asset in listing.visuals.iter().chain(listing.videos.iter()) {
        println!("{}\t{}", asset.storage_id, asset.url);
    }
    Ok(())
}
