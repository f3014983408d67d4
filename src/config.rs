use crate::store::ElasticSettings;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub elasticsearch_url: String,
    pub listing_index: String,
    pub translation_index: String,
    pub search_page_size: usize,
    pub media_root: PathBuf,
    pub public_base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            elasticsearch_url: env::var("ELASTICSEARCH_URL")
                .unwrap_or_else(|_| "http://localhost:9200".to_string()),
            listing_index: env::var("LISTING_INDEX").unwrap_or_else(|_| "property".to_string()),
            translation_index: env::var("TRANSLATION_INDEX")
                .unwrap_or_else(|_| "translate_property".to_string()),
            search_page_size: env::var("SEARCH_PAGE_SIZE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .context("SEARCH_PAGE_SIZE must be a valid number")?,
            media_root: env::var("MEDIA_ROOT")
                .unwrap_or_else(|_| "assets".to_string())
                .into(),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3030/assets/".to_string()),
            request_timeout: Duration::from_secs(
                env::var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("REQUEST_TIMEOUT_SECS must be a valid number")?,
            ),
        })
    }

    pub fn elastic_settings(&self) -> ElasticSettings {
        ElasticSettings {
            url: self.elasticsearch_url.clone(),
            listing_index: self.listing_index.clone(),
            translation_index: self.translation_index.clone(),
            page_size: self.search_page_size,
            timeout: self.request_timeout,
        }
    }
}
