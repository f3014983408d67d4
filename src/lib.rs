//! Catalog core for real-estate listings: filter compilation, translation
//! overlay and media lifecycle on top of a document store and a blob store.

pub mod config;
pub mod error;
pub mod media;
pub mod models;
pub mod query;
pub mod service;
pub mod storage;
pub mod store;
pub mod translation;

pub use error::{CatalogError, Result};
pub use media::MediaLifecycleManager;
pub use service::ListingService;
