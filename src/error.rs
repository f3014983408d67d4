use thiserror::Error;

/// Errors surfaced by the catalog core.
///
/// `NotFound` and `Validation` are caller mistakes; `Storage` and `Backend`
/// are failures of the blob store and document store respectively.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl CatalogError {
    pub fn not_found(message: impl Into<String>) -> Self {
        CatalogError::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        CatalogError::Storage(message.into())
    }

    pub fn backend(message: impl Into<String>) -> Self {
        CatalogError::Backend(message.into())
    }

    /// True when the error should be answered with a client-error response.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CatalogError::NotFound(_) | CatalogError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
