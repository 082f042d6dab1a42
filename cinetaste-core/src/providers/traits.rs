use async_trait::async_trait;
use cinetaste_model::{CandidateResult, CatalogDetails, CatalogId, MediaKind};

use crate::throttle::ThrottleError;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Throttle error: {0}")]
    Throttle(#[from] ThrottleError),
}

/// Language pair used for every catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLanguages {
    pub primary: String,
    pub fallback: String,
}

impl Default for CatalogLanguages {
    fn default() -> Self {
        Self {
            primary: "pt-BR".to_string(),
            fallback: "en-US".to_string(),
        }
    }
}

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Multi-type search restricted to movies and series. Zero matches is an
    /// empty vector, not an error.
    async fn search(
        &self,
        query: &str,
        language: &str,
    ) -> Result<Vec<CandidateResult>, ProviderError>;

    /// Full details in the primary language, retried once in the fallback
    /// language when the primary reports not-found.
    async fn details(
        &self,
        id: CatalogId,
        kind: MediaKind,
    ) -> Result<CatalogDetails, ProviderError>;

    fn languages(&self) -> &CatalogLanguages;

    /// Get the base URL for images
    fn image_base_url(&self) -> &str;

    /// Get the provider name
    fn name(&self) -> &'static str;
}
