use thiserror::Error;

use crate::generation::GenerationError;
use crate::providers::ProviderError;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Catalog error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Empty title query")]
    EmptyQuery,

    #[error("No catalog results for \"{query}\"")]
    NoResults { query: String },

    #[error("Selection failed: {0}")]
    SelectionFailed(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Collection has not been initialized")]
    NotInitialized,
}

#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Malformed generation response: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, CollectionError>;
