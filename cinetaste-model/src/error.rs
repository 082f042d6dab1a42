use std::fmt::{self, Display};

/// Errors produced by model parsers and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidRating(String),
    InvalidMediaKind(String),
    InvalidCategory(String),
    InvalidCatalogId(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidRating(raw) => {
                write!(f, "invalid rating: {raw:?}")
            }
            ModelError::InvalidMediaKind(raw) => {
                write!(f, "invalid media kind: {raw:?}")
            }
            ModelError::InvalidCategory(raw) => {
                write!(f, "invalid category: {raw:?}")
            }
            ModelError::InvalidCatalogId(raw) => {
                write!(f, "invalid catalog id: {raw:?}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
