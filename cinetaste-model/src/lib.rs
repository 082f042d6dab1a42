//! Core data model definitions shared across cinetaste crates.
#![allow(missing_docs)]

pub mod catalog;
pub mod collection;
pub mod error;
pub mod ids;
pub mod image;
pub mod media_type;
pub mod prelude;
pub mod rating;
pub mod recommendation;

pub use catalog::{CandidateResult, CatalogDetails, CatalogRecord, Genre, genre_ids};
pub use collection::{
    BootstrapEntry, CollectionItem, CollectionState, UpdateOutcome,
};
pub use error::{ModelError, Result as ModelResult};
pub use ids::CatalogId;
pub use image::{PosterSize, poster_url};
pub use media_type::{Category, MediaKind};
pub use rating::Rating;
pub use recommendation::{
    Prediction, RatingProbabilities, Recommendation, SuggestionFilters,
};
