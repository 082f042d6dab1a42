//! Snapshot of the types surface for downstream crates.
//! Prefer importing from this module instead of individual tree nodes when
//! working in the CLI or other presentation layers.

pub use super::catalog::{
    CandidateResult, CatalogDetails, CatalogRecord, Genre,
};
pub use super::collection::{
    BootstrapEntry, CollectionItem, CollectionState, UpdateOutcome,
};
pub use super::ids::CatalogId;
pub use super::image::PosterSize;
pub use super::media_type::{Category, MediaKind};
pub use super::rating::Rating;
pub use super::recommendation::{
    Prediction, RatingProbabilities, Recommendation, SuggestionFilters,
};
