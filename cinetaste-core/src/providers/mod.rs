pub mod tmdb;
pub mod traits;

pub use tmdb::TmdbCatalog;
pub use traits::{CatalogLanguages, CatalogProvider, ProviderError};
