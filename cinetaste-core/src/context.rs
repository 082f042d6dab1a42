use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::collection::{BootstrapDataset, CollectionStorage, CollectionStore, JsonFileStorage};
use crate::config::{ConfigError, CoreConfig, build_generation_backend};
use crate::error::StorageError;
use crate::generation::GenerationBackend;
use crate::providers::{CatalogProvider, ProviderError, TmdbCatalog};
use crate::recommend::RecommendationService;
use crate::resolver::TitleResolver;
use crate::throttle::RequestThrottle;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Bootstrap dataset error: {0}")]
    Bootstrap(#[from] StorageError),
}

/// Every service wired from one [`CoreConfig`].
///
/// Must be built inside a Tokio runtime; the catalog throttle spawns its
/// worker on construction.
#[derive(Debug)]
pub struct AppContext {
    pub config: CoreConfig,
    pub resolver: TitleResolver,
    pub store: Arc<CollectionStore>,
    pub recommendations: RecommendationService,
}

impl AppContext {
    pub fn from_config(config: CoreConfig) -> Result<Self, SetupError> {
        let throttle = RequestThrottle::new(config.tmdb.min_interval);
        let catalog: Arc<dyn CatalogProvider> = Arc::new(TmdbCatalog::new(&config.tmdb, throttle)?);
        let backend = build_generation_backend(&config.generation)?;
        let storage: Arc<dyn CollectionStorage> = Arc::new(JsonFileStorage::new(&config.data_dir));
        let bootstrap = match &config.bootstrap_path {
            Some(path) => BootstrapDataset::from_path(path)?,
            None => BootstrapDataset::embedded()?,
        };

        Ok(Self::assemble(config, catalog, backend, storage, bootstrap))
    }

    /// Wire pre-built parts. Used by tests and alternative front ends.
    pub fn assemble(
        config: CoreConfig,
        catalog: Arc<dyn CatalogProvider>,
        backend: Arc<dyn GenerationBackend>,
        storage: Arc<dyn CollectionStorage>,
        bootstrap: BootstrapDataset,
    ) -> Self {
        debug!(
            catalog = catalog.name(),
            backend = backend.name(),
            data_dir = %config.data_dir.display(),
            "wiring services"
        );

        let resolver = TitleResolver::new(catalog, backend.clone());
        let store = Arc::new(CollectionStore::new(resolver.clone(), storage, bootstrap));
        let recommendations = RecommendationService::new(backend, resolver.clone());

        Self {
            config,
            resolver,
            store,
            recommendations,
        }
    }
}
