//! The collection store: the authoritative rated collection plus its
//! persistence.
//!
//! Every mutation runs against the in-memory [`CollectionState`] under a
//! write lock and is then flushed whole to [`CollectionStorage`]. A failed
//! flush is reported to the caller; the in-memory change stays applied.

pub mod bootstrap;
pub mod storage;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use cinetaste_model::{
    CatalogId, CollectionItem, CollectionState, PosterSize, Rating, UpdateOutcome, poster_url,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub use bootstrap::{BootstrapDataset, seed_snippet};
pub use storage::{CollectionStorage, JsonFileStorage, MemoryStorage, STORAGE_KEY};

use crate::error::{CollectionError, Result, StorageError};
use crate::resolver::TitleResolver;
use crate::resolver::category::SYNOPSIS_UNAVAILABLE;

/// Where the state came from on [`CollectionStore::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Stored,
    /// Storage was empty; the bootstrap seed was written.
    Seeded,
    /// Stored state was unreadable; the bootstrap seed replaced it.
    Recovered,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub updated: usize,
    pub failed: usize,
}

/// Hands out strictly increasing millisecond stamps, close to wall-clock.
#[derive(Debug, Default)]
struct StampClock {
    last: AtomicI64,
}

impl StampClock {
    fn observe(&self, stamp: i64) {
        self.last.fetch_max(stamp, Ordering::SeqCst);
    }

    fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }
}

pub struct CollectionStore {
    resolver: TitleResolver,
    storage: Arc<dyn CollectionStorage>,
    bootstrap: BootstrapDataset,
    state: RwLock<Option<CollectionState>>,
    clock: StampClock,
}

impl fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionStore")
            .field("resolver", &self.resolver)
            .field("bootstrap_entries", &self.bootstrap.len())
            .finish_non_exhaustive()
    }
}

impl CollectionStore {
    pub fn new(
        resolver: TitleResolver,
        storage: Arc<dyn CollectionStorage>,
        bootstrap: BootstrapDataset,
    ) -> Self {
        Self {
            resolver,
            storage,
            bootstrap,
            state: RwLock::new(None),
            clock: StampClock::default(),
        }
    }

    pub fn resolver(&self) -> &TitleResolver {
        &self.resolver
    }

    /// Load persisted state, seeding from the bootstrap dataset when storage
    /// is empty or unreadable. Calling it again reloads from storage.
    pub async fn initialize(&self) -> Result<LoadSource> {
        let (mut state, source) = match self.storage.load() {
            Ok(Some(state)) => (state, LoadSource::Stored),
            Ok(None) => (self.seed(), LoadSource::Seeded),
            Err(StorageError::Serialization(err)) => {
                warn!(error = %err, "stored collection is unreadable, reseeding");
                (self.seed(), LoadSource::Recovered)
            }
            Err(err) => return Err(err.into()),
        };

        let repaired = source == LoadSource::Stored && state.normalize();
        if repaired {
            warn!(items = state.len(), "stored collection broke its invariants, repaired");
        }
        if source != LoadSource::Stored || repaired {
            self.storage.save(&state)?;
        }
        if let Some(latest) = state.latest_timestamp() {
            self.clock.observe(latest);
        }

        info!(items = state.len(), source = ?source, "collection loaded");
        *self.state.write().await = Some(state);
        Ok(source)
    }

    fn seed(&self) -> CollectionState {
        let now = Utc::now().timestamp_millis();
        let state = self.bootstrap.seed(now);
        debug!(items = state.len(), "seeded collection from bootstrap dataset");
        state
    }

    /// Resolve `title` and file it under `rating`, replacing any existing
    /// item with the same id. A resolution failure leaves the state as is.
    pub async fn add(&self, title: &str, rating: Rating) -> Result<CollectionItem> {
        self.ensure_initialized().await?;

        let record = self.resolver.resolve(title).await?;
        let item = CollectionItem::new(record, rating, self.clock.next());

        self.mutate(|state| {
            if let Some(previous) = state.insert(item.clone()) {
                debug!(
                    id = %previous.id(),
                    from = %previous.rating,
                    "replaced existing item"
                );
            }
            true
        })
        .await?;

        info!(id = %item.id(), title = %item.title(), rating = %rating, "added to collection");
        Ok(item)
    }

    /// Remove the item with `id`. Absent ids are a no-op and nothing is
    /// written.
    pub async fn remove(&self, id: CatalogId) -> Result<Option<CollectionItem>> {
        let mut removed = None;
        self.mutate(|state| {
            removed = state.remove(id);
            removed.is_some()
        })
        .await?;

        match &removed {
            Some(item) => info!(id = %id, title = %item.title(), "removed from collection"),
            None => debug!(id = %id, "remove: no such item"),
        }
        Ok(removed)
    }

    /// Apply `item` to the existing item with the same id: move it when the
    /// rating changed, otherwise replace it in place. Unknown ids are a
    /// silent no-op.
    pub async fn update(&self, item: CollectionItem) -> Result<UpdateOutcome> {
        let id = item.id();
        let mut outcome = UpdateOutcome::Missing;
        self.mutate(|state| {
            outcome = state.update(item);
            outcome.changed()
        })
        .await?;

        match outcome {
            UpdateOutcome::Moved { from, to } => {
                info!(id = %id, from = %from, to = %to, "moved item")
            }
            UpdateOutcome::Replaced => debug!(id = %id, "updated item in place"),
            UpdateOutcome::Missing => debug!(id = %id, "update: no such item"),
        }
        Ok(outcome)
    }

    pub async fn set_rating(&self, id: CatalogId, rating: Rating) -> Result<UpdateOutcome> {
        match self.get(id).await? {
            Some(mut item) => {
                item.rating = rating;
                self.update(item).await
            }
            None => Ok(UpdateOutcome::Missing),
        }
    }

    /// Fetch details for an item missing its synopsis or poster and apply
    /// them through [`Self::update`]. Returns `None` when the id is unknown.
    pub async fn backfill(&self, id: CatalogId) -> Result<Option<CollectionItem>> {
        let Some(mut item) = self.get(id).await? else {
            return Ok(None);
        };
        if !item.needs_backfill() {
            return Ok(Some(item));
        }

        let catalog = self.resolver.catalog();
        let details = catalog.details(id, item.record.kind).await?;

        let synopsis_missing = item
            .record
            .synopsis
            .as_deref()
            .is_none_or(|s| s.trim().is_empty());
        if synopsis_missing {
            item.record.synopsis = Some(
                details
                    .overview
                    .unwrap_or_else(|| SYNOPSIS_UNAVAILABLE.to_string()),
            );
        }
        if item.record.poster_url.is_none() {
            item.record.poster_url = poster_url(
                catalog.image_base_url(),
                PosterSize::default(),
                details.poster_path.as_deref(),
            );
        }

        self.update(item.clone()).await?;
        Ok(Some(item))
    }

    /// Backfill every item that still needs it, one at a time.
    pub async fn backfill_missing(&self) -> Result<BackfillReport> {
        let pending: Vec<CatalogId> = self
            .snapshot()
            .await?
            .iter()
            .filter(|item| item.needs_backfill())
            .map(CollectionItem::id)
            .collect();

        let mut report = BackfillReport::default();
        for id in pending {
            match self.backfill(id).await {
                Ok(Some(_)) => report.updated += 1,
                Ok(None) => {}
                Err(CollectionError::Provider(err)) => {
                    warn!(id = %id, error = %err, "backfill failed");
                    report.failed += 1;
                }
                Err(err) => return Err(err),
            }
        }

        info!(updated = report.updated, failed = report.failed, "backfill finished");
        Ok(report)
    }

    pub async fn snapshot(&self) -> Result<CollectionState> {
        self.read(Clone::clone).await
    }

    pub async fn get(&self, id: CatalogId) -> Result<Option<CollectionItem>> {
        self.read(|state| state.get(id).cloned()).await
    }

    pub async fn items(&self, rating: Rating) -> Result<Vec<CollectionItem>> {
        self.read(|state| state.partition(rating).to_vec()).await
    }

    pub async fn len(&self) -> Result<usize> {
        self.read(CollectionState::len).await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        self.read(CollectionState::is_empty).await
    }

    pub async fn titles(&self) -> Result<Vec<String>> {
        self.read(|state| state.titles().into_iter().map(str::to_string).collect())
            .await
    }

    pub async fn counts(&self) -> Result<[(Rating, usize); 4]> {
        self.read(CollectionState::counts).await
    }

    async fn ensure_initialized(&self) -> Result<()> {
        self.read(|_| ()).await
    }

    async fn read<T>(&self, f: impl FnOnce(&CollectionState) -> T) -> Result<T> {
        let guard = self.state.read().await;
        guard.as_ref().map(f).ok_or(CollectionError::NotInitialized)
    }

    /// Run `f` under the write lock and persist when it reports a change.
    async fn mutate(&self, f: impl FnOnce(&mut CollectionState) -> bool) -> Result<()> {
        let mut guard = self.state.write().await;
        let state = guard.as_mut().ok_or(CollectionError::NotInitialized)?;
        if f(state) {
            self.storage.save(state)?;
        }
        Ok(())
    }
}
