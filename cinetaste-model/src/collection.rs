//! The rating-partitioned collection.
//!
//! [`CollectionState`] keeps at most one [`CollectionItem`] per
//! [`CatalogId`] across all four partitions, and every partition ordered
//! newest-first by `created_at`. Both invariants are maintained by
//! [`CollectionState::insert`] and [`CollectionState::update`]; nothing else
//! adds items.

use crate::{CatalogId, CatalogRecord, Category, MediaKind, Rating};

/// A catalog record the user has rated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CollectionItem {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub record: CatalogRecord,
    pub rating: Rating,
    /// Insertion stamp in milliseconds. Only used for ordering.
    pub created_at: i64,
}

impl CollectionItem {
    pub fn new(record: CatalogRecord, rating: Rating, created_at: i64) -> Self {
        Self {
            record,
            rating,
            created_at,
        }
    }

    pub fn id(&self) -> CatalogId {
        self.record.id
    }

    pub fn title(&self) -> &str {
        &self.record.title
    }

    /// Whether the lazily fetched fields are still missing.
    pub fn needs_backfill(&self) -> bool {
        let synopsis_missing = self
            .record
            .synopsis
            .as_deref()
            .is_none_or(|s| s.trim().is_empty());
        synopsis_missing || self.record.poster_url.is_none()
    }
}

/// Static dataset entry used to seed an empty collection. Also the shape of
/// the one-line snippet exported for existing items.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BootstrapEntry {
    pub id: CatalogId,
    pub kind: MediaKind,
    pub title: String,
    pub category: Category,
    pub genre: String,
}

impl BootstrapEntry {
    pub fn into_item(self, rating: Rating, created_at: i64) -> CollectionItem {
        CollectionItem::new(
            CatalogRecord {
                id: self.id,
                kind: self.kind,
                title: self.title,
                category: self.category,
                genre: self.genre,
                synopsis: None,
                poster_url: None,
            },
            rating,
            created_at,
        )
    }
}

impl From<&CollectionItem> for BootstrapEntry {
    fn from(item: &CollectionItem) -> Self {
        Self {
            id: item.record.id,
            kind: item.record.kind,
            title: item.record.title.clone(),
            category: item.record.category,
            genre: item.record.genre.clone(),
        }
    }
}

/// Result of [`CollectionState::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The item changed partitions.
    Moved { from: Rating, to: Rating },
    /// The item was replaced in its current slot.
    Replaced,
    /// No item with that id exists; nothing was touched.
    Missing,
}

impl UpdateOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, UpdateOutcome::Missing)
    }
}

/// Mapping from rating to an ordered, newest-first sequence of items.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CollectionState {
    pub loved: Vec<CollectionItem>,
    pub liked: Vec<CollectionItem>,
    pub meh: Vec<CollectionItem>,
    pub disliked: Vec<CollectionItem>,
}

impl CollectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition(&self, rating: Rating) -> &[CollectionItem] {
        match rating {
            Rating::Loved => &self.loved,
            Rating::Liked => &self.liked,
            Rating::Meh => &self.meh,
            Rating::Disliked => &self.disliked,
        }
    }

    fn partition_mut(&mut self, rating: Rating) -> &mut Vec<CollectionItem> {
        match rating {
            Rating::Loved => &mut self.loved,
            Rating::Liked => &mut self.liked,
            Rating::Meh => &mut self.meh,
            Rating::Disliked => &mut self.disliked,
        }
    }

    /// Partition and index of the item with `id`.
    pub fn locate(&self, id: CatalogId) -> Option<(Rating, usize)> {
        Rating::ALL.into_iter().find_map(|rating| {
            self.partition(rating)
                .iter()
                .position(|item| item.id() == id)
                .map(|index| (rating, index))
        })
    }

    pub fn get(&self, id: CatalogId) -> Option<&CollectionItem> {
        self.locate(id)
            .map(|(rating, index)| &self.partition(rating)[index])
    }

    pub fn contains(&self, id: CatalogId) -> bool {
        self.locate(id).is_some()
    }

    /// Insert `item` into the partition named by its rating, removing every
    /// prior occurrence of its id first. Returns the displaced item, if any.
    pub fn insert(&mut self, item: CollectionItem) -> Option<CollectionItem> {
        let displaced = self.remove(item.id());
        let rating = item.rating;
        self.partition_mut(rating).push(item);
        self.sort_partition(rating);
        displaced
    }

    /// Remove the item with `id` from whichever partition holds it.
    pub fn remove(&mut self, id: CatalogId) -> Option<CollectionItem> {
        let mut removed = None;
        for rating in Rating::ALL {
            let partition = self.partition_mut(rating);
            while let Some(index) =
                partition.iter().position(|item| item.id() == id)
            {
                let item = partition.remove(index);
                removed.get_or_insert(item);
            }
        }
        removed
    }

    /// Apply `incoming` to the existing item with the same id.
    ///
    /// A rating change moves the item and re-sorts the target partition; an
    /// unchanged rating replaces it in place. The stored `created_at` is
    /// kept either way, so ordering never depends on the caller's copy.
    pub fn update(&mut self, mut incoming: CollectionItem) -> UpdateOutcome {
        let Some((current, index)) = self.locate(incoming.id()) else {
            return UpdateOutcome::Missing;
        };

        incoming.created_at = self.partition(current)[index].created_at;

        if current == incoming.rating {
            self.partition_mut(current)[index] = incoming;
            return UpdateOutcome::Replaced;
        }

        let target = incoming.rating;
        self.partition_mut(current).remove(index);
        self.partition_mut(target).push(incoming);
        self.sort_partition(target);
        UpdateOutcome::Moved {
            from: current,
            to: target,
        }
    }

    /// Re-establish the collection invariants on state from outside, such as
    /// a stored file: one item per id (the newest stamp wins, the earlier
    /// partition on a tie), each item's rating matching its partition, and
    /// every partition newest-first. Returns whether anything changed.
    pub fn normalize(&mut self) -> bool {
        let before = self.clone();

        let mut kept: Vec<CollectionItem> = Vec::with_capacity(self.len());
        for rating in Rating::ALL {
            for mut item in std::mem::take(self.partition_mut(rating)) {
                item.rating = rating;
                match kept.iter_mut().find(|k| k.id() == item.id()) {
                    Some(existing) if existing.created_at < item.created_at => {
                        *existing = item
                    }
                    Some(_) => {}
                    None => kept.push(item),
                }
            }
        }

        for item in kept {
            let rating = item.rating;
            self.partition_mut(rating).push(item);
        }
        for rating in Rating::ALL {
            self.sort_partition(rating);
        }

        *self != before
    }

    fn sort_partition(&mut self, rating: Rating) {
        self.partition_mut(rating)
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    /// All items, partition by partition in [`Rating::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &CollectionItem> {
        Rating::ALL
            .into_iter()
            .flat_map(move |rating| self.partition(rating).iter())
    }

    pub fn len(&self) -> usize {
        Rating::ALL
            .into_iter()
            .map(|rating| self.partition(rating).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn counts(&self) -> [(Rating, usize); 4] {
        Rating::ALL.map(|rating| (rating, self.partition(rating).len()))
    }

    pub fn titles(&self) -> Vec<&str> {
        self.iter().map(CollectionItem::title).collect()
    }

    pub fn latest_timestamp(&self) -> Option<i64> {
        self.iter().map(|item| item.created_at).max()
    }
}
