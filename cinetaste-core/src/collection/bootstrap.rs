use std::fs;
use std::path::Path;

use cinetaste_model::{BootstrapEntry, CollectionItem, CollectionState, Rating};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

const EMBEDDED: &str = include_str!("../../data/bootstrap.json");

/// Static seed for an empty collection, one list per rating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapDataset {
    pub loved: Vec<BootstrapEntry>,
    pub liked: Vec<BootstrapEntry>,
    pub meh: Vec<BootstrapEntry>,
    pub disliked: Vec<BootstrapEntry>,
}

impl BootstrapDataset {
    /// The dataset compiled into the crate.
    pub fn embedded() -> Result<Self, StorageError> {
        Ok(serde_json::from_str(EMBEDDED)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, StorageError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn entries(&self, rating: Rating) -> &[BootstrapEntry] {
        match rating {
            Rating::Loved => &self.loved,
            Rating::Liked => &self.liked,
            Rating::Meh => &self.meh,
            Rating::Disliked => &self.disliked,
        }
    }

    pub fn len(&self) -> usize {
        Rating::ALL.into_iter().map(|r| self.entries(r).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a collection stamped `now`, `now - 1`, `now - 2`, ... across the
    /// lists in rating order, so later entries sort as older.
    pub fn seed(&self, now: i64) -> CollectionState {
        let mut state = CollectionState::new();
        let mut offset = 0i64;
        for rating in Rating::ALL {
            for entry in self.entries(rating) {
                state.insert(entry.clone().into_item(rating, now - offset));
                offset += 1;
            }
        }
        state
    }
}

/// One-line bootstrap entry for an existing item, ready to paste into the
/// seed file.
pub fn seed_snippet(item: &CollectionItem) -> String {
    serde_json::to_string(&BootstrapEntry::from(item)).unwrap_or_default()
}
