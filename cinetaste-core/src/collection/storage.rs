use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use cinetaste_model::CollectionState;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StorageError;

/// The one key the whole collection is stored under.
pub const STORAGE_KEY: &str = "watchedData";

/// Whole-state persistence. Absence of data is `Ok(None)`, not an error.
pub trait CollectionStorage: Send + Sync {
    fn load(&self) -> Result<Option<CollectionState>, StorageError>;

    /// Replace the stored state with `state`.
    fn save(&self, state: &CollectionState) -> Result<(), StorageError>;
}

/// `<dir>/watchedData.json`, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{STORAGE_KEY}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CollectionStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<CollectionState>, StorageError> {
        let path = self.path();
        // Bytes, not a String: invalid UTF-8 is a parse failure, not an I/O one.
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    fn save(&self, state: &CollectionState) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut tmp, state)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path()).map_err(|err| err.error)?;

        debug!(path = %self.path().display(), items = state.len(), "collection saved");
        Ok(())
    }
}

/// In-memory storage holding the serialized form, with a save counter.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    raw: Mutex<Option<String>>,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with arbitrary stored text, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn with_state(state: &CollectionState) -> Result<Self, StorageError> {
        Ok(Self::with_raw(serde_json::to_string(state)?))
    }

    /// Number of successful saves so far.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn raw(&self) -> Option<String> {
        self.raw
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl CollectionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<CollectionState>, StorageError> {
        match self.raw() {
            Some(raw) if !raw.trim().is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    fn save(&self, state: &CollectionState) -> Result<(), StorageError> {
        let raw = serde_json::to_string(state)?;
        *self
            .raw
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(raw);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cinetaste_model::{CatalogId, CatalogRecord, Category, CollectionItem, MediaKind, Rating};
    use tempfile::tempdir;

    use super::*;

    fn sample_state() -> CollectionState {
        let mut state = CollectionState::new();
        state.insert(CollectionItem::new(
            CatalogRecord {
                id: CatalogId(70523),
                kind: MediaKind::Series,
                title: "Dark (2017)".into(),
                category: Category::Series,
                genre: "Crime".into(),
                synopsis: None,
                poster_url: None,
            },
            Rating::Liked,
            1_700_000_000_000,
        ));
        state
    }

    #[test]
    fn missing_file_loads_as_absent() {
        let dir = tempdir().expect("tempdir");
        let storage = JsonFileStorage::new(dir.path().join("nested"));
        assert!(storage.load().expect("load").is_none());
    }

    #[test]
    fn file_storage_replaces_whole_state() {
        let dir = tempdir().expect("tempdir");
        let storage = JsonFileStorage::new(dir.path());

        let state = sample_state();
        storage.save(&state).expect("save");
        assert_eq!(storage.load().expect("load"), Some(state));

        storage.save(&CollectionState::new()).expect("save");
        assert_eq!(storage.load().expect("load"), Some(CollectionState::new()));
        assert!(storage.path().ends_with("watchedData.json"));
    }

    #[test]
    fn stored_layout_uses_rating_keys_and_camel_case() {
        let storage = MemoryStorage::new();
        storage.save(&sample_state()).expect("save");

        let value: serde_json::Value =
            serde_json::from_str(&storage.raw().expect("raw")).expect("json");
        let item = &value["liked"][0];
        assert_eq!(item["id"], 70523);
        assert_eq!(item["kind"], "tv");
        assert_eq!(item["rating"], "liked");
        assert_eq!(item["createdAt"], 1_700_000_000_000i64);
        assert!(item.get("synopsis").is_none());
        assert_eq!(storage.saves(), 1);
    }

    #[test]
    fn malformed_text_is_a_serialization_error() {
        let storage = MemoryStorage::with_raw("{ not json");
        assert!(matches!(
            storage.load(),
            Err(StorageError::Serialization(_))
        ));
    }
}
