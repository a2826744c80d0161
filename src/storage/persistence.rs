//! Persistence adapter
//!
//! Serializes the complete entry collection as one JSON array under a single
//! key. It keeps no copy of the entries: `save` is called after every
//! mutation and `load` once at startup.

use crate::storage::error::StorageResult;
use crate::storage::kv::KeyValueStore;
use crate::storage::types::Entry;

/// Key the collection is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "bpbook_entries_v1";

/// Reads and writes the entry collection to a key-value store
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl Persistence {
    /// Create an adapter using the default storage key
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Create an adapter using a custom storage key
    pub fn with_key(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored collection
    ///
    /// A missing, unreadable or unparsable blob yields an empty collection.
    /// The failure is logged, never returned.
    pub fn load(&self) -> Vec<Entry> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read stored entries, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Entry>>(&raw) {
            Ok(entries) => {
                tracing::debug!(key = %self.key, count = entries.len(), "Loaded entries");
                entries
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Stored entries are corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the stored blob with the full collection
    pub fn save(&mut self, entries: &[Entry]) -> StorageResult<()> {
        let content = serde_json::to_string(entries)?;
        self.store.set(&self.key, &content)?;
        tracing::debug!(key = %self.key, count = entries.len(), "Saved entries");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::error::StorageError;
    use crate::storage::kv::{MemoryStore, SqliteStore};
    use crate::storage::types::Vitals;

    /// Store whose reads and writes always fail
    pub(crate) struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read denied",
            )))
        }

        fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "write denied",
            )))
        }
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let persistence = Persistence::new(Box::new(MemoryStore::new()));
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_blob_is_empty() {
        let store = MemoryStore::new().with(DEFAULT_STORAGE_KEY, "{not json");
        let persistence = Persistence::new(Box::new(store));
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_load_read_failure_is_empty() {
        let persistence = Persistence::new(Box::new(BrokenStore));
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut persistence = Persistence::new(Box::new(SqliteStore::in_memory().unwrap()));
        let entries = vec![
            Entry::with_id("b", 2, Vitals::new(130, 85, 70)),
            Entry::with_id("a", 1, Vitals::new(120, 80, 65)),
        ];

        persistence.save(&entries).unwrap();
        assert_eq!(persistence.load(), entries);
    }

    #[test]
    fn test_custom_key() {
        let mut persistence =
            Persistence::with_key(Box::new(MemoryStore::new()), "other_key");
        persistence
            .save(&[Entry::with_id("a", 1, Vitals::new(120, 80, 65))])
            .unwrap();

        assert_eq!(persistence.key(), "other_key");
        assert_eq!(persistence.load().len(), 1);
    }

    #[test]
    fn test_save_failure_is_surfaced() {
        let mut persistence = Persistence::new(Box::new(BrokenStore));
        assert!(persistence.save(&[]).is_err());
    }
}
