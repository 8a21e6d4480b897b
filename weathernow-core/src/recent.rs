//! Bounded, de-duplicated, most-recent-first list of past lookups.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::RecentSearchEntry;

pub const MAX_RECENT_SEARCHES: usize = 3;

/// Durable slot holding the serialized list.
pub trait SearchStorage: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, contents: &str) -> Result<()>;
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "recent_searches.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SearchStorage for FileStorage {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Ok(Some(contents))
    }

    fn save(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write beside the target and rename over it, so an interrupted
        // save never leaves a truncated list behind.
        let tmp = self.tmp_path();
        fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| {
            format!("Failed to move {} to {}", tmp.display(), self.path.display())
        })
    }
}

/// Process-local slot, for tests and embedders without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(contents.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl SearchStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, contents: &str) -> Result<()> {
        *self.slot.lock() = Some(contents.to_string());
        Ok(())
    }
}

pub struct RecentSearchStore {
    storage: Box<dyn SearchStorage>,
    entries: Vec<RecentSearchEntry>,
}

impl std::fmt::Debug for RecentSearchStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentSearchStore")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl RecentSearchStore {
    /// Create a store and load whatever was persisted before.
    pub fn open(storage: Box<dyn SearchStorage>) -> Self {
        let mut store = Self {
            storage,
            entries: Vec::new(),
        };
        store.load();
        store
    }

    /// Re-read the persisted list. Missing or corrupt state loads as empty.
    pub fn load(&mut self) -> &[RecentSearchEntry] {
        self.entries = match self.storage.load() {
            Ok(Some(contents)) => match serde_json::from_str::<Vec<RecentSearchEntry>>(&contents) {
                Ok(entries) => sanitize(entries),
                Err(e) => {
                    tracing::warn!("Ignoring corrupt recent searches: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read recent searches: {e:#}");
                Vec::new()
            }
        };

        &self.entries
    }

    pub fn entries(&self) -> &[RecentSearchEntry] {
        &self.entries
    }

    /// Move `entry` to the front, dropping any older entry with the same
    /// name, and persist. A failed write is logged; the in-memory list is
    /// still updated.
    pub fn record(&mut self, entry: RecentSearchEntry) -> &[RecentSearchEntry] {
        self.entries.retain(|e| e.name != entry.name);
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_RECENT_SEARCHES);

        if let Err(e) = self.persist() {
            tracing::warn!("Could not save recent searches: {e:#}");
        }

        &self.entries
    }

    fn persist(&self) -> Result<()> {
        let json =
            serde_json::to_string(&self.entries).context("Failed to serialize recent searches")?;
        self.storage.save(&json)
    }
}

/// Re-establish the list invariants on state written by someone else.
fn sanitize(entries: Vec<RecentSearchEntry>) -> Vec<RecentSearchEntry> {
    let mut out: Vec<RecentSearchEntry> = Vec::with_capacity(MAX_RECENT_SEARCHES);
    for entry in entries {
        if out.len() == MAX_RECENT_SEARCHES {
            break;
        }
        if !out.iter().any(|e| e.name == entry.name) {
            out.push(entry);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn entry(name: &str, country: &str) -> RecentSearchEntry {
        RecentSearchEntry {
            name: name.into(),
            country: country.into(),
        }
    }

    fn names(entries: &[RecentSearchEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Lets a test keep a handle on storage the store owns.
    struct Shared(Arc<MemoryStorage>);

    impl SearchStorage for Shared {
        fn load(&self) -> Result<Option<String>> {
            self.0.load()
        }
        fn save(&self, contents: &str) -> Result<()> {
            self.0.save(contents)
        }
    }

    struct FailingStorage;

    impl SearchStorage for FailingStorage {
        fn load(&self) -> Result<Option<String>> {
            Err(anyhow::anyhow!("disk on fire"))
        }
        fn save(&self, _contents: &str) -> Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }
    }

    #[test]
    fn empty_storage_loads_empty() {
        let store = RecentSearchStore::open(Box::new(MemoryStorage::new()));
        assert!(store.entries().is_empty());
    }

    #[test]
    fn repeated_name_moves_to_front() {
        let mut store = RecentSearchStore::open(Box::new(MemoryStorage::new()));
        store.record(entry("A", "X"));
        store.record(entry("B", "Y"));
        let out = store.record(entry("A", "X"));

        assert_eq!(names(out), ["A", "B"]);
    }

    #[test]
    fn list_is_capped_at_three() {
        let mut store = RecentSearchStore::open(Box::new(MemoryStorage::new()));
        for name in ["Oslo", "Lima", "Rome", "Kyiv", "Pune"] {
            store.record(entry(name, "Somewhere"));
        }

        assert_eq!(names(store.entries()), ["Pune", "Kyiv", "Rome"]);
    }

    #[test]
    fn repeat_replaces_stale_country() {
        let mut store = RecentSearchStore::open(Box::new(MemoryStorage::new()));
        store.record(entry("Paris", "United States"));
        store.record(entry("Paris", "France"));

        assert_eq!(store.entries(), [entry("Paris", "France")]);
    }

    #[test]
    fn every_record_is_persisted() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = RecentSearchStore::open(Box::new(Shared(storage.clone())));

        store.record(entry("Paris", "France"));
        assert_eq!(
            storage.contents().as_deref(),
            Some(r#"[{"name":"Paris","country":"France"}]"#)
        );

        store.record(entry("Tokyo", "Japan"));
        let reopened = RecentSearchStore::open(Box::new(Shared(storage)));
        assert_eq!(names(reopened.entries()), ["Tokyo", "Paris"]);
    }

    #[test]
    fn corrupt_state_loads_empty() {
        let store = RecentSearchStore::open(Box::new(MemoryStorage::with_contents("{not json")));
        assert!(store.entries().is_empty());
    }

    #[test]
    fn loaded_state_is_sanitized() {
        let raw = r#"[
            {"name":"A","country":"1"},
            {"name":"A","country":"2"},
            {"name":"B","country":"3"},
            {"name":"C","country":"4"},
            {"name":"D","country":"5"}
        ]"#;
        let store = RecentSearchStore::open(Box::new(MemoryStorage::with_contents(raw)));

        assert_eq!(
            store.entries(),
            [entry("A", "1"), entry("B", "3"), entry("C", "4")]
        );
    }

    #[test]
    fn storage_failures_are_swallowed() {
        let mut store = RecentSearchStore::open(Box::new(FailingStorage));
        assert!(store.entries().is_empty());

        let out = store.record(entry("Paris", "France"));
        assert_eq!(names(out), ["Paris"]);
    }

    #[test]
    fn file_storage_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("recent.json");

        let mut store = RecentSearchStore::open(Box::new(FileStorage::new(&path)));
        assert!(store.entries().is_empty());

        store.record(entry("Tokyo", "Japan"));
        store.record(entry("Paris", "France"));
        let expected = store.entries().to_vec();

        let reopened = RecentSearchStore::open(Box::new(FileStorage::new(&path)));
        assert_eq!(reopened.entries(), expected.as_slice());
    }

    #[test]
    fn file_storage_save_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent.json");
        let storage = FileStorage::new(&path);

        storage.save(r#"[{"name":"Oslo","country":"Norway"}]"#).unwrap();
        storage.save("[]").unwrap();

        assert_eq!(storage.load().unwrap().as_deref(), Some("[]"));
        assert!(!dir.path().join("recent.json.tmp").exists());
        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn file_storage_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));
        assert!(storage.load().unwrap().is_none());
    }
}
