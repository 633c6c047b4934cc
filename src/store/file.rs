//! JSON file schema store
//!
//! All entries live in one JSON object (`{ key: serialized }`) on disk. The
//! file is read once when the store is opened and rewritten after every
//! change.

use super::traits::SchemaStore;
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read store {}: {}", path.display(), e))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)
                    .map_err(|e| anyhow!("Failed to parse store {}: {}", path.display(), e))?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "Opened form store");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `entries` to disk, then adopt them. On failure the in-memory
    /// entries keep matching the file.
    fn commit(&mut self, entries: BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow!("Failed to create {}: {}", parent.display(), e))?;
        }
        let content = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, content)
            .map_err(|e| anyhow!("Failed to write store {}: {}", self.path.display(), e))?;
        self.entries = entries;
        Ok(())
    }
}

impl SchemaStore for JsonFileStore {
    fn put(&mut self, key: &str, serialized: String) -> Result<()> {
        let mut staged = self.entries.clone();
        staged.insert(key.to_string(), serialized);
        self.commit(staged)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut staged = self.entries.clone();
        staged.remove(key);
        self.commit(staged)
    }

    fn entries(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_opens_empty() {
        let tmp = tempdir().unwrap();
        let store = JsonFileStore::open(tmp.path().join("forms.json")).unwrap();
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn test_entries_survive_reopen() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("forms.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.put("Signup", "{\"name\":\"Signup\"}".into()).unwrap();
        store.put("Survey", "{}".into()).unwrap();
        store.delete("Survey").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("Signup").unwrap(),
            Some("{\"name\":\"Signup\"}".to_string())
        );
        assert_eq!(reopened.get("Survey").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("forms.json");
        fs::write(&path, "not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse store"));
    }

    #[test]
    fn test_failed_write_leaves_entries_unchanged() {
        let tmp = tempdir().unwrap();
        let good = tmp.path().join("forms.json");
        let mut store = JsonFileStore::open(&good).unwrap();
        store.put("Survey", "{}".into()).unwrap();

        // A regular file where the store's directory should be
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        store.path = blocker.join("forms.json");

        assert!(store.put("Signup", "{}".into()).is_err());
        assert_eq!(store.get("Signup").unwrap(), None);

        assert!(store.delete("Survey").is_err());
        assert_eq!(store.get("Survey").unwrap(), Some("{}".to_string()));
    }

    #[test]
    fn test_unwritable_location_put_fails_cleanly() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let mut store = JsonFileStore::open(blocker.join("forms.json")).unwrap();
        assert!(store.put("Signup", "{}".into()).is_err());
        assert!(store.entries().unwrap().is_empty());
    }
}
