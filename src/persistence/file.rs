//! JSON file backend (native only)
//!
//! The whole map is rewritten on every `set`: write to `<path>.tmp`, then
//! rename over `<path>`, so a crash mid-write leaves the old file intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking every future write
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(StoreError::Corrupt(e)) => {
                log::warn!("Overwriting corrupt store {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(key.to_string(), value.to_string());

        let json = serde_json::to_string_pretty(&map)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("panda-run-{}-{}", name, std::process::id()));
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("store.json");
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let store = FileStore::new(temp_file("missing"));
        assert!(store.get("panda_high_score").unwrap().is_none());
    }

    #[test]
    fn test_set_persists_across_instances() {
        let path = temp_file("persist");
        let mut store = FileStore::new(&path);
        store.set("panda_high_score", "120").unwrap();
        store.set("other", "x").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("panda_high_score").unwrap().as_deref(), Some("120"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_corrupt_file_errors_on_read_and_recovers_on_write() {
        let path = temp_file("corrupt");
        fs::write(&path, "not json").unwrap();
        let mut store = FileStore::new(&path);
        assert!(matches!(store.get("k"), Err(StoreError::Corrupt(_))));

        store.set("k", "1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1"));
    }
}
