use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const VISITOR_ID_FILENAME: &str = "visitor_id.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VisitorIdFile {
    visitor_id: String,
}

/// Anonymous visitor handle, persisted under a well-known file in the app
/// data directory. One id per OS profile, stable across report views and
/// app restarts; unrelated to the signed-in account. Deleting the file
/// mints a fresh id on next use.
pub struct VisitorIdStore {
    path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl VisitorIdStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(VISITOR_ID_FILENAME),
            cached: RwLock::new(None),
        }
    }

    /// Return the stored id, generating and persisting one on first use.
    /// Errors mean the backing storage is unavailable; callers treat that as
    /// "tracking disabled", never as a user-facing failure.
    pub fn get_or_create(&self) -> Result<String> {
        if let Some(id) = self.cached.read().unwrap().clone() {
            return Ok(id);
        }

        let mut guard = self.cached.write().unwrap();
        // Another caller may have won the race between locks.
        if let Some(id) = guard.clone() {
            return Ok(id);
        }

        let id = match self.read_existing()? {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4().to_string();
                self.persist(&id)?;
                id
            }
        };

        *guard = Some(id.clone());
        Ok(id)
    }

    fn read_existing(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read visitor id from {}", self.path.display()))?;

        // A corrupt file is treated like a missing one; a fresh id replaces it.
        match serde_json::from_str::<VisitorIdFile>(&contents) {
            Ok(file) if !file.visitor_id.is_empty() => Ok(Some(file.visitor_id)),
            _ => Ok(None),
        }
    }

    fn persist(&self, id: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create visitor id directory {}", parent.display())
            })?;
        }

        let serialized = serde_json::to_string_pretty(&VisitorIdFile {
            visitor_id: id.to_string(),
        })?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write visitor id to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn same_id_across_calls_and_instances() {
        let dir = TempDir::new().unwrap();

        let store = VisitorIdStore::new(dir.path());
        let first = store.get_or_create().unwrap();
        let second = store.get_or_create().unwrap();
        assert_eq!(first, second);

        // A fresh instance over the same directory reads the persisted id.
        let reopened = VisitorIdStore::new(dir.path());
        assert_eq!(reopened.get_or_create().unwrap(), first);
    }

    #[test]
    fn clearing_storage_mints_a_new_id() {
        let dir = TempDir::new().unwrap();

        let store = VisitorIdStore::new(dir.path());
        let first = store.get_or_create().unwrap();

        std::fs::remove_file(dir.path().join(VISITOR_ID_FILENAME)).unwrap();

        let cleared = VisitorIdStore::new(dir.path());
        let second = cleared.get_or_create().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn corrupt_file_is_replaced() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(VISITOR_ID_FILENAME), "not json").unwrap();

        let store = VisitorIdStore::new(dir.path());
        let id = store.get_or_create().unwrap();
        assert!(!id.is_empty());

        // The repaired file round-trips.
        let reopened = VisitorIdStore::new(dir.path());
        assert_eq!(reopened.get_or_create().unwrap(), id);
    }
}
