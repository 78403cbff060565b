//! In-memory storage engine for testing and short-lived holders.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::{StorageEngine, StorageError, StorageResult};

/// A [`StorageEngine`] backed by a process-local map.
///
/// Contents are lost when the engine is dropped. Intended for unit tests and
/// ephemeral holders that never persist across restarts.
#[derive(Debug, Default)]
pub struct EphemeralStorageEngine {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl EphemeralStorageEngine {
    /// Creates a new, empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageEngine for EphemeralStorageEngine {
    fn get(&self, id: &str) -> StorageResult<Option<Vec<u8>>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| StorageError::internal("blob map poisoned"))?;
        Ok(blobs.get(id).cloned())
    }

    fn put(&self, id: &str, data: &[u8]) -> StorageResult<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| StorageError::internal("blob map poisoned"))?;
        blobs.insert(id.to_string(), data.to_vec());
        Ok(())
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| StorageError::internal("blob map poisoned"))?;
        blobs.remove(id);
        Ok(())
    }

    fn enumerate(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| StorageError::internal("blob map poisoned"))?;
        Ok(blobs
            .keys()
            .filter(|id| id.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_delete() {
        let engine = EphemeralStorageEngine::new();
        assert!(engine.get("a").unwrap().is_none());
        engine.put("a", b"hello").unwrap();
        assert_eq!(engine.get("a").unwrap().unwrap(), b"hello");
        engine.put("a", b"world").unwrap();
        assert_eq!(engine.get("a").unwrap().unwrap(), b"world");
        engine.delete("a").unwrap();
        assert!(engine.get("a").unwrap().is_none());
        // Deleting again is a no-op.
        engine.delete("a").unwrap();
    }

    #[test]
    fn test_enumerate_prefix() {
        let engine = EphemeralStorageEngine::new();
        engine.put("cred/alpha", b"1").unwrap();
        engine.put("cred/beta", b"2").unwrap();
        engine.put("key/alpha", b"3").unwrap();
        let mut ids = engine.enumerate("cred/").unwrap();
        ids.sort();
        assert_eq!(ids, vec!["cred/alpha", "cred/beta"]);
        assert_eq!(engine.enumerate("").unwrap().len(), 3);
    }
}
