//! File-backed storage engine with atomic writes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{StorageEngine, StorageError, StorageResult};

/// Extension for fully-written blob files.
const BLOB_EXT: &str = "bin";

/// Extension for in-progress writes, renamed over the blob on completion.
const TMP_EXT: &str = "tmp";

/// A [`StorageEngine`] storing one file per identifier under a directory.
///
/// Identifiers are hex-encoded to form filesystem-safe file names, so any
/// UTF-8 identifier is accepted. Writes use the write-to-temp-then-rename
/// pattern: the blob file is always either the complete old content or the
/// complete new content, never a partial state.
#[derive(Debug)]
pub struct DirectoryStorageEngine {
    root: PathBuf,
}

impl DirectoryStorageEngine {
    /// Creates an engine rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new<P: Into<PathBuf>>(root: P) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StorageError::io("create storage root", e))?;
        Ok(Self { root })
    }

    /// Returns the root directory of this engine.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, id: &str) -> PathBuf {
        self.root
            .join(format!("{}.{BLOB_EXT}", hex::encode(id.as_bytes())))
    }
}

impl StorageEngine for DirectoryStorageEngine {
    fn get(&self, id: &str) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(self.blob_path(id)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io("get", e)),
        }
    }

    fn put(&self, id: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.blob_path(id);
        let tmp = path.with_extension(TMP_EXT);
        {
            let mut file = fs::File::create(&tmp).map_err(|e| StorageError::io("put", e))?;
            file.write_all(data).map_err(|e| StorageError::io("put", e))?;
            file.sync_all().map_err(|e| StorageError::io("put", e))?;
        }
        fs::rename(&tmp, &path).map_err(|e| StorageError::io("put rename", e))
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        match fs::remove_file(self.blob_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io("delete", e)),
        }
    }

    fn enumerate(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let mut ids = Vec::new();
        let entries =
            fs::read_dir(&self.root).map_err(|e| StorageError::io("enumerate", e))?;
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io("enumerate", e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // Skip in-progress writes left over from a crash.
            let Some(stem) = name.strip_suffix(&format!(".{BLOB_EXT}")) else {
                continue;
            };
            let bytes = hex::decode(stem).map_err(|_| StorageError::InvalidId {
                name: name.clone(),
            })?;
            let id = String::from_utf8(bytes)
                .map_err(|_| StorageError::InvalidId { name })?;
            if id.starts_with(prefix) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}
