//! Persistence adapter: whole-collection JSON files in a data directory.
//!
//! Each logical keyspace (active notes, archived notes, trashed notes, tags)
//! lives in its own file and is saved and loaded independently, so a corrupt
//! or missing file for one collection never affects the others.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, trace, warn};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::{NoteError, Result};

/// The four independent keyspaces of the persisted state. File names carry
/// over from the original localStorage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    Notes,
    Archived,
    Trashed,
    Tags,
}

impl StoreKey {
    pub fn file_name(self) -> &'static str {
        match self {
            StoreKey::Notes => "cakit-notes.json",
            StoreKey::Archived => "cakit-archived-notes.json",
            StoreKey::Trashed => "cakit-trashed-notes.json",
            StoreKey::Tags => "cakit-tags.json",
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Key-value persistence over a local data directory.
pub struct CollectionStore {
    data_dir: PathBuf,
}

impl CollectionStore {
    /// Opens a store rooted at `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        if !data_dir.exists() {
            debug!("Data directory does not exist, creating: {}", data_dir.display());
            fs::create_dir_all(&data_dir).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                NoteError::DirectoryError {
                    path: data_dir.clone(),
                }
            })?;
        }
        Ok(Self { data_dir })
    }

    fn key_path(&self, key: StoreKey) -> PathBuf {
        self.data_dir.join(key.file_name())
    }

    /// Serializes `value` under `key`, fully overwriting any previous value.
    ///
    /// The write goes through a temporary file in the same directory and is
    /// moved into place atomically, so a crash mid-write never leaves a
    /// half-written collection behind.
    pub fn save<T: Serialize>(&self, key: StoreKey, value: &T) -> Result<()> {
        let file_path = self.key_path(key);
        debug!("Saving collection to {}", file_path.display());

        let mut temp_file = NamedTempFile::new_in(&self.data_dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            NoteError::Io(e)
        })?;

        trace!("Serializing collection for key {}", key);
        let json = serde_json::to_string_pretty(value).map_err(|e| {
            error!("Failed to serialize collection for {}: {}", key, e);
            NoteError::Serialization(e)
        })?;

        temp_file.write_all(json.as_bytes()).map_err(|e| {
            error!("Failed to write to temporary file: {}", e);
            NoteError::Io(e)
        })?;
        temp_file.flush().map_err(NoteError::Io)?;

        temp_file.persist(&file_path).map_err(|e| {
            error!("Failed to persist {}: {}", file_path.display(), e.error);
            NoteError::Io(e.error)
        })?;

        trace!("Collection saved: {}", key);
        Ok(())
    }

    /// Loads the collection stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has ever been saved under the key.
    /// Returns [`NoteError::StorageCorrupt`] when a file exists but does not
    /// deserialize into the expected shape.
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>> {
        let file_path = self.key_path(key);
        if !file_path.exists() {
            debug!("No data stored under {}", key);
            return Ok(None);
        }

        let content = fs::read_to_string(&file_path).map_err(|e| {
            error!("Failed to read {}: {}", file_path.display(), e);
            NoteError::Io(e)
        })?;

        match serde_json::from_str(&content) {
            Ok(value) => {
                trace!("Loaded collection from {}", file_path.display());
                Ok(Some(value))
            }
            Err(e) => {
                warn!("Stored data under {} is corrupt: {}", key, e);
                Err(NoteError::StorageCorrupt {
                    key: key.file_name().to_string(),
                    source: e,
                })
            }
        }
    }

    /// Loads a collection, substituting an empty default when the key is
    /// absent or its data is corrupt. Corruption is logged and the collection
    /// degrades to empty rather than failing the whole load.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: StoreKey) -> Result<T> {
        match self.load(key) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Ok(T::default()),
            Err(NoteError::StorageCorrupt { key, .. }) => {
                warn!("Falling back to empty collection for corrupt key {}", key);
                Ok(T::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
