// SPDX-License-Identifier: MPL-2.0
//! Folder bookmark stores.
//!
//! [`CborFolderStore`] keeps the linked folders in `folders.cbor` inside the
//! application data directory, next to nothing else the user edits by hand
//! (preferences live in `settings.toml`). [`MemoryFolderStore`] keeps them
//! for the lifetime of the process only.

use crate::application::port::FolderStore;
use crate::domain::media::{Folder, FolderId, FolderLocator};
use crate::error::{Error, Result};
use crate::paths::AppDir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Folder list file name within the app data directory.
const FOLDERS_FILE: &str = "folders.cbor";

/// Serialized form of the folder list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct FolderList {
    /// Next id to issue. Persisted so ids are never reused.
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    folders: Vec<Folder>,
}

impl FolderList {
    fn link(&mut self, locator: FolderLocator) -> Result<Folder> {
        if self.folders.iter().any(|folder| folder.locator == locator) {
            return Err(Error::FolderAlreadyLinked(locator.as_path().to_path_buf()));
        }

        let folder = Folder {
            id: FolderId::new(self.next_id),
            name: locator.display_name(),
            locator,
        };
        self.next_id += 1;
        self.folders.push(folder.clone());
        Ok(folder)
    }

    fn unlink(&mut self, id: FolderId) -> bool {
        let before = self.folders.len();
        self.folders.retain(|folder| folder.id != id);
        self.folders.len() != before
    }
}

/// Resolves `locator` to a canonical, existing directory.
fn canonical_directory(locator: &FolderLocator) -> Result<FolderLocator> {
    let path = locator.as_path();
    let canonical = fs::canonicalize(path).map_err(|err| Error::from_io_at(&err, path))?;
    if !canonical.is_dir() {
        return Err(Error::NotADirectory(canonical));
    }
    Ok(FolderLocator::new(canonical))
}

// =============================================================================
// CBOR file store
// =============================================================================

/// Warning key returned when `folders.cbor` exists but cannot be read.
pub const STORE_READ_WARNING: &str = "folders-read-error";

/// Warning key returned when `folders.cbor` cannot be decoded.
pub const STORE_PARSE_WARNING: &str = "folders-parse-error";

/// [`FolderStore`] persisted as CBOR.
///
/// Every change is written before it becomes visible; a failed write leaves
/// the in-memory list as it was.
#[derive(Debug)]
pub struct CborFolderStore {
    path: PathBuf,
    list: FolderList,
}

impl CborFolderStore {
    /// Loads the store from the default data directory.
    ///
    /// See [`CborFolderStore::load_with_override`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::State`] if no data directory can be determined.
    pub fn load_default() -> Result<(Self, Option<String>)> {
        Self::load_with_override(None)
    }

    /// Loads the store from `base_dir`, falling back to the default data directory.
    ///
    /// An unreadable or corrupt file yields an empty store plus
    /// [`STORE_READ_WARNING`] or [`STORE_PARSE_WARNING`]; the file is only
    /// replaced on the next change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::State`] if no data directory can be determined.
    pub fn load_with_override(base_dir: Option<PathBuf>) -> Result<(Self, Option<String>)> {
        let dir = AppDir::Data
            .resolve(base_dir)
            .ok_or_else(|| Error::State("data directory unavailable".to_string()))?;
        match Self::open(&dir) {
            Ok(store) => Ok((store, None)),
            Err(err) => {
                let warning = match err {
                    Error::State(_) => STORE_PARSE_WARNING,
                    _ => STORE_READ_WARNING,
                };
                tracing::warn!(dir = %dir.display(), %err, "starting with no linked folders");
                let store = Self {
                    path: dir.join(FOLDERS_FILE),
                    list: FolderList::default(),
                };
                Ok((store, Some(warning.to_string())))
            }
        }
    }

    /// Opens (or starts) the folder list in `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or decoded.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(FOLDERS_FILE);
        let list = if path.exists() {
            let file = fs::File::open(&path)?;
            ciborium::from_reader(BufReader::new(file))?
        } else {
            FolderList::default()
        };
        tracing::debug!(
            path = %path.display(),
            folders = list.folders.len(),
            "opened folder store"
        );
        Ok(Self { path, list })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `list` and adopts it once it is on disk.
    fn commit(&mut self, list: FolderList) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(&self.path)?;
        ciborium::into_writer(&list, BufWriter::new(file))?;
        self.list = list;
        Ok(())
    }
}

impl FolderStore for CborFolderStore {
    fn list(&self) -> Result<Vec<Folder>> {
        Ok(self.list.folders.clone())
    }

    fn add(&mut self, locator: FolderLocator) -> Result<Folder> {
        let locator = canonical_directory(&locator)?;
        let mut list = self.list.clone();
        let folder = list.link(locator)?;
        self.commit(list)?;
        Ok(folder)
    }

    fn remove(&mut self, id: FolderId) -> Result<()> {
        let mut list = self.list.clone();
        if list.unlink(id) {
            self.commit(list)?;
        }
        Ok(())
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// [`FolderStore`] kept in memory. Locators are taken as given; the
/// filesystem is never consulted.
#[derive(Debug, Default)]
pub struct MemoryFolderStore {
    list: FolderList,
}

impl MemoryFolderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FolderStore for MemoryFolderStore {
    fn list(&self) -> Result<Vec<Folder>> {
        Ok(self.list.folders.clone())
    }

    fn add(&mut self, locator: FolderLocator) -> Result<Folder> {
        self.list.link(locator)
    }

    fn remove(&mut self, id: FolderId) -> Result<()> {
        self.list.unlink(id);
        Ok(())
    }
}
