// SPDX-License-Identifier: MPL-2.0
//! Folder bookmark persistence port.

use crate::domain::media::{Folder, FolderId, FolderLocator};
use crate::error::Result;

/// Persists the list of linked folders.
///
/// Implementations issue folder ids; ids are never reused within one store.
pub trait FolderStore: Send {
    /// Returns every linked folder in link order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn list(&self) -> Result<Vec<Folder>>;

    /// Links a new folder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotADirectory`](crate::error::Error::NotADirectory) if
    /// the locator does not name a directory and
    /// [`Error::FolderAlreadyLinked`](crate::error::Error::FolderAlreadyLinked)
    /// for duplicates.
    fn add(&mut self, locator: FolderLocator) -> Result<Folder>;

    /// Unlinks a folder. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn remove(&mut self, id: FolderId) -> Result<()>;
}
