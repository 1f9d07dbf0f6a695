// SPDX-License-Identifier: MPL-2.0
use crate::domain::media::{EntryId, FolderId};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    /// Folder store file could not be read or written.
    #[error("State Error: {0}")]
    State(String),

    /// A folder (or the folder root of a scan) refused access.
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Folder already linked: {}", .0.display())]
    FolderAlreadyLinked(PathBuf),

    #[error("Unknown folder: {0}")]
    UnknownFolder(FolderId),

    /// The id was never issued by the catalog.
    #[error("Unknown entry: {0}")]
    UnknownEntry(EntryId),

    /// Playback registration for an entry that is not a video.
    #[error("Entry {0} is not playable")]
    NotPlayable(EntryId),

    /// Release requested while a playback surface is still registered.
    #[error("Entry {0} still has a registered playback surface")]
    PlaybackActive(EntryId),

    #[error("Materialization failed: {0}")]
    Materialization(String),
}

impl Error {
    /// Builds an error from an I/O failure on `path`, keeping permission
    /// failures distinguishable from other I/O errors.
    #[must_use]
    pub fn from_io_at(err: &io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            Error::PermissionDenied(path.into())
        } else {
            Error::Io(err.to_string())
        }
    }

    /// Returns `true` for folder-level access failures.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Error::PermissionDenied(_))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl<T: std::fmt::Debug> From<ciborium::de::Error<T>> for Error {
    fn from(err: ciborium::de::Error<T>) -> Self {
        Error::State(err.to_string())
    }
}

impl<T: std::fmt::Debug> From<ciborium::ser::Error<T>> for Error {
    fn from(err: ciborium::ser::Error<T>) -> Self {
        Error::State(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
