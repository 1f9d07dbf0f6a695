// SPDX-License-Identifier: MPL-2.0
//! Core gallery types for the domain layer.
//!
//! These types represent pure data without any presentation or I/O
//! dependencies. Locators are opaque: only the infrastructure adapters that
//! produced them know how to turn them back into bytes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Kind of a catalog entry, derived once from the file name at ingestion.
///
/// Variants are declared in their string order so that the derived `Ord`
/// matches the "type" sort key (`gif` < `image` < `video`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    /// GIF animation or still.
    Gif,
    /// Static image (JPEG, PNG, WebP, ...).
    Image,
    /// Video container (MP4, WebM, ...).
    Video,
}

impl MediaKind {
    /// All kinds, in string order.
    pub const ALL: [MediaKind; 3] = [MediaKind::Gif, MediaKind::Image, MediaKind::Video];

    /// Returns the lowercase name used in settings and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Gif => "gif",
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Parses a lowercase kind name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "gif" => Some(MediaKind::Gif),
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    /// Returns `true` for kinds that have a playback surface.
    #[must_use]
    pub fn is_playable(self) -> bool {
        matches!(self, MediaKind::Video)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog-issued entry identifier. Monotonic, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

impl EntryId {
    /// Wraps a raw identifier value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-issued folder identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(u64);

impl FolderId {
    /// Wraps a raw identifier value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a linked folder lives. Only a [`DirectoryScanner`] interprets it.
///
/// [`DirectoryScanner`]: crate::application::port::DirectoryScanner
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderLocator(PathBuf);

impl FolderLocator {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Display name: the last path component, or the whole path for roots.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.0
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.display().to_string())
    }
}

/// Where a media file lives. Only a [`ContentFetcher`] interprets it.
///
/// [`ContentFetcher`]: crate::application::port::ContentFetcher
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaLocator(PathBuf);

impl MediaLocator {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.as_os_str().is_empty()
    }
}

/// A bookmarked folder record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub locator: FolderLocator,
}

/// One file as reported by a directory scan, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFileDescriptor {
    /// File name including extension.
    pub name: String,
    /// Locator for later content fetches.
    pub locator: MediaLocator,
    /// File size in bytes, when the scanner knows it.
    pub size: Option<u64>,
    /// Modification time in milliseconds since the Unix epoch, when known.
    pub modified_at: Option<u64>,
}

impl RawFileDescriptor {
    /// Creates a descriptor without eager metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, locator: MediaLocator) -> Self {
        Self {
            name: name.into(),
            locator,
            size: None,
            modified_at: None,
        }
    }

    /// Attaches eagerly-known metadata.
    #[must_use]
    pub fn with_metadata(mut self, size: u64, modified_at: u64) -> Self {
        self.size = Some(size);
        self.modified_at = Some(modified_at);
        self
    }
}

/// Materialized content for an entry.
///
/// Cloning is cheap: the bytes are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef {
    bytes: Arc<[u8]>,
    mime: &'static str,
}

impl ContentRef {
    #[must_use]
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime: &'static str) -> Self {
        Self {
            bytes: bytes.into(),
            mime,
        }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn mime(&self) -> &'static str {
        self.mime
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Identifies one in-flight materialization request for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Content dimension of an entry's state machine.
///
/// `Unmaterialized -> Loading -> Materialized -> Released`, with
/// `Loading -> Failed -> Loading` for explicit retries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentState {
    #[default]
    Unmaterialized,
    Loading(LoadTicket),
    Materialized(ContentRef),
    /// The last load failed; carries the error message for the error marker.
    Failed(String),
    /// Terminal.
    Released,
}

impl ContentState {
    /// Returns `true` if a new materialization may start from this state.
    #[must_use]
    pub fn can_start_loading(&self) -> bool {
        matches!(self, ContentState::Unmaterialized | ContentState::Failed(_))
    }

    #[must_use]
    pub fn content(&self) -> Option<&ContentRef> {
        match self {
            ContentState::Materialized(content) => Some(content),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, ContentState::Failed(_))
    }
}

/// One catalog record for a discovered media file.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEntry {
    pub(crate) id: EntryId,
    pub(crate) folder_id: FolderId,
    pub(crate) name: String,
    pub(crate) locator: MediaLocator,
    pub(crate) kind: MediaKind,
    pub(crate) size: u64,
    pub(crate) modified_at: u64,
    pub(crate) content: ContentState,
}

impl MediaEntry {
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    #[must_use]
    pub fn folder_id(&self) -> FolderId {
        self.folder_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn locator(&self) -> &MediaLocator {
        &self.locator
    }

    #[must_use]
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Size in bytes; zero until resolved.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Modification time in milliseconds since the Unix epoch; zero until resolved.
    #[must_use]
    pub fn modified_at(&self) -> u64 {
        self.modified_at
    }

    #[must_use]
    pub fn content(&self) -> &ContentState {
        &self.content
    }
}

/// Formats a byte count the way the folder browser shows file sizes.
///
/// Uses 1024-based units with one decimal, trailing `.0` dropped.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        format!("{rounded:.1} {}", UNITS[unit])
    }
}
