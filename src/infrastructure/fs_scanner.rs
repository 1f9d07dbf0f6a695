// SPDX-License-Identifier: MPL-2.0
//! Filesystem directory scanner.
//!
//! Walks a folder recursively on Tokio's blocking pool and streams
//! supported files back in batches.

use crate::application::port::{DirectoryScanner, ScanEvent, ScanStream};
use crate::config::{ScanConfig, SCAN_CHANNEL_CAPACITY};
use crate::domain::media::{is_supported, FolderLocator, MediaLocator, RawFileDescriptor};
use crate::error::Error;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use walkdir::{DirEntry, WalkDir};

/// [`DirectoryScanner`] backed by `walkdir`.
#[derive(Debug, Clone)]
pub struct FsDirectoryScanner {
    batch_size: usize,
    follow_links: bool,
}

impl FsDirectoryScanner {
    #[must_use]
    pub fn new(batch_size: usize, follow_links: bool) -> Self {
        Self {
            batch_size: batch_size.max(1),
            follow_links,
        }
    }

    #[must_use]
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.effective_batch_size(), config.follow_links)
    }
}

impl Default for FsDirectoryScanner {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

impl DirectoryScanner for FsDirectoryScanner {
    /// Starts the walk on the blocking pool.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    fn scan(&self, folder: &FolderLocator, cancel: CancellationToken) -> ScanStream {
        let (tx, stream) = ScanStream::channel(SCAN_CHANNEL_CAPACITY);
        let root = folder.as_path().to_path_buf();
        let walker = self.clone();

        tokio::task::spawn_blocking(move || walker.walk(&root, &cancel, &tx));
        stream
    }
}

impl FsDirectoryScanner {
    fn walk(&self, root: &Path, cancel: &CancellationToken, tx: &mpsc::Sender<ScanEvent>) {
        // Folder-level failures end the scan before anything is emitted.
        if let Err(err) = std::fs::read_dir(root) {
            tracing::warn!(path = %root.display(), %err, "cannot read folder");
            let _ = tx.blocking_send(ScanEvent::Denied(Error::from_io_at(&err, root)));
            return;
        }

        let mut batch = Vec::with_capacity(self.batch_size);
        let mut found = 0usize;
        let entries = WalkDir::new(root)
            .follow_links(self.follow_links)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry));

        for item in entries {
            if cancel.is_cancelled() {
                tracing::debug!(path = %root.display(), "scan cancelled");
                return;
            }

            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                    tracing::debug!(path = %path.display(), %err, "skipping unreadable entry");
                    let skipped = ScanEvent::Skipped {
                        path,
                        reason: err.to_string(),
                    };
                    if tx.blocking_send(skipped).is_err() {
                        return;
                    }
                    continue;
                }
            };

            if let Some(descriptor) = describe(&entry) {
                batch.push(descriptor);
                found += 1;
            }
            if batch.len() >= self.batch_size {
                let full = std::mem::replace(&mut batch, Vec::with_capacity(self.batch_size));
                if tx.blocking_send(ScanEvent::Batch(full)).is_err() {
                    return;
                }
            }
        }

        if cancel.is_cancelled() {
            return;
        }
        if !batch.is_empty() {
            let _ = tx.blocking_send(ScanEvent::Batch(batch));
        }
        tracing::debug!(path = %root.display(), found, "scan finished");
    }
}

/// Hidden entries (and whole hidden directories) are never walked.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn describe(entry: &DirEntry) -> Option<RawFileDescriptor> {
    if !entry.file_type().is_file() {
        return None;
    }
    let name = entry.file_name().to_string_lossy().into_owned();
    if !is_supported(&name) {
        return None;
    }

    let mut descriptor = RawFileDescriptor::new(name, MediaLocator::new(entry.path()));
    if let Ok(metadata) = entry.metadata() {
        descriptor.size = Some(metadata.len());
        descriptor.modified_at = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .and_then(|elapsed| u64::try_from(elapsed.as_millis()).ok());
    }
    Some(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    async fn collect(mut stream: ScanStream) -> Vec<ScanEvent> {
        let mut events = Vec::new();
        while let Some(event) = stream.next().await {
            events.push(event);
        }
        events
    }

    async fn scan_all(scanner: &FsDirectoryScanner, root: &Path) -> Vec<ScanEvent> {
        collect(scanner.scan(&FolderLocator::new(root), CancellationToken::new())).await
    }

    fn names(events: &[ScanEvent]) -> Vec<String> {
        let mut names: Vec<String> = events
            .iter()
            .filter_map(|event| match event {
                ScanEvent::Batch(batch) => Some(batch),
                _ => None,
            })
            .flatten()
            .map(|descriptor| descriptor.name.clone())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn finds_supported_files_recursively() {
        let dir = tempdir().expect("temp dir");
        fs::create_dir_all(dir.path().join("trip/day1")).expect("mkdir");
        fs::write(dir.path().join("a.png"), b"png").expect("write");
        fs::write(dir.path().join("trip/b.MP4"), b"video").expect("write");
        fs::write(dir.path().join("trip/day1/c.gif"), b"gif").expect("write");
        fs::write(dir.path().join("notes.txt"), b"text").expect("write");

        let scanner = FsDirectoryScanner::default();
        let locator = FolderLocator::new(dir.path());
        let events = collect(scanner.scan(&locator, CancellationToken::new())).await;

        assert_eq!(names(&events), ["a.png", "b.MP4", "c.gif"]);
    }

    #[tokio::test]
    async fn skips_hidden_files_and_directories() {
        let dir = tempdir().expect("temp dir");
        fs::create_dir_all(dir.path().join(".cache/thumbs")).expect("mkdir");
        fs::write(dir.path().join(".hidden.png"), b"png").expect("write");
        fs::write(dir.path().join(".cache/thumbs/t.png"), b"png").expect("write");
        fs::write(dir.path().join("shown.png"), b"png").expect("write");

        let scanner = FsDirectoryScanner::default();
        let events = scan_all(&scanner, dir.path()).await;

        assert_eq!(names(&events), ["shown.png"]);
    }

    #[tokio::test]
    async fn emits_batches_of_configured_size_with_metadata() {
        let dir = tempdir().expect("temp dir");
        for i in 0..5 {
            fs::write(dir.path().join(format!("img{i}.jpg")), vec![0u8; 10 + i]).expect("write");
        }

        let scanner = FsDirectoryScanner::new(2, false);
        let events = scan_all(&scanner, dir.path()).await;

        let sizes: Vec<usize> = events
            .iter()
            .map(|event| match event {
                ScanEvent::Batch(batch) => batch.len(),
                other => panic!("unexpected event: {other:?}"),
            })
            .collect();
        assert_eq!(sizes, [2, 2, 1]);

        let ScanEvent::Batch(first) = &events[0] else {
            panic!("expected batch");
        };
        assert!(first[0].size.is_some_and(|size| size >= 10));
        assert!(first[0].modified_at.is_some());
    }

    #[tokio::test]
    async fn missing_folder_is_reported_once() {
        let dir = tempdir().expect("temp dir");
        let gone = dir.path().join("gone");

        let scanner = FsDirectoryScanner::default();
        let events = scan_all(&scanner, &gone).await;

        assert!(matches!(events.as_slice(), [ScanEvent::Denied(_)]));
    }

    #[tokio::test]
    async fn cancelled_scan_emits_nothing() {
        let dir = tempdir().expect("temp dir");
        for i in 0..20 {
            fs::write(dir.path().join(format!("{i}.png")), b"png").expect("write");
        }
        let cancel = CancellationToken::new();
        cancel.cancel();

        let scanner = FsDirectoryScanner::new(4, false);
        let events = collect(scanner.scan(&FolderLocator::new(dir.path()), cancel)).await;

        assert!(events.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn broken_link_is_skipped_and_walk_continues() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().expect("temp dir");
        let outside = tempdir().expect("outside dir");
        fs::write(dir.path().join("a.png"), b"png").expect("write");
        fs::create_dir(dir.path().join("trip")).expect("mkdir");
        fs::write(dir.path().join("trip/b.gif"), b"gif").expect("write");
        fs::write(outside.path().join("c.mp4"), b"video").expect("write");
        symlink(dir.path().join("missing.png"), dir.path().join("broken.png")).expect("link");
        symlink(outside.path(), dir.path().join("linked")).expect("link");

        let scanner = FsDirectoryScanner::new(1, true);
        let events = scan_all(&scanner, dir.path()).await;

        let skipped: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                ScanEvent::Skipped { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(skipped, [dir.path().join("broken.png")]);
        assert_eq!(names(&events), ["a.png", "b.gif", "c.mp4"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn links_are_not_followed_by_default() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().expect("temp dir");
        let outside = tempdir().expect("outside dir");
        fs::write(dir.path().join("a.png"), b"png").expect("write");
        fs::write(outside.path().join("c.mp4"), b"video").expect("write");
        symlink(outside.path(), dir.path().join("linked")).expect("link");
        symlink(dir.path().join("missing.png"), dir.path().join("broken.png")).expect("link");

        let scanner = FsDirectoryScanner::default();
        let events = scan_all(&scanner, dir.path()).await;

        assert_eq!(names(&events), ["a.png"]);
        assert!(events
            .iter()
            .all(|event| matches!(event, ScanEvent::Batch(_))));
    }

    #[tokio::test]
    async fn empty_folder_ends_without_events() {
        let dir = tempdir().expect("temp dir");
        let scanner = FsDirectoryScanner::default();
        let events = scan_all(&scanner, dir.path()).await;
        assert!(events.is_empty());
    }
}
