// SPDX-License-Identifier: MPL-2.0
//! Gallery session: linked folders, their scans and the presentation state.
//!
//! [`Gallery`] is the single owner of the catalog, the selection, the
//! lightbox cursor and the viewport loader. Every mutation goes through
//! `&mut self`, so observers never see a half-applied change.
//!
//! # Scans
//!
//! Each linked folder has its own cancellation token. A scan is consumed
//! through [`Gallery::start_scan`] and [`Gallery::apply_scan_event`] (or
//! [`Gallery::scan_folder`], which does both until the scan ends). Starting a
//! scan replaces whatever an earlier scan of the folder produced. Events
//! from a scan whose folder was unlinked or rescanned meanwhile are dropped.

use crate::application::catalog::{LoadOutcome, MediaCatalog};
use crate::application::lightbox::{Lightbox, LightboxPosition};
use crate::application::port::{
    ContentFetcher, DirectoryScanner, FolderStore, ScanEvent, ScanStream,
};
use crate::application::selection::SelectionTracker;
use crate::application::viewport::{
    ContentLoaded, SurfaceId, ViewportAction, ViewportConfig, ViewportLoader, Visibility,
};
use crate::config::Config;
use crate::domain::media::{
    EntryId, Folder, FolderId, FolderLocator, KindCounts, KindFilter, MediaEntry, SortKey,
};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// A folder-level problem recorded during a scan. The folder stays linked.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderWarning {
    pub folder: FolderId,
    pub error: Error,
}

/// Counters of one folder scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub ingested: usize,
    pub skipped: usize,
    pub denied: bool,
}

/// A running scan of one folder.
#[derive(Debug)]
pub struct FolderScan {
    folder: FolderId,
    cancel: CancellationToken,
    stream: ScanStream,
    summary: ScanSummary,
    replaced: Removal,
}

impl FolderScan {
    #[must_use]
    pub fn folder(&self) -> FolderId {
        self.folder
    }

    /// Returns `true` once the folder was unlinked or rescanned.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    #[must_use]
    pub fn summary(&self) -> ScanSummary {
        self.summary
    }

    /// Takes the entries of earlier scans that this scan replaced.
    pub fn take_replaced(&mut self) -> Removal {
        std::mem::take(&mut self.replaced)
    }

    /// Waits for the next event. Returns `None` once the scan is over.
    pub async fn next(&mut self) -> Option<ScanEvent> {
        self.stream.next().await
    }
}

/// Entries removed by one operation and the follow-up actions for the renderer.
#[derive(Debug, Default)]
pub struct Removal {
    pub removed: Vec<EntryId>,
    pub actions: Vec<ViewportAction>,
}

/// One gallery session.
pub struct Gallery {
    store: Box<dyn FolderStore>,
    scanner: Arc<dyn DirectoryScanner>,
    folders: Vec<Folder>,
    scans: HashMap<FolderId, CancellationToken>,
    warnings: Vec<FolderWarning>,
    catalog: MediaCatalog,
    selection: SelectionTracker,
    lightbox: Lightbox,
    loader: ViewportLoader,
}

impl Gallery {
    /// Creates a session with the initial order and viewport thresholds from `config`.
    ///
    /// Linked folders are not read until [`Gallery::load_folders`].
    #[must_use]
    pub fn new(
        store: Box<dyn FolderStore>,
        scanner: Arc<dyn DirectoryScanner>,
        fetcher: Arc<dyn ContentFetcher>,
        config: &Config,
    ) -> Self {
        Self::with_viewport(
            store,
            scanner,
            fetcher,
            config.gallery.filter,
            config.gallery.sort,
            config.viewport.to_viewport_config(),
        )
    }

    #[must_use]
    pub fn with_viewport(
        store: Box<dyn FolderStore>,
        scanner: Arc<dyn DirectoryScanner>,
        fetcher: Arc<dyn ContentFetcher>,
        filter: KindFilter,
        sort: SortKey,
        viewport: ViewportConfig,
    ) -> Self {
        Self {
            store,
            scanner,
            folders: Vec::new(),
            scans: HashMap::new(),
            warnings: Vec::new(),
            catalog: MediaCatalog::with_order(filter, sort),
            selection: SelectionTracker::new(),
            lightbox: Lightbox::new(),
            loader: ViewportLoader::new(viewport, fetcher),
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    #[must_use]
    pub fn catalog(&self) -> &MediaCatalog {
        &self.catalog
    }

    /// Current view, filtered and sorted.
    #[must_use]
    pub fn view(&self) -> Vec<&MediaEntry> {
        self.catalog.view()
    }

    /// Counts over every entry, whatever the filter.
    #[must_use]
    pub fn counts(&self) -> KindCounts {
        self.catalog.counts_by_kind()
    }

    /// Revision signal bumped on every catalog change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.catalog.subscribe()
    }

    #[must_use]
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    #[must_use]
    pub fn warnings(&self) -> &[FolderWarning] {
        &self.warnings
    }

    /// Returns and clears the recorded warnings.
    pub fn take_warnings(&mut self) -> Vec<FolderWarning> {
        std::mem::take(&mut self.warnings)
    }

    // =========================================================================
    // Folders
    // =========================================================================

    /// Reads the linked folders from the store.
    ///
    /// # Errors
    ///
    /// Propagates store read failures.
    pub fn load_folders(&mut self) -> Result<&[Folder]> {
        self.folders = self.store.list()?;
        tracing::debug!(count = self.folders.len(), "loaded linked folders");
        Ok(&self.folders)
    }

    /// Links a folder and scans it.
    ///
    /// # Errors
    ///
    /// Returns the store's rejection (not a directory, already linked, I/O).
    /// A folder that refuses access while scanning is still linked; the
    /// problem is recorded as a warning.
    pub async fn link_folder(&mut self, locator: FolderLocator) -> Result<Folder> {
        let folder = self.store.add(locator)?;
        tracing::info!(folder = %folder.id, name = %folder.name, "linked folder");
        self.folders.push(folder.clone());
        self.scan_folder(folder.id).await?;
        Ok(folder)
    }

    /// Unlinks a folder: stops its scan and removes its entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFolder`] if the folder is not linked, or the
    /// store's write failure.
    pub fn unlink_folder(&mut self, id: FolderId) -> Result<Removal> {
        if !self.folders.iter().any(|folder| folder.id == id) {
            return Err(Error::UnknownFolder(id));
        }
        self.store.remove(id)?;
        if let Some(token) = self.scans.remove(&id) {
            token.cancel();
        }
        self.folders.retain(|folder| folder.id != id);
        self.warnings.retain(|warning| warning.folder != id);

        let removed = self.catalog.remove_by_folder(id);
        tracing::info!(folder = %id, removed = removed.len(), "unlinked folder");
        Ok(self.retire(removed))
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Starts a fresh scan of a linked folder, cancelling any previous one.
    ///
    /// Entries already ingested from the folder are removed; see
    /// [`FolderScan::take_replaced`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFolder`] if the folder is not linked.
    pub fn start_scan(&mut self, id: FolderId) -> Result<FolderScan> {
        let locator = self
            .folders
            .iter()
            .find(|folder| folder.id == id)
            .map(|folder| folder.locator.clone())
            .ok_or(Error::UnknownFolder(id))?;

        let cancel = CancellationToken::new();
        if let Some(previous) = self.scans.insert(id, cancel.clone()) {
            previous.cancel();
        }
        self.warnings.retain(|warning| warning.folder != id);
        let stale = self.catalog.remove_by_folder(id);
        let replaced = self.retire(stale);

        tracing::debug!(folder = %id, path = %locator.as_path().display(), "scanning folder");
        let stream = self.scanner.scan(&locator, cancel.clone());
        Ok(FolderScan {
            folder: id,
            cancel,
            stream,
            summary: ScanSummary::default(),
            replaced,
        })
    }

    /// Applies one scan event. Returns the number of entries ingested.
    ///
    /// Events of cancelled scans are dropped.
    pub fn apply_scan_event(&mut self, scan: &mut FolderScan, event: ScanEvent) -> usize {
        if scan.is_cancelled() {
            tracing::debug!(folder = %scan.folder, "dropping event of cancelled scan");
            return 0;
        }

        match event {
            ScanEvent::Batch(batch) => {
                let ingested = self.catalog.ingest(scan.folder, batch).len();
                scan.summary.ingested += ingested;
                ingested
            }
            ScanEvent::Skipped { path, reason } => {
                tracing::debug!(path = %path.display(), %reason, "skipped inaccessible entry");
                scan.summary.skipped += 1;
                0
            }
            ScanEvent::Denied(error) => {
                tracing::warn!(folder = %scan.folder, %error, "folder scan denied");
                scan.summary.denied = true;
                self.warnings.push(FolderWarning {
                    folder: scan.folder,
                    error,
                });
                0
            }
        }
    }

    /// Scans a linked folder to completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFolder`] if the folder is not linked.
    pub async fn scan_folder(&mut self, id: FolderId) -> Result<ScanSummary> {
        let mut scan = self.start_scan(id)?;
        while let Some(event) = scan.next().await {
            self.apply_scan_event(&mut scan, event);
        }
        let summary = scan.summary();
        tracing::info!(
            folder = %id,
            ingested = summary.ingested,
            skipped = summary.skipped,
            denied = summary.denied,
            "scan complete"
        );
        Ok(summary)
    }

    /// Drops every entry and rescans all linked folders.
    ///
    /// Deletions made during the session are forgotten.
    ///
    /// # Errors
    ///
    /// Propagates store read failures.
    pub async fn refresh_all(&mut self) -> Result<Removal> {
        for token in self.scans.values() {
            token.cancel();
        }
        self.scans.clear();
        self.warnings.clear();
        self.folders = self.store.list()?;

        let removed = self.catalog.clear();
        let removal = self.retire(removed);

        let ids: Vec<FolderId> = self.folders.iter().map(|folder| folder.id).collect();
        for id in ids {
            self.scan_folder(id).await?;
        }
        Ok(removal)
    }

    // =========================================================================
    // View state
    // =========================================================================

    /// Changes the kind filter. Clears the selection when the filter changes.
    pub fn set_filter(&mut self, filter: KindFilter) {
        if self.catalog.filter() != filter {
            self.catalog.set_filter(filter);
            self.selection.clear();
        }
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.catalog.set_sort(sort);
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggles an entry's selection. Returns the new membership.
    ///
    /// Entries outside the current view are ignored and report `false`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEntry`] for ids never issued.
    pub fn toggle_selection(&mut self, id: EntryId) -> Result<bool> {
        self.catalog.check_issued(id)?;
        if self.catalog.position_in_view(id).is_none() {
            tracing::debug!(entry = %id, "ignoring selection outside the view");
            return Ok(false);
        }
        Ok(self.selection.toggle(id))
    }

    pub fn cancel_selection(&mut self) {
        self.selection.clear();
    }

    /// Removes every selected entry from the session. Files are untouched.
    pub fn delete_selected(&mut self) -> Removal {
        if self.selection.is_empty() {
            return Removal::default();
        }
        let removed = self.catalog.remove_by_ids(self.selection.as_set());
        tracing::info!(removed = removed.len(), "deleted selected entries");
        let removal = self.retire(removed);
        self.selection.clear();
        removal
    }

    fn retire(&mut self, removed: Vec<MediaEntry>) -> Removal {
        let actions = self.loader.retire(&removed);
        let removed: Vec<EntryId> = removed.iter().map(MediaEntry::id).collect();
        self.selection.forget(removed.iter().copied());
        if self.lightbox.current(&self.catalog).is_none() {
            self.lightbox.close();
        }
        Removal { removed, actions }
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    /// See [`ViewportLoader::register_visibility_candidate`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEntry`] for ids never issued.
    pub fn register_visibility_candidate(
        &mut self,
        entry: EntryId,
        surface: SurfaceId,
    ) -> Result<()> {
        self.loader
            .register_visibility_candidate(&self.catalog, entry, surface)
    }

    /// See [`ViewportLoader::register_playback_candidate`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotPlayable`] for entries that are not videos.
    pub fn register_playback_candidate(
        &mut self,
        entry: EntryId,
        surface: SurfaceId,
    ) -> Result<Option<ViewportAction>> {
        self.loader
            .register_playback_candidate(&self.catalog, entry, surface)
    }

    pub fn unregister_surface(&mut self, surface: SurfaceId) -> Option<ViewportAction> {
        self.loader.unregister_surface(surface)
    }

    pub fn update_visibility(
        &mut self,
        surface: SurfaceId,
        visibility: Visibility,
    ) -> Vec<ViewportAction> {
        self.loader
            .update_visibility(&mut self.catalog, surface, visibility)
    }

    /// Hands a finished materialization back to the catalog.
    pub fn complete_load(&mut self, loaded: ContentLoaded) -> LoadOutcome {
        self.loader.complete(&mut self.catalog, loaded)
    }

    /// See [`ViewportLoader::release`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlaybackActive`] while a playback surface is registered.
    pub fn release(&mut self, entry: EntryId) -> Result<()> {
        self.loader.release(&mut self.catalog, entry)
    }

    // =========================================================================
    // Lightbox
    // =========================================================================

    /// Opens the lightbox on an entry of the view.
    pub fn open_lightbox(&mut self, entry: EntryId) -> bool {
        self.lightbox.open(&self.catalog, entry)
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox.close();
    }

    #[must_use]
    pub fn lightbox_entry(&self) -> Option<&MediaEntry> {
        self.lightbox.current(&self.catalog)
    }

    #[must_use]
    pub fn lightbox_position(&self) -> Option<LightboxPosition> {
        self.lightbox.position(&self.catalog)
    }

    pub fn lightbox_next(&mut self) -> Option<EntryId> {
        self.lightbox.next(&self.catalog)
    }

    pub fn lightbox_previous(&mut self) -> Option<EntryId> {
        self.lightbox.previous(&self.catalog)
    }
}

impl std::fmt::Debug for Gallery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gallery")
            .field("folders", &self.folders)
            .field("warnings", &self.warnings)
            .field("catalog", &self.catalog)
            .field("selection", &self.selection)
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}
