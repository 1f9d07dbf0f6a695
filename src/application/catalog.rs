// SPDX-License-Identifier: MPL-2.0
//! Media catalog: the single source of truth for discovered entries.
//!
//! The catalog owns the master entry set across every linked folder and
//! derives the presentation view (filter, then sort) on demand.
//!
//! # Staleness
//!
//! Every mutation marks the cached view stale and bumps the revision
//! published through [`MediaCatalog::subscribe`]. The next call to
//! [`MediaCatalog::view`] recomputes the view from scratch, so the view can
//! never drift from what a full recomputation would produce. Ingestion only
//! appends, which keeps many small batches cheap.

use crate::domain::media::{
    classify, ContentRef, ContentState, EntryId, FolderId, KindCounts, KindFilter, LoadTicket,
    MediaEntry, RawFileDescriptor, SortKey,
};
use crate::error::{Error, Result};
use std::cell::OnceCell;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::watch;

/// What happened to a finished materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Content was stored on the entry.
    Applied,
    /// The fetch failed; the entry now carries an error marker.
    Failed,
    /// The entry was removed, released or reloaded meanwhile. Any fetched
    /// content is handed back so the caller can revoke it.
    Discarded(Option<ContentRef>),
}

/// Owns every discovered entry and derives the gallery view.
#[derive(Debug)]
pub struct MediaCatalog {
    /// Master set. Ids are monotonic, so key order is ingestion order.
    entries: BTreeMap<EntryId, MediaEntry>,
    next_id: u64,
    next_ticket: u64,
    filter: KindFilter,
    sort: SortKey,
    /// Derived view; empty cell means stale.
    view: OnceCell<Vec<EntryId>>,
    revision: watch::Sender<u64>,
}

impl MediaCatalog {
    /// Creates an empty catalog showing everything, sorted by name.
    #[must_use]
    pub fn new() -> Self {
        Self::with_order(KindFilter::default(), SortKey::default())
    }

    /// Creates an empty catalog with an initial filter and sort key.
    #[must_use]
    pub fn with_order(filter: KindFilter, sort: SortKey) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            entries: BTreeMap::new(),
            next_id: 0,
            next_ticket: 0,
            filter,
            sort,
            view: OnceCell::new(),
            revision,
        }
    }

    // =========================================================================
    // Master set mutations
    // =========================================================================

    /// Ingests scanned descriptors for `folder_id` and returns the accepted entries.
    ///
    /// Unsupported files are dropped silently; malformed descriptors (empty
    /// name or locator) are skipped. Neither fails the batch.
    pub fn ingest<I>(&mut self, folder_id: FolderId, descriptors: I) -> Vec<MediaEntry>
    where
        I: IntoIterator<Item = RawFileDescriptor>,
    {
        let mut appended = Vec::new();

        for descriptor in descriptors {
            if descriptor.name.trim().is_empty() || descriptor.locator.is_empty() {
                tracing::debug!(?descriptor, "skipping malformed descriptor");
                continue;
            }
            let Some(kind) = classify(&descriptor.name) else {
                tracing::trace!(name = %descriptor.name, "skipping unsupported file");
                continue;
            };

            let id = EntryId::new(self.next_id);
            self.next_id += 1;

            let entry = MediaEntry {
                id,
                folder_id,
                name: descriptor.name,
                locator: descriptor.locator,
                kind,
                size: descriptor.size.unwrap_or(0),
                modified_at: descriptor.modified_at.unwrap_or(0),
                content: ContentState::Unmaterialized,
            };
            appended.push(entry.clone());
            self.entries.insert(id, entry);
        }

        if !appended.is_empty() {
            tracing::debug!(
                folder = %folder_id,
                count = appended.len(),
                total = self.entries.len(),
                "ingested entries"
            );
            self.mark_stale();
        }
        appended
    }

    /// Removes every entry of a folder (folder unlink) and returns them.
    pub fn remove_by_folder(&mut self, folder_id: FolderId) -> Vec<MediaEntry> {
        self.remove_where(|entry| entry.folder_id == folder_id)
    }

    /// Removes the given entries from the catalog and returns them.
    ///
    /// This only affects the gallery; files on disk are never touched.
    pub fn remove_by_ids(&mut self, ids: &HashSet<EntryId>) -> Vec<MediaEntry> {
        if ids.is_empty() {
            return Vec::new();
        }
        self.remove_where(|entry| ids.contains(&entry.id))
    }

    /// Removes every entry (full refresh) and returns them.
    ///
    /// Ids keep counting up; nothing removed here is ever reissued.
    pub fn clear(&mut self) -> Vec<MediaEntry> {
        self.remove_where(|_| true)
    }

    fn remove_where(&mut self, mut predicate: impl FnMut(&MediaEntry) -> bool) -> Vec<MediaEntry> {
        let doomed: Vec<EntryId> = self
            .entries
            .values()
            .filter(|entry| predicate(entry))
            .map(MediaEntry::id)
            .collect();

        let removed: Vec<MediaEntry> = doomed
            .iter()
            .filter_map(|id| self.entries.remove(id))
            .collect();

        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), "removed entries");
            self.mark_stale();
        }
        removed
    }

    /// Fills in lazily-resolved metadata.
    ///
    /// Returns `Ok(false)` if the entry has been removed meanwhile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEntry`] for ids the catalog never issued.
    pub fn refine_metadata(
        &mut self,
        id: EntryId,
        size: Option<u64>,
        modified_at: Option<u64>,
    ) -> Result<bool> {
        self.check_issued(id)?;
        let Some(entry) = self.entries.get_mut(&id) else {
            return Ok(false);
        };

        let mut changed = false;
        if let Some(size) = size.filter(|s| *s != entry.size) {
            entry.size = size;
            changed = true;
        }
        if let Some(modified_at) = modified_at.filter(|m| *m != entry.modified_at) {
            entry.modified_at = modified_at;
            changed = true;
        }
        if changed {
            self.mark_stale();
        }
        Ok(true)
    }

    // =========================================================================
    // View state
    // =========================================================================

    /// Changes the kind filter. The master set is untouched.
    pub fn set_filter(&mut self, filter: KindFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.mark_stale();
        }
    }

    /// Changes the sort key.
    pub fn set_sort(&mut self, sort: SortKey) {
        if self.sort != sort {
            self.sort = sort;
            self.mark_stale();
        }
    }

    #[must_use]
    pub fn filter(&self) -> KindFilter {
        self.filter
    }

    #[must_use]
    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Returns the filtered, sorted view.
    #[must_use]
    pub fn view(&self) -> Vec<&MediaEntry> {
        self.view_ids()
            .iter()
            .filter_map(|id| self.entries.get(id))
            .collect()
    }

    /// Returns the ids of the filtered, sorted view.
    #[must_use]
    pub fn view_ids(&self) -> &[EntryId] {
        self.view.get_or_init(|| self.derive_view())
    }

    /// Returns the position of an entry in the current view.
    #[must_use]
    pub fn position_in_view(&self, id: EntryId) -> Option<usize> {
        self.view_ids().iter().position(|candidate| *candidate == id)
    }

    fn derive_view(&self) -> Vec<EntryId> {
        let mut matching: Vec<&MediaEntry> = self
            .entries
            .values()
            .filter(|entry| self.filter.matches_kind(entry.kind))
            .collect();
        matching.sort_by(|a, b| self.sort.compare(a, b));
        matching.into_iter().map(MediaEntry::id).collect()
    }

    /// Counts entries per kind over the master set, ignoring the filter.
    #[must_use]
    pub fn counts_by_kind(&self) -> KindCounts {
        let mut counts = KindCounts::default();
        for entry in self.entries.values() {
            counts.add(entry.kind);
        }
        counts
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&MediaEntry> {
        self.entries.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: EntryId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Iterates the master set in ingestion order.
    pub fn entries(&self) -> impl Iterator<Item = &MediaEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `id` was issued by this catalog at some point.
    #[must_use]
    pub fn was_issued(&self, id: EntryId) -> bool {
        id.get() < self.next_id
    }

    /// Fails for ids this catalog never issued.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEntry`] if `id` was never issued.
    pub fn check_issued(&self, id: EntryId) -> Result<()> {
        if self.was_issued(id) {
            Ok(())
        } else {
            Err(Error::UnknownEntry(id))
        }
    }

    // =========================================================================
    // Change notification
    // =========================================================================

    /// Subscribes to view changes. The value is a revision counter.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn mark_stale(&mut self) {
        self.view.take();
        self.notify();
    }

    fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    // =========================================================================
    // Content state (driven by the viewport loader)
    // =========================================================================

    /// Moves an entry to `Loading` and returns the ticket for the request.
    ///
    /// Returns `Ok(None)` if the entry is gone or not in a loadable state.
    pub(crate) fn begin_load(&mut self, id: EntryId) -> Result<Option<LoadTicket>> {
        self.check_issued(id)?;
        let Some(entry) = self.entries.get_mut(&id) else {
            return Ok(None);
        };
        if !entry.content.can_start_loading() {
            return Ok(None);
        }

        let ticket = LoadTicket::new(self.next_ticket);
        self.next_ticket += 1;
        entry.content = ContentState::Loading(ticket);
        self.notify();
        Ok(Some(ticket))
    }

    /// Applies a finished materialization if the request is still current.
    pub(crate) fn finish_load(
        &mut self,
        id: EntryId,
        ticket: LoadTicket,
        result: Result<ContentRef>,
    ) -> LoadOutcome {
        let current = self
            .entries
            .get(&id)
            .is_some_and(|entry| entry.content == ContentState::Loading(ticket));
        if !current {
            return LoadOutcome::Discarded(result.ok());
        }
        let Some(entry) = self.entries.get_mut(&id) else {
            return LoadOutcome::Discarded(result.ok());
        };

        match result {
            Ok(content) => {
                let resized = entry.size == 0 && !content.is_empty();
                if resized {
                    entry.size = content.len() as u64;
                }
                entry.content = ContentState::Materialized(content);
                if resized {
                    self.mark_stale();
                } else {
                    self.notify();
                }
                LoadOutcome::Applied
            }
            Err(err) => {
                entry.content = ContentState::Failed(err.to_string());
                self.notify();
                LoadOutcome::Failed
            }
        }
    }

    /// Moves an entry to the terminal `Released` state.
    ///
    /// Returns the content that was held, if any. Released entries stay
    /// released.
    pub(crate) fn release_content(&mut self, id: EntryId) -> Result<Option<ContentRef>> {
        self.check_issued(id)?;
        let Some(entry) = self.entries.get_mut(&id) else {
            return Ok(None);
        };
        if entry.content == ContentState::Released {
            return Ok(None);
        }

        let previous = std::mem::replace(&mut entry.content, ContentState::Released);
        self.notify();
        Ok(match previous {
            ContentState::Materialized(content) => Some(content),
            _ => None,
        })
    }
}

impl Default for MediaCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media::{MediaKind, MediaLocator};

    const FOLDER: FolderId = FolderId::new(1);

    fn descriptor(name: &str) -> RawFileDescriptor {
        RawFileDescriptor::new(name, MediaLocator::new(format!("/gallery/{name}")))
    }

    fn descriptors(names: &[&str]) -> Vec<RawFileDescriptor> {
        names.iter().map(|name| descriptor(name)).collect()
    }

    fn view_names(catalog: &MediaCatalog) -> Vec<String> {
        catalog.view().iter().map(|e| e.name().to_string()).collect()
    }

    #[test]
    fn ingest_drops_unsupported_and_malformed_descriptors() {
        let mut catalog = MediaCatalog::new();
        let mut batch = descriptors(&["a.png", "notes.txt", "b.mp4"]);
        batch.push(descriptor(""));
        batch.push(RawFileDescriptor::new("c.gif", MediaLocator::new("")));

        let appended = catalog.ingest(FOLDER, batch);

        let names: Vec<_> = appended.iter().map(MediaEntry::name).collect();
        assert_eq!(names, ["a.png", "b.mp4"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn ingest_assigns_unique_monotonic_ids() {
        let mut catalog = MediaCatalog::new();
        let first = catalog.ingest(FOLDER, descriptors(&["a.png", "b.png"]));
        let second = catalog.ingest(FOLDER, descriptors(&["c.png"]));

        let ids: Vec<u64> = first.iter().chain(&second).map(|e| e.id().get()).collect();
        assert_eq!(ids, [0, 1, 2]);
    }

    #[test]
    fn incremental_ingest_matches_single_batch() {
        let names = ["z.png", "img2.jpg", "clip.mp4", "img10.jpg", "loop.gif", "x.txt"];

        let mut whole = MediaCatalog::new();
        whole.ingest(FOLDER, descriptors(&names));

        for chunk_size in 1..=names.len() {
            let mut incremental = MediaCatalog::new();
            for chunk in names.chunks(chunk_size) {
                incremental.ingest(FOLDER, descriptors(chunk));
            }
            assert_eq!(view_names(&incremental), view_names(&whole));
            let whole_ids: Vec<_> = whole.view_ids().to_vec();
            assert_eq!(incremental.view_ids(), whole_ids.as_slice());
        }
    }

    #[test]
    fn view_sorts_names_numerically() {
        let mut catalog = MediaCatalog::new();
        catalog.ingest(FOLDER, descriptors(&["img10.png", "img2.png", "img1.png"]));
        catalog.set_sort(SortKey::NameAsc);

        assert_eq!(view_names(&catalog), ["img1.png", "img2.png", "img10.png"]);
    }

    #[test]
    fn filter_is_non_destructive() {
        let mut catalog = MediaCatalog::new();
        catalog.ingest(FOLDER, descriptors(&["a.png", "b.mp4", "c.gif", "d.webm"]));
        let before = view_names(&catalog);

        catalog.set_filter(KindFilter::Only(MediaKind::Video));
        assert_eq!(view_names(&catalog), ["b.mp4", "d.webm"]);

        catalog.set_filter(KindFilter::All);
        assert_eq!(view_names(&catalog), before);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn counts_ignore_active_filter() {
        let mut catalog = MediaCatalog::new();
        catalog.ingest(FOLDER, descriptors(&["a.png", "b.jpg", "c.mp4"]));
        catalog.set_filter(KindFilter::Only(MediaKind::Image));

        let counts = catalog.counts_by_kind();
        assert_eq!(
            counts,
            KindCounts {
                image: 2,
                gif: 0,
                video: 1
            }
        );
        assert_eq!(catalog.view().len(), 2);
    }

    #[test]
    fn remove_by_ids_hides_entries_from_view() {
        let mut catalog = MediaCatalog::new();
        let appended = catalog.ingest(FOLDER, descriptors(&["a.png", "b.png", "c.png"]));
        let doomed: HashSet<_> = [appended[1].id()].into_iter().collect();

        let removed = catalog.remove_by_ids(&doomed);

        assert_eq!(removed.len(), 1);
        assert!(!catalog.view_ids().contains(&appended[1].id()));
        assert_eq!(view_names(&catalog), ["a.png", "c.png"]);
    }

    #[test]
    fn remove_by_folder_only_touches_that_folder() {
        let mut catalog = MediaCatalog::new();
        catalog.ingest(FolderId::new(1), descriptors(&["a.png", "b.png"]));
        catalog.ingest(FolderId::new(2), descriptors(&["c.png"]));

        let removed = catalog.remove_by_folder(FolderId::new(1));

        assert_eq!(removed.len(), 2);
        assert_eq!(view_names(&catalog), ["c.png"]);
    }

    #[test]
    fn removed_ids_are_never_reissued() {
        let mut catalog = MediaCatalog::new();
        let first = catalog.ingest(FOLDER, descriptors(&["a.png"]));
        catalog.clear();
        let second = catalog.ingest(FOLDER, descriptors(&["a.png"]));

        assert_ne!(first[0].id(), second[0].id());
        assert!(catalog.was_issued(first[0].id()));
        assert!(!catalog.contains(first[0].id()));
    }

    #[test]
    fn refine_metadata_updates_sort_inputs() {
        let mut catalog = MediaCatalog::with_order(KindFilter::All, SortKey::SizeLargest);
        let appended = catalog.ingest(FOLDER, descriptors(&["a.png", "b.png"]));
        assert_eq!(view_names(&catalog), ["a.png", "b.png"]);

        let refined = catalog
            .refine_metadata(appended[1].id(), Some(4096), None)
            .expect("issued id");

        assert!(refined);
        assert_eq!(view_names(&catalog), ["b.png", "a.png"]);
    }

    #[test]
    fn refine_metadata_rejects_never_issued_ids() {
        let mut catalog = MediaCatalog::new();
        let result = catalog.refine_metadata(EntryId::new(42), Some(1), None);
        assert_eq!(result, Err(Error::UnknownEntry(EntryId::new(42))));
    }

    #[test]
    fn refine_metadata_ignores_removed_entries() {
        let mut catalog = MediaCatalog::new();
        let appended = catalog.ingest(FOLDER, descriptors(&["a.png"]));
        catalog.clear();

        let refined = catalog
            .refine_metadata(appended[0].id(), Some(1), Some(2))
            .expect("issued id");
        assert!(!refined);
    }

    #[test]
    fn mutations_bump_revision_and_notify_subscribers() {
        let mut catalog = MediaCatalog::new();
        let mut rx = catalog.subscribe();
        let start = catalog.revision();

        catalog.ingest(FOLDER, descriptors(&["a.png"]));
        assert!(rx.has_changed().expect("sender alive"));
        rx.mark_unchanged();

        catalog.set_sort(SortKey::NameAsc);
        assert!(!rx.has_changed().expect("sender alive"), "unchanged sort");

        catalog.set_sort(SortKey::Type);
        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(catalog.revision(), start + 2);
    }

    #[test]
    fn ingest_without_accepted_entries_does_not_notify() {
        let mut catalog = MediaCatalog::new();
        let rx = catalog.subscribe();
        catalog.ingest(FOLDER, descriptors(&["readme.md"]));
        assert!(!rx.has_changed().expect("sender alive"));
    }

    #[test]
    fn finish_load_discards_stale_tickets() {
        let mut catalog = MediaCatalog::new();
        let id = catalog.ingest(FOLDER, descriptors(&["a.png"]))[0].id();
        let ticket = catalog
            .begin_load(id)
            .expect("issued id")
            .expect("loadable");
        let content = ContentRef::new(vec![1u8, 2, 3], "image/png");

        assert_eq!(catalog.begin_load(id), Ok(None), "already loading");

        let stale = LoadTicket::new(999);
        assert_eq!(
            catalog.finish_load(id, stale, Ok(content.clone())),
            LoadOutcome::Discarded(Some(content.clone()))
        );
        assert_eq!(
            catalog.finish_load(id, ticket, Ok(content.clone())),
            LoadOutcome::Applied
        );
        let entry = catalog.get(id).expect("entry");
        assert_eq!(entry.content().content(), Some(&content));
        assert_eq!(entry.size(), 3, "size resolved from content");
    }

    #[test]
    fn failed_load_can_be_retried() {
        let mut catalog = MediaCatalog::new();
        let id = catalog.ingest(FOLDER, descriptors(&["a.png"]))[0].id();
        let ticket = catalog.begin_load(id).expect("issued").expect("loadable");

        let outcome = catalog.finish_load(id, ticket, Err(Error::Io("gone".into())));

        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(catalog.get(id).expect("entry").content().is_failed());
        assert!(catalog.begin_load(id).expect("issued").is_some());
    }

    #[test]
    fn release_is_terminal() {
        let mut catalog = MediaCatalog::new();
        let id = catalog.ingest(FOLDER, descriptors(&["a.png"]))[0].id();
        let ticket = catalog.begin_load(id).expect("issued").expect("loadable");
        let content = ContentRef::new(vec![9u8], "image/png");
        catalog.finish_load(id, ticket, Ok(content.clone()));

        assert_eq!(catalog.release_content(id), Ok(Some(content)));
        assert_eq!(catalog.release_content(id), Ok(None));
        assert_eq!(catalog.begin_load(id), Ok(None));
        assert_eq!(
            catalog.get(id).expect("entry").content(),
            &ContentState::Released
        );
    }
}
