// SPDX-License-Identifier: MPL-2.0
//! Lightbox cursor over the gallery view.
//!
//! The cursor remembers an entry id rather than an index, so it survives
//! re-sorting. Navigation wraps around at both ends.

use crate::application::catalog::MediaCatalog;
use crate::domain::media::{EntryId, MediaEntry};
use std::fmt;

/// Position of the lightbox within the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightboxPosition {
    /// Zero-based index in the view.
    pub index: usize,
    /// Number of entries in the view.
    pub total: usize,
}

/// Renders the one-based counter shown under the lightbox, e.g. `3 / 10`.
impl fmt::Display for LightboxPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.index + 1, self.total)
    }
}

/// Open/closed lightbox state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lightbox {
    current: Option<EntryId>,
}

impl Lightbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the lightbox on the entry at `index` of the view.
    ///
    /// Returns `false` (and stays closed) if the index is out of range.
    pub fn open_at(&mut self, catalog: &MediaCatalog, index: usize) -> bool {
        self.current = catalog.view_ids().get(index).copied();
        self.current.is_some()
    }

    /// Opens the lightbox on a specific entry, if it is in the view.
    pub fn open(&mut self, catalog: &MediaCatalog, id: EntryId) -> bool {
        self.current = catalog.position_in_view(id).map(|_| id);
        self.current.is_some()
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Entry shown, if the lightbox is open and the entry still exists.
    #[must_use]
    pub fn current<'a>(&self, catalog: &'a MediaCatalog) -> Option<&'a MediaEntry> {
        self.current.and_then(|id| catalog.get(id))
    }

    /// Position of the shown entry in the view.
    #[must_use]
    pub fn position(&self, catalog: &MediaCatalog) -> Option<LightboxPosition> {
        let index = catalog.position_in_view(self.current?)?;
        Some(LightboxPosition {
            index,
            total: catalog.view_ids().len(),
        })
    }

    /// Moves to the next entry, wrapping to the first.
    pub fn next(&mut self, catalog: &MediaCatalog) -> Option<EntryId> {
        self.step(catalog, 1)
    }

    /// Moves to the previous entry, wrapping to the last.
    pub fn previous(&mut self, catalog: &MediaCatalog) -> Option<EntryId> {
        self.step(catalog, -1)
    }

    /// If the shown entry left the view (filter change, deletion), the
    /// lightbox closes.
    fn step(&mut self, catalog: &MediaCatalog, direction: isize) -> Option<EntryId> {
        let view = catalog.view_ids();
        let Some(index) = self.current.and_then(|id| catalog.position_in_view(id)) else {
            self.current = None;
            return None;
        };

        let len = view.len() as isize;
        let next = (index as isize + direction).rem_euclid(len) as usize;
        self.current = view.get(next).copied();
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media::{FolderId, MediaLocator, RawFileDescriptor};

    fn catalog_with(names: &[&str]) -> MediaCatalog {
        let mut catalog = MediaCatalog::new();
        catalog.ingest(
            FolderId::new(1),
            names
                .iter()
                .map(|name| RawFileDescriptor::new(*name, MediaLocator::new(format!("/m/{name}")))),
        );
        catalog
    }

    fn shown(lightbox: &Lightbox, catalog: &MediaCatalog) -> String {
        lightbox
            .current(catalog)
            .map(|entry| entry.name().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn next_wraps_around_to_first() {
        let catalog = catalog_with(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut lightbox = Lightbox::new();
        assert!(lightbox.open_at(&catalog, 2));

        lightbox.next(&catalog);

        assert_eq!(shown(&lightbox, &catalog), "a.jpg");
    }

    #[test]
    fn previous_wraps_around_to_last() {
        let catalog = catalog_with(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut lightbox = Lightbox::new();
        lightbox.open_at(&catalog, 0);

        lightbox.previous(&catalog);

        assert_eq!(shown(&lightbox, &catalog), "c.jpg");
    }

    #[test]
    fn single_entry_navigation_stays_put() {
        let catalog = catalog_with(&["only.jpg"]);
        let mut lightbox = Lightbox::new();
        lightbox.open_at(&catalog, 0);

        lightbox.next(&catalog);
        assert_eq!(shown(&lightbox, &catalog), "only.jpg");
        lightbox.previous(&catalog);
        assert_eq!(shown(&lightbox, &catalog), "only.jpg");
    }

    #[test]
    fn position_renders_counter() {
        let catalog = catalog_with(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut lightbox = Lightbox::new();
        lightbox.open_at(&catalog, 1);

        let position = lightbox.position(&catalog).expect("open");
        assert_eq!(position.to_string(), "2 / 3");
    }

    #[test]
    fn out_of_range_index_keeps_lightbox_closed() {
        let catalog = catalog_with(&["a.jpg"]);
        let mut lightbox = Lightbox::new();
        assert!(!lightbox.open_at(&catalog, 5));
        assert!(!lightbox.is_open());
        assert_eq!(lightbox.next(&catalog), None);
    }

    #[test]
    fn lightbox_closes_when_entry_leaves_view() {
        let mut catalog = catalog_with(&["a.jpg", "b.mp4"]);
        let mut lightbox = Lightbox::new();
        lightbox.open_at(&catalog, 0);

        catalog.set_filter(crate::domain::media::KindFilter::Only(
            crate::domain::media::MediaKind::Video,
        ));

        assert_eq!(lightbox.next(&catalog), None);
        assert!(!lightbox.is_open());
    }
}
