// SPDX-License-Identifier: MPL-2.0
//! Selection of catalog entries for bulk deletion.

use crate::domain::media::EntryId;
use std::collections::HashSet;

/// Set of currently selected entry ids.
///
/// The tracker does not know the catalog; whoever removes entries must call
/// [`SelectionTracker::forget`] with the removed ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: HashSet<EntryId>,
}

impl SelectionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` if absent, removes it if present. Returns the new membership.
    pub fn toggle(&mut self, id: EntryId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn contains(&self, id: EntryId) -> bool {
        self.selected.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Drops ids that no longer exist in the catalog.
    pub fn forget<I>(&mut self, removed: I)
    where
        I: IntoIterator<Item = EntryId>,
    {
        for id in removed {
            self.selected.remove(&id);
        }
    }

    /// Selected ids as a set, for bulk removal.
    #[must_use]
    pub fn as_set(&self) -> &HashSet<EntryId> {
        &self.selected
    }

    /// Selected ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<EntryId> {
        let mut ids: Vec<_> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = SelectionTracker::new();
        let id = EntryId::new(4);

        assert!(selection.toggle(id));
        assert!(selection.contains(id));
        assert_eq!(selection.len(), 1);

        assert!(!selection.toggle(id));
        assert!(!selection.contains(id));
        assert!(selection.is_empty());
    }

    #[test]
    fn forget_subtracts_only_removed_ids() {
        let mut selection = SelectionTracker::new();
        for raw in [1, 2, 3] {
            selection.toggle(EntryId::new(raw));
        }

        selection.forget([EntryId::new(2), EntryId::new(9)]);

        assert_eq!(selection.ids(), [EntryId::new(1), EntryId::new(3)]);
    }

    #[test]
    fn clear_empties_selection() {
        let mut selection = SelectionTracker::new();
        selection.toggle(EntryId::new(1));
        selection.toggle(EntryId::new(2));
        selection.clear();
        assert_eq!(selection.len(), 0);
    }
}
