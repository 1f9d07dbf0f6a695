// SPDX-License-Identifier: MPL-2.0
//! Sort keys and comparators for the gallery view.
//!
//! Every comparator ends with the entry id (ingestion order) as the final
//! tie-break, so each key is a total order and renders are deterministic.

use super::MediaEntry;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Active ordering of the gallery view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    DateNewest,
    DateOldest,
    SizeLargest,
    SizeSmallest,
    Type,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::DateNewest,
        SortKey::DateOldest,
        SortKey::SizeLargest,
        SortKey::SizeSmallest,
        SortKey::Type,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::DateNewest => "date-newest",
            SortKey::DateOldest => "date-oldest",
            SortKey::SizeLargest => "size-largest",
            SortKey::SizeSmallest => "size-smallest",
            SortKey::Type => "type",
        }
    }

    /// Human-readable label for sort menus.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SortKey::NameAsc => "Name (A-Z)",
            SortKey::NameDesc => "Name (Z-A)",
            SortKey::DateNewest => "Newest first",
            SortKey::DateOldest => "Oldest first",
            SortKey::SizeLargest => "Largest first",
            SortKey::SizeSmallest => "Smallest first",
            SortKey::Type => "Type",
        }
    }

    /// Compares two entries under this key, ingestion order breaking ties.
    #[must_use]
    pub fn compare(self, a: &MediaEntry, b: &MediaEntry) -> Ordering {
        let primary = match self {
            SortKey::NameAsc => compare_names(&a.name, &b.name),
            SortKey::NameDesc => compare_names(&b.name, &a.name),
            SortKey::DateNewest => b.modified_at.cmp(&a.modified_at),
            SortKey::DateOldest => a.modified_at.cmp(&b.modified_at),
            SortKey::SizeLargest => b.size.cmp(&a.size),
            SortKey::SizeSmallest => a.size.cmp(&b.size),
            SortKey::Type => a.kind.cmp(&b.kind),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| format!("invalid sort key: {raw}"))
    }
}

/// Natural, case-insensitive name comparison ("img2" < "img10").
///
/// Names equal ignoring case are ordered lowercase first at the first
/// differing character.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    alphanumeric_sort::compare_str(a.to_lowercase(), b.to_lowercase())
        .then_with(|| compare_case(a, b))
}

fn compare_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .zip(b.chars())
        .find(|(x, y)| x != y)
        .map_or_else(
            || a.len().cmp(&b.len()),
            |(x, y)| x.is_uppercase().cmp(&y.is_uppercase()).then(x.cmp(&y)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media::{ContentState, EntryId, FolderId, MediaKind, MediaLocator};

    fn entry(id: u64, name: &str, kind: MediaKind, size: u64, modified_at: u64) -> MediaEntry {
        MediaEntry {
            id: EntryId::new(id),
            folder_id: FolderId::new(1),
            name: name.to_string(),
            locator: MediaLocator::new(format!("/media/{name}")),
            kind,
            size,
            modified_at,
            content: ContentState::Unmaterialized,
        }
    }

    fn sorted_names(key: SortKey, entries: &mut [MediaEntry]) -> Vec<String> {
        entries.sort_by(|a, b| key.compare(a, b));
        entries.iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn name_sort_is_numeric_aware() {
        let mut entries = vec![
            entry(0, "img10.png", MediaKind::Image, 0, 0),
            entry(1, "img2.png", MediaKind::Image, 0, 0),
            entry(2, "img1.png", MediaKind::Image, 0, 0),
        ];
        assert_eq!(
            sorted_names(SortKey::NameAsc, &mut entries),
            ["img1.png", "img2.png", "img10.png"]
        );
        assert_eq!(
            sorted_names(SortKey::NameDesc, &mut entries),
            ["img10.png", "img2.png", "img1.png"]
        );
    }

    #[test]
    fn name_sort_ignores_case_then_puts_lowercase_first() {
        let mut entries = vec![
            entry(0, "Beach.jpg", MediaKind::Image, 0, 0),
            entry(1, "apple.jpg", MediaKind::Image, 0, 0),
            entry(2, "beach.jpg", MediaKind::Image, 0, 0),
        ];
        assert_eq!(
            sorted_names(SortKey::NameAsc, &mut entries),
            ["apple.jpg", "beach.jpg", "Beach.jpg"]
        );
    }

    #[test]
    fn date_and_size_sorts_use_ingestion_order_for_ties() {
        let mut entries = vec![
            entry(0, "a.png", MediaKind::Image, 10, 300),
            entry(1, "b.png", MediaKind::Image, 30, 100),
            entry(2, "c.png", MediaKind::Image, 10, 300),
        ];
        assert_eq!(
            sorted_names(SortKey::DateNewest, &mut entries),
            ["a.png", "c.png", "b.png"]
        );
        assert_eq!(
            sorted_names(SortKey::DateOldest, &mut entries),
            ["b.png", "a.png", "c.png"]
        );
        assert_eq!(
            sorted_names(SortKey::SizeLargest, &mut entries),
            ["b.png", "a.png", "c.png"]
        );
        assert_eq!(
            sorted_names(SortKey::SizeSmallest, &mut entries),
            ["a.png", "c.png", "b.png"]
        );
    }

    #[test]
    fn type_sort_follows_kind_name_order() {
        let mut entries = vec![
            entry(0, "v.mp4", MediaKind::Video, 0, 0),
            entry(1, "i.png", MediaKind::Image, 0, 0),
            entry(2, "g.gif", MediaKind::Gif, 0, 0),
            entry(3, "i2.png", MediaKind::Image, 0, 0),
        ];
        assert_eq!(
            sorted_names(SortKey::Type, &mut entries),
            ["g.gif", "i.png", "i2.png", "v.mp4"]
        );
    }

    #[test]
    fn type_sort_keeps_ingestion_order_within_a_kind() {
        let mut entries = vec![
            entry(0, "zebra.png", MediaKind::Image, 0, 0),
            entry(1, "apple.png", MediaKind::Image, 0, 0),
            entry(2, "clip.gif", MediaKind::Gif, 0, 0),
        ];
        assert_eq!(
            sorted_names(SortKey::Type, &mut entries),
            ["clip.gif", "zebra.png", "apple.png"]
        );
    }

    #[test]
    fn sort_key_round_trips_through_names() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>(), Ok(key));
        }
        assert!("name".parse::<SortKey>().is_err());
    }
}
