// SPDX-License-Identifier: MPL-2.0
//! Per-kind entry counts for the status summary.

use super::MediaKind;
use std::fmt;

/// Number of entries of each kind across the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KindCounts {
    pub image: usize,
    pub gif: usize,
    pub video: usize,
}

impl KindCounts {
    /// Records one more entry of `kind`.
    pub fn add(&mut self, kind: MediaKind) {
        *self.slot(kind) += 1;
    }

    /// Count for a single kind.
    #[must_use]
    pub fn get(&self, kind: MediaKind) -> usize {
        match kind {
            MediaKind::Image => self.image,
            MediaKind::Gif => self.gif,
            MediaKind::Video => self.video,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.image + self.gif + self.video
    }

    fn slot(&mut self, kind: MediaKind) -> &mut usize {
        match kind {
            MediaKind::Image => &mut self.image,
            MediaKind::Gif => &mut self.gif,
            MediaKind::Video => &mut self.video,
        }
    }
}

/// Renders the status line, e.g. `2 videos • 1 GIF • 3 images`.
///
/// Kinds with no entries are omitted; an empty catalog renders as "".
impl fmt::Display for KindCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            (self.video, "video"),
            (self.gif, "GIF"),
            (self.image, "image"),
        ];

        let mut first = true;
        for (count, noun) in parts {
            if count == 0 {
                continue;
            }
            if !first {
                f.write_str(" • ")?;
            }
            let plural = if count > 1 { "s" } else { "" };
            write!(f, "{count} {noun}{plural}")?;
            first = false;
        }
        Ok(())
    }
}
