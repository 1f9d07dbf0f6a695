// SPDX-License-Identifier: MPL-2.0
//! Kind filter for the gallery view.
//!
//! The filter only narrows the derived view; the master entry set is never
//! touched by it.

use super::MediaKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which kinds of media the view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KindFilter {
    /// Show every entry.
    #[default]
    All,
    /// Show only entries of one kind.
    Only(MediaKind),
}

impl KindFilter {
    /// Returns `true` if this filter matches the given kind.
    #[must_use]
    pub fn matches_kind(&self, kind: MediaKind) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == kind,
        }
    }

    /// Returns `true` if this filter is active (not `All`).
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::All)
    }

    /// Name used in settings and on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for KindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KindFilter {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        MediaKind::parse(raw)
            .map(Self::Only)
            .ok_or_else(|| format!("invalid filter: {raw}"))
    }
}

impl TryFrom<String> for KindFilter {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<KindFilter> for String {
    fn from(filter: KindFilter) -> Self {
        filter.as_str().to_string()
    }
}
