// SPDX-License-Identifier: MPL-2.0
//! Media domain types.
//!
//! Entry and folder records, the file name classifier, and the filter and
//! sort rules that shape the gallery view.

pub mod classifier;
pub mod counts;
pub mod filter;
pub mod sort;
pub mod types;

// Re-export commonly used types
pub use classifier::{classify, is_supported};
pub use counts::KindCounts;
pub use filter::KindFilter;
pub use sort::{compare_names, SortKey};
pub use types::{
    format_size, ContentRef, ContentState, EntryId, Folder, FolderId, FolderLocator, LoadTicket,
    MediaEntry, MediaKind, MediaLocator, RawFileDescriptor,
};
