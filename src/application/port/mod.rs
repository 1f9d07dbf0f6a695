// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! The gallery core talks to its collaborators only through these traits.
//! Infrastructure adapters implement them; tests substitute stubs.
//!
//! # Available Ports
//!
//! - [`folder_store`]: Bookmarked folder persistence
//! - [`scanner`]: Recursive media discovery for a folder
//! - [`content`]: Byte fetching for materialized entries
//!
//! # Design Notes
//!
//! - All traits use domain types only (no paths leak past the locators)
//! - Traits are `Send + Sync` so adapters can be shared with spawned tasks
//! - Long-running work is returned as channels or boxed futures instead of
//!   `async fn` in traits

pub mod content;
pub mod folder_store;
pub mod scanner;

// Re-export main types for convenience
pub use content::ContentFetcher;
pub use folder_store::FolderStore;
pub use scanner::{DirectoryScanner, ScanEvent, ScanStream};
