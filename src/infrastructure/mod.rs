// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`, backed by the local filesystem.
//!
//! # Available Adapters
//!
//! - [`fs_scanner`]: Recursive folder walking via `walkdir` (implements [`DirectoryScanner`])
//! - [`folder_store`]: CBOR and in-memory folder lists (implement [`FolderStore`])
//! - [`fs_content`]: Byte reads via `tokio::fs` (implements [`ContentFetcher`])
//!
//! [`DirectoryScanner`]: crate::application::port::DirectoryScanner
//! [`FolderStore`]: crate::application::port::FolderStore
//! [`ContentFetcher`]: crate::application::port::ContentFetcher

pub mod folder_store;
pub mod fs_content;
pub mod fs_scanner;

// Re-export main types for convenience
pub use folder_store::{CborFolderStore, MemoryFolderStore};
pub use fs_content::FsContentFetcher;
pub use fs_scanner::FsDirectoryScanner;
