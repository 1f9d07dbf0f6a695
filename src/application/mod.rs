// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`catalog`]: The master entry set and its derived view
//! - [`selection`]: Selected entries awaiting deletion
//! - [`viewport`]: Visibility-driven loading and playback
//! - [`lightbox`]: Wrap-around cursor over the view
//! - [`gallery`]: The session facade wiring all of the above to the ports
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - Front ends drive a [`Gallery`] and render its view
//!
//! # Example
//!
//! ```ignore
//! use lens_gallery::application::Gallery;
//! use lens_gallery::infrastructure::{CborFolderStore, FsContentFetcher, FsDirectoryScanner};
//!
//! let (store, _warning) = CborFolderStore::load_default()?;
//! let mut gallery = Gallery::new(
//!     Box::new(store),
//!     Arc::new(FsDirectoryScanner::default()),
//!     Arc::new(FsContentFetcher::new()),
//!     &config,
//! );
//! gallery.load_folders()?;
//! gallery.refresh_all().await?;
//! for entry in gallery.view() { /* ... */ }
//! ```

pub mod catalog;
pub mod gallery;
pub mod lightbox;
pub mod port;
pub mod selection;
pub mod viewport;

pub use catalog::{LoadOutcome, MediaCatalog};
pub use gallery::{FolderScan, FolderWarning, Gallery, Removal, ScanSummary};
pub use lightbox::{Lightbox, LightboxPosition};
pub use selection::SelectionTracker;
pub use viewport::{
    ContentLoaded, MaterializeTask, SurfaceId, ViewportAction, ViewportConfig, ViewportLoader,
    Visibility,
};
