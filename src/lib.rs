// SPDX-License-Identifier: MPL-2.0
//! `lens_gallery` is a local media gallery engine.
//!
//! Folders are linked once and remembered; their supported images, GIFs and
//! videos are discovered recursively and presented as one filterable,
//! sortable collection whose heavy content is only loaded when it scrolls
//! near the viewport.
//!
//! The crate is layered:
//!
//! - [`domain`]: entry and folder types, classification, filter and sort rules
//! - [`application`]: catalog, selection, viewport loader and the gallery session
//! - [`infrastructure`]: filesystem scanner, folder stores and content fetcher
//! - [`config`], [`paths`], [`logging`], [`error`]: ambient concerns

#![doc(html_root_url = "https://docs.rs/lens_gallery/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod paths;
