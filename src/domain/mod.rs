// SPDX-License-Identifier: MPL-2.0
//! Domain layer - gallery data and the pure rules applied to it.
//!
//! Nothing in here performs I/O or awaits.
//!
//! # Modules
//!
//! - [`media`]: Entries and folders ([`MediaEntry`](media::MediaEntry),
//!   [`Folder`](media::Folder)), classification, [`KindFilter`](media::KindFilter)
//!   and [`SortKey`](media::SortKey)

pub mod media;
