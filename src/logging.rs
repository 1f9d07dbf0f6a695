// SPDX-License-Identifier: MPL-2.0
//! Tracing subscriber setup for the command-line front end.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "lens_gallery=info";

/// Installs a stderr subscriber filtered by `RUST_LOG`.
///
/// `verbose` raises the default filter to debug. Returns `false` if a
/// global subscriber was already installed.
pub fn init(verbose: bool) -> bool {
    let default = if verbose {
        "lens_gallery=debug"
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .is_ok()
}
