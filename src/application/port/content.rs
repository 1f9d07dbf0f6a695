// SPDX-License-Identifier: MPL-2.0
//! Content fetching port.

use crate::domain::media::{ContentRef, MediaLocator};
use crate::error::Result;
use futures_util::future::BoxFuture;

/// Resolves an entry's locator into usable content.
pub trait ContentFetcher: Send + Sync {
    /// Starts fetching the content behind `locator`.
    ///
    /// The returned future must not borrow the fetcher so it can outlive
    /// the call (it is awaited after the catalog may have changed).
    fn fetch(&self, locator: &MediaLocator, name: &str) -> BoxFuture<'static, Result<ContentRef>>;

    /// Invalidates content that is no longer referenced by the catalog.
    ///
    /// The default just drops it.
    fn revoke(&self, content: ContentRef) {
        drop(content);
    }
}
