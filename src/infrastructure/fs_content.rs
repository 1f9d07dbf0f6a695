// SPDX-License-Identifier: MPL-2.0
//! Filesystem content fetcher.

use crate::application::port::ContentFetcher;
use crate::domain::media::classifier::mime_type;
use crate::domain::media::{ContentRef, MediaLocator};
use crate::error::{Error, Result};
use futures_util::future::BoxFuture;

/// Reads entry bytes from disk with `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsContentFetcher;

impl FsContentFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ContentFetcher for FsContentFetcher {
    fn fetch(
        &self,
        locator: &MediaLocator,
        name: &str,
    ) -> BoxFuture<'static, Result<ContentRef>> {
        let path = locator.as_path().to_path_buf();
        let mime = mime_type(name);
        Box::pin(async move {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|err| Error::from_io_at(&err, &path))?;
            Ok(ContentRef::new(bytes, mime))
        })
    }
}
