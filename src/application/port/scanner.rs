// SPDX-License-Identifier: MPL-2.0
//! Directory scanning port.
//!
//! A scan is a producer running on its own: it pushes [`ScanEvent`]s into a
//! bounded channel and the consumer pulls them at its own pace. Dropping the
//! [`ScanStream`] or cancelling the token stops the producer.

use crate::domain::media::{FolderLocator, RawFileDescriptor};
use crate::error::Error;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// One step of a folder scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// Newly discovered supported files.
    Batch(Vec<RawFileDescriptor>),
    /// A sub-entry could not be read; the scan continues.
    Skipped { path: PathBuf, reason: String },
    /// The folder itself refused access; no more events follow.
    Denied(Error),
}

/// Receiving half of a scan.
#[derive(Debug)]
pub struct ScanStream {
    rx: mpsc::Receiver<ScanEvent>,
}

impl ScanStream {
    /// Creates a connected sender/stream pair with the given buffer size.
    #[must_use]
    pub fn channel(capacity: usize) -> (mpsc::Sender<ScanEvent>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self { rx })
    }

    /// Waits for the next event. Returns `None` once the scan is over.
    pub async fn next(&mut self) -> Option<ScanEvent> {
        self.rx.recv().await
    }

    /// Stops accepting events; the producer notices on its next send.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

/// Recursively discovers media files below a folder.
///
/// Implementations skip hidden entries (names starting with `.`), report
/// unreadable sub-entries as [`ScanEvent::Skipped`] and keep going, and
/// report a folder-level access failure as a single [`ScanEvent::Denied`].
pub trait DirectoryScanner: Send + Sync {
    /// Starts scanning `folder`. Each call starts a fresh walk.
    fn scan(&self, folder: &FolderLocator, cancel: CancellationToken) -> ScanStream;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media::MediaLocator;

    #[tokio::test]
    async fn stream_yields_events_then_ends() {
        let (tx, mut stream) = ScanStream::channel(4);
        let descriptor = RawFileDescriptor::new("a.png", MediaLocator::new("/a.png"));
        tx.send(ScanEvent::Batch(vec![descriptor.clone()]))
            .await
            .expect("send batch");
        drop(tx);

        assert_eq!(stream.next().await, Some(ScanEvent::Batch(vec![descriptor])));
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn closed_stream_rejects_sends() {
        let (tx, mut stream) = ScanStream::channel(1);
        stream.close();
        assert!(tx.send(ScanEvent::Batch(Vec::new())).await.is_err());
    }
}
