// SPDX-License-Identifier: MPL-2.0
//! Viewport-driven content loading and playback.
//!
//! The renderer registers presentation surfaces and reports their
//! visibility; the loader answers with [`ViewportAction`]s.
//!
//! # Loading
//!
//! A visibility candidate triggers materialization once, on its first
//! transition into the near-visible zone (within the proximity margin of the
//! viewport), and is then no longer observed for loading. The fetch runs as
//! a detached future ([`MaterializeTask`]); its [`ContentLoaded`] result must
//! be handed back to [`ViewportLoader::complete`], which drops it if the
//! entry was removed or released in the meantime.
//!
//! A failed load marks the entry and re-arms its surfaces: leaving and
//! re-entering the near-visible zone retries.
//!
//! # Playback
//!
//! Playback candidates (videos only) play while at least the configured
//! fraction of the surface is visible and pause otherwise, for as long as
//! the surface stays registered.

use crate::application::catalog::{LoadOutcome, MediaCatalog};
use crate::application::port::ContentFetcher;
use crate::config::defaults::{DEFAULT_PLAYBACK_THRESHOLD, DEFAULT_PROXIMITY_MARGIN_PX};
use crate::domain::media::{ContentRef, ContentState, EntryId, LoadTicket, MediaEntry};
use crate::error::{Error, Result};
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Renderer-issued handle for one presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Visibility of a surface relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visibility {
    /// Gap between the surface and the viewport edge in pixels; 0 when they overlap.
    pub distance_px: f32,
    /// Fraction of the surface inside the viewport, `0.0..=1.0`.
    pub visible_fraction: f32,
}

impl Visibility {
    /// Surface entirely outside the viewport, `distance_px` away from it.
    #[must_use]
    pub fn offscreen(distance_px: f32) -> Self {
        Self {
            distance_px: distance_px.max(0.0),
            visible_fraction: 0.0,
        }
    }

    /// Surface overlapping the viewport with the given visible fraction.
    #[must_use]
    pub fn onscreen(visible_fraction: f32) -> Self {
        Self {
            distance_px: 0.0,
            visible_fraction: visible_fraction.clamp(0.0, 1.0),
        }
    }
}

/// Thresholds used to interpret visibility signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    /// Surfaces closer than this to the viewport count as near-visible.
    pub proximity_margin_px: f32,
    /// Minimum visible fraction for playback.
    pub playback_threshold: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            proximity_margin_px: DEFAULT_PROXIMITY_MARGIN_PX,
            playback_threshold: DEFAULT_PLAYBACK_THRESHOLD,
        }
    }
}

/// Result of a materialization, to be passed to [`ViewportLoader::complete`].
#[derive(Debug)]
pub struct ContentLoaded {
    pub entry: EntryId,
    ticket: LoadTicket,
    pub result: Result<ContentRef>,
}

/// A pending content fetch for one entry.
pub struct MaterializeTask {
    entry: EntryId,
    future: BoxFuture<'static, ContentLoaded>,
}

impl MaterializeTask {
    #[must_use]
    pub fn entry(&self) -> EntryId {
        self.entry
    }

    /// Awaits the fetch.
    pub async fn run(self) -> ContentLoaded {
        self.future.await
    }

    /// Returns the fetch as a `Send + 'static` future, e.g. for `tokio::spawn`.
    #[must_use]
    pub fn into_future(self) -> BoxFuture<'static, ContentLoaded> {
        self.future
    }
}

impl fmt::Debug for MaterializeTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterializeTask")
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

/// What the renderer should do in response to a visibility change.
#[derive(Debug)]
pub enum ViewportAction {
    Materialize(MaterializeTask),
    Play(EntryId),
    Pause(EntryId),
}

#[derive(Debug, Clone, Copy)]
struct LoadWatch {
    entry: EntryId,
    near: bool,
}

#[derive(Debug, Clone, Copy)]
struct PlaybackWatch {
    entry: EntryId,
    playing: bool,
}

/// Decides when entry content is materialized, released, played and paused.
pub struct ViewportLoader {
    config: ViewportConfig,
    fetcher: Arc<dyn ContentFetcher>,
    load_watches: HashMap<SurfaceId, LoadWatch>,
    playback_watches: HashMap<SurfaceId, PlaybackWatch>,
    /// Surfaces that fired (or joined) an in-flight load, per entry.
    in_flight: HashMap<EntryId, Vec<SurfaceId>>,
}

impl ViewportLoader {
    #[must_use]
    pub fn new(config: ViewportConfig, fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self {
            config,
            fetcher,
            load_watches: HashMap::new(),
            playback_watches: HashMap::new(),
            in_flight: HashMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> ViewportConfig {
        self.config
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Starts observing `surface` to load `entry` once it comes near the viewport.
    ///
    /// Registering a surface that is already observed for `entry`, or whose
    /// load of `entry` is in flight, does nothing. A surface recycled from
    /// another entry stops observing that entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEntry`] for ids the catalog never issued.
    pub fn register_visibility_candidate(
        &mut self,
        catalog: &MediaCatalog,
        entry: EntryId,
        surface: SurfaceId,
    ) -> Result<()> {
        catalog.check_issued(entry)?;
        self.rebind_load(surface, entry);
        let in_flight = self
            .in_flight
            .get(&entry)
            .is_some_and(|surfaces| surfaces.contains(&surface));
        if in_flight {
            return Ok(());
        }
        self.load_watches
            .entry(surface)
            .or_insert(LoadWatch { entry, near: false });
        Ok(())
    }

    /// Starts observing `surface` to play and pause a video entry.
    ///
    /// Entries removed meanwhile are ignored. A surface recycled from another
    /// entry is rebound; the returned pause action stops the previous entry
    /// if it was playing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEntry`] for ids never issued and
    /// [`Error::NotPlayable`] for entries that are not videos.
    pub fn register_playback_candidate(
        &mut self,
        catalog: &MediaCatalog,
        entry: EntryId,
        surface: SurfaceId,
    ) -> Result<Option<ViewportAction>> {
        catalog.check_issued(entry)?;
        let Some(media) = catalog.get(entry) else {
            return Ok(None);
        };
        if !media.kind().is_playable() {
            return Err(Error::NotPlayable(entry));
        }

        let previous = self.playback_watches.insert(
            surface,
            PlaybackWatch {
                entry,
                playing: false,
            },
        );
        match previous {
            Some(watch) if watch.entry == entry => {
                self.playback_watches.insert(surface, watch);
                Ok(None)
            }
            Some(watch) if watch.playing => Ok(Some(ViewportAction::Pause(watch.entry))),
            _ => Ok(None),
        }
    }

    /// Detaches `surface` from any entry other than `entry`.
    fn rebind_load(&mut self, surface: SurfaceId, entry: EntryId) {
        if self
            .load_watches
            .get(&surface)
            .is_some_and(|watch| watch.entry != entry)
        {
            self.load_watches.remove(&surface);
        }
        for (owner, surfaces) in &mut self.in_flight {
            if *owner != entry {
                surfaces.retain(|s| *s != surface);
            }
        }
    }

    /// Stops observing a surface. Returns a pause action if it was playing.
    pub fn unregister_surface(&mut self, surface: SurfaceId) -> Option<ViewportAction> {
        self.load_watches.remove(&surface);
        for surfaces in self.in_flight.values_mut() {
            surfaces.retain(|s| *s != surface);
        }
        self.playback_watches
            .remove(&surface)
            .filter(|watch| watch.playing)
            .map(|watch| ViewportAction::Pause(watch.entry))
    }

    /// Returns `true` if the surface is still observed for loading.
    #[must_use]
    pub fn is_observing(&self, surface: SurfaceId) -> bool {
        self.load_watches.contains_key(&surface)
    }

    /// Returns `true` if any playback surface is registered for `entry`.
    #[must_use]
    pub fn has_playback_surface(&self, entry: EntryId) -> bool {
        self.playback_watches.values().any(|w| w.entry == entry)
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Feeds a visibility change for `surface` and returns the resulting actions.
    ///
    /// Unknown surfaces produce no actions.
    pub fn update_visibility(
        &mut self,
        catalog: &mut MediaCatalog,
        surface: SurfaceId,
        visibility: Visibility,
    ) -> Vec<ViewportAction> {
        let mut actions = Vec::new();

        let near = visibility.distance_px <= self.config.proximity_margin_px;
        if let Some(watch) = self.load_watches.get_mut(&surface) {
            let entering = near && !watch.near;
            watch.near = near;
            if entering {
                let entry = watch.entry;
                self.load_watches.remove(&surface);
                if let Some(task) = self.start_load(catalog, entry, surface) {
                    actions.push(ViewportAction::Materialize(task));
                }
            }
        }

        let should_play = visibility.visible_fraction >= self.config.playback_threshold;
        if let Some(watch) = self.playback_watches.get_mut(&surface) {
            if watch.playing != should_play {
                watch.playing = should_play;
                actions.push(if should_play {
                    ViewportAction::Play(watch.entry)
                } else {
                    ViewportAction::Pause(watch.entry)
                });
            }
        }

        actions
    }

    fn start_load(
        &mut self,
        catalog: &mut MediaCatalog,
        entry: EntryId,
        surface: SurfaceId,
    ) -> Option<MaterializeTask> {
        let ticket = match catalog.begin_load(entry) {
            Ok(Some(ticket)) => ticket,
            Ok(None) => {
                let loading = catalog
                    .get(entry)
                    .is_some_and(|media| matches!(media.content(), ContentState::Loading(_)));
                if loading {
                    self.join_in_flight(entry, surface);
                }
                return None;
            }
            Err(err) => {
                tracing::warn!(%entry, %err, "visibility candidate for unknown entry");
                return None;
            }
        };

        let media = catalog.get(entry)?;
        tracing::debug!(%entry, name = media.name(), "materializing content");
        let fetch = self.fetcher.fetch(media.locator(), media.name());
        self.join_in_flight(entry, surface);

        Some(MaterializeTask {
            entry,
            future: Box::pin(async move {
                ContentLoaded {
                    entry,
                    ticket,
                    result: fetch.await,
                }
            }),
        })
    }

    fn join_in_flight(&mut self, entry: EntryId, surface: SurfaceId) {
        let surfaces = self.in_flight.entry(entry).or_default();
        if !surfaces.contains(&surface) {
            surfaces.push(surface);
        }
    }

    // =========================================================================
    // Completion and release
    // =========================================================================

    /// Applies a finished materialization.
    ///
    /// Results for entries that were removed, released or reloaded since the
    /// request started are revoked instead of being written back.
    pub fn complete(&mut self, catalog: &mut MediaCatalog, loaded: ContentLoaded) -> LoadOutcome {
        let entry = loaded.entry;
        let surfaces = self.in_flight.remove(&entry).unwrap_or_default();
        let outcome = catalog.finish_load(entry, loaded.ticket, loaded.result);

        match &outcome {
            LoadOutcome::Applied => {
                tracing::debug!(%entry, "content materialized");
            }
            LoadOutcome::Failed => {
                tracing::warn!(%entry, "content materialization failed");
                for surface in surfaces {
                    self.load_watches
                        .entry(surface)
                        .or_insert(LoadWatch { entry, near: true });
                }
            }
            LoadOutcome::Discarded(content) => {
                tracing::debug!(%entry, "discarding content for stale request");
                if let Some(content) = content.clone() {
                    self.fetcher.revoke(content);
                }
            }
        }
        outcome
    }

    /// Drops an entry's content and marks it released for good.
    ///
    /// Visibility observations of the entry end first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlaybackActive`] while a playback surface is still
    /// registered for the entry, and [`Error::UnknownEntry`] for ids never
    /// issued.
    pub fn release(&mut self, catalog: &mut MediaCatalog, entry: EntryId) -> Result<()> {
        catalog.check_issued(entry)?;
        if self.has_playback_surface(entry) {
            return Err(Error::PlaybackActive(entry));
        }

        self.load_watches.retain(|_, watch| watch.entry != entry);
        self.in_flight.remove(&entry);
        if let Some(content) = catalog.release_content(entry)? {
            self.fetcher.revoke(content);
        }
        Ok(())
    }

    /// Forgets entries that left the catalog: ends every observation of them
    /// and revokes their content. Returns pause actions for playing surfaces.
    pub fn retire(&mut self, removed: &[MediaEntry]) -> Vec<ViewportAction> {
        let mut actions = Vec::new();

        for media in removed {
            let entry = media.id();
            self.load_watches.retain(|_, watch| watch.entry != entry);
            self.in_flight.remove(&entry);

            let playing: Vec<SurfaceId> = self
                .playback_watches
                .iter()
                .filter(|(_, watch)| watch.entry == entry)
                .map(|(surface, _)| *surface)
                .collect();
            for surface in playing {
                if let Some(action) = self.unregister_surface(surface) {
                    actions.push(action);
                }
            }

            if let Some(content) = media.content().content() {
                self.fetcher.revoke(content.clone());
            }
        }
        actions
    }
}

impl fmt::Debug for ViewportLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportLoader")
            .field("config", &self.config)
            .field("load_watches", &self.load_watches.len())
            .field("playback_watches", &self.playback_watches.len())
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}
