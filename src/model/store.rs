// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Shared playback state.
//!
//! The [`PlaybackStore`] is the single owner of the playlist, the playback
//! cursor and the logical play flag. Both the player panel and the chart
//! panel are handed a mutable reference to it for each transition, and only
//! ever change it through the methods below.
//!
//! All mutation happens on the UI thread. Background work (such as the
//! catalog fetch) reports back via application events and the result is
//! applied here by the event loop.

use tracing::{debug, info, warn};

use crate::{error::SourceError, model::Track};

#[derive(Debug, Default)]
pub(crate) struct PlaybackStore {
    playlist: Vec<Track>,
    cursor: Option<usize>,
    is_playing: bool,
    initialized: bool,

    /// Bumped on every [`PlaybackStore::set_cursor`], so re-selecting the
    /// current index still counts as a change.
    cursor_generation: u64,
    resume_requested: bool,
}

impl PlaybackStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seeds the playlist with the outcome of the one-shot catalog fetch.
    ///
    /// Only the first call has any effect. A failed fetch leaves the playlist
    /// empty; nothing is retried.
    pub(crate) fn initialize(&mut self, catalog: Result<Vec<Track>, SourceError>) {
        if self.initialized {
            debug!("playback store already initialized, ignoring catalog");
            return;
        }
        self.initialized = true;

        match catalog {
            Ok(tracks) => {
                info!(count = tracks.len(), "catalog loaded");
                self.replace_playlist(tracks);
            }
            Err(e) => warn!(error = %e, "catalog load failed, playlist left empty"),
        }
    }

    /// Replaces the whole playlist, re-clamping the cursor to the new length.
    ///
    /// If a different track (or none) ends up under the cursor this counts as
    /// a cursor change, so the player reloads.
    pub(crate) fn replace_playlist(&mut self, tracks: Vec<Track>) {
        let previous = self.current_track().cloned();
        self.playlist = tracks;

        self.cursor = match self.cursor {
            Some(_) if self.playlist.is_empty() => None,
            Some(c) => Some(c.min(self.playlist.len() - 1)),
            None => None,
        };

        if self.current_track() != previous.as_ref() {
            debug!(cursor = ?self.cursor, "track under cursor replaced");
            self.cursor_generation += 1;
        }
    }

    /// Appends a track to the end of the playlist.
    ///
    /// Identifiers are not checked, the same track may be added twice.
    pub(crate) fn append_track(&mut self, track: Track) {
        debug!(id = %track.id, "appending track");
        self.playlist.push(track);
    }

    /// Sets the active index.
    ///
    /// The index is stored as given; callers are expected to keep it within
    /// the playlist. Readers treat an out-of-range cursor as nothing loaded.
    pub(crate) fn set_cursor(&mut self, index: usize) {
        self.cursor = Some(index);
        self.cursor_generation += 1;
    }

    /// Sets the logical play flag. The media widget is not touched here.
    pub(crate) fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    /// Asks the player to start playback once the next cursor change has
    /// loaded, regardless of the autoplay setting.
    pub(crate) fn request_resume(&mut self) {
        self.resume_requested = true;
    }

    pub(crate) fn take_resume_request(&mut self) -> bool {
        std::mem::take(&mut self.resume_requested)
    }

    pub(crate) fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    pub(crate) fn len(&self) -> usize {
        self.playlist.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    pub(crate) fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub(crate) fn cursor_generation(&self) -> u64 {
        self.cursor_generation
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// The track under the cursor, if the cursor is set and in range.
    pub(crate) fn current_track(&self) -> Option<&Track> {
        self.cursor.and_then(|c| self.playlist.get(c))
    }

    pub(crate) fn position_of(&self, id: &str) -> Option<usize> {
        self.playlist.iter().position(|t| t.id == id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {}", id),
            artist: "Test Artist".to_string(),
            image_url: String::new(),
            video_id: format!("vid-{}", id),
        }
    }

    pub(crate) fn store_with(count: usize) -> PlaybackStore {
        let mut store = PlaybackStore::new();
        store.replace_playlist((0..count).map(|i| track(&i.to_string())).collect());
        store
    }

    #[test]
    fn new_store_is_empty_and_unset() {
        let store = PlaybackStore::new();

        assert!(store.is_empty());
        assert_eq!(store.cursor(), None);
        assert!(!store.is_playing());
        assert!(store.current_track().is_none());
    }

    #[test]
    fn initialize_replaces_playlist_once() {
        let mut store = PlaybackStore::new();

        store.initialize(Ok(vec![track("a"), track("b")]));
        store.initialize(Ok(vec![track("c")]));

        assert_eq!(store.len(), 2);
        assert_eq!(store.playlist()[0].id, "a");
    }

    #[test]
    fn failed_initialize_leaves_playlist_empty() {
        let mut store = PlaybackStore::new();

        store.initialize(Err(SourceError::Parse("bad json".into())));

        assert!(store.is_empty());

        // No automatic retry, and a late success is ignored too.
        store.initialize(Ok(vec![track("a")]));
        assert!(store.is_empty());
    }

    #[test]
    fn append_permits_duplicates() {
        let mut store = store_with(1);

        store.append_track(track("0"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.position_of("0"), Some(0));
    }

    #[test]
    fn set_cursor_bumps_generation_even_for_same_index() {
        let mut store = store_with(3);

        store.set_cursor(1);
        let first = store.cursor_generation();
        store.set_cursor(1);

        assert_eq!(store.cursor(), Some(1));
        assert!(store.cursor_generation() > first);
    }

    #[test]
    fn out_of_range_cursor_has_no_current_track() {
        let mut store = store_with(2);

        store.set_cursor(5);

        assert_eq!(store.cursor(), Some(5));
        assert!(store.current_track().is_none());
    }

    #[test]
    fn replace_playlist_reclamps_cursor() {
        let mut store = store_with(5);
        store.set_cursor(4);

        store.replace_playlist(vec![track("x"), track("y")]);
        assert_eq!(store.cursor(), Some(1));

        store.replace_playlist(vec![]);
        assert_eq!(store.cursor(), None);
    }

    #[test]
    fn replace_playlist_counts_as_cursor_change_only_if_track_differs() {
        let mut store = store_with(3);
        let before = store.cursor_generation();

        // Cursor unset, nothing under it either way.
        store.replace_playlist(vec![track("a"), track("b")]);
        assert_eq!(store.cursor_generation(), before);

        store.set_cursor(1);
        let selected = store.cursor_generation();
        store.replace_playlist(vec![track("z"), track("1")]);
        assert_eq!(store.cursor_generation(), selected);

        store.replace_playlist(vec![track("c"), track("d")]);
        assert!(store.cursor_generation() > selected);

        let replaced = store.cursor_generation();
        store.replace_playlist(vec![]);
        assert_eq!(store.cursor(), None);
        assert!(store.cursor_generation() > replaced);
    }

    #[test]
    fn resume_request_is_taken_once() {
        let mut store = PlaybackStore::new();

        store.request_resume();

        assert!(store.take_resume_request());
        assert!(!store.take_resume_request());
    }
}
