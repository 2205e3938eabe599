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

//! Chart and lookup results.
//!
//! This module keeps the chart for the selected date and the candidate
//! tracks found for the last looked up entry. Candidates can be queued at the
//! end of the shared playlist or played straight away.
//!
//! Lookups run on the command worker and may complete out of order. Every
//! lookup is numbered and only the response to the most recently issued one
//! is shown.

mod event;
mod render;

use chrono::{Days, NaiveDate};
use ratatui::widgets::ListState;
use tracing::{debug, warn};

use crate::{
    error::SourceError,
    model::{ChartEntry, Track, store::PlaybackStore},
};

/// Which of the panel's two lists has keyboard focus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum ChartFocus {
    #[default]
    Entries,
    Results,
}

pub(crate) struct ChartPanel {
    pub(crate) date: NaiveDate,
    min_date: NaiveDate,
    max_date: NaiveDate,

    pub(crate) entries: Vec<ChartEntry>,
    pub(crate) entries_state: ListState,

    pub(crate) results: Vec<Track>,
    pub(crate) results_state: ListState,
    pub(crate) last_query: Option<String>,
    lookup_seq: u64,
    pub(crate) lookup_pending: bool,

    pub(crate) focus: Option<ChartFocus>,
}

impl ChartPanel {
    /// Creates the panel showing the latest chart in the date range.
    pub(crate) fn new(min_date: NaiveDate, max_date: NaiveDate) -> Self {
        Self {
            date: max_date,
            min_date,
            max_date,
            entries: vec![],
            entries_state: ListState::default(),
            results: vec![],
            results_state: ListState::default(),
            last_query: None,
            lookup_seq: 0,
            lookup_pending: false,
            focus: None,
        }
    }

    /// Moves to a date, clamped to the selectable range.
    ///
    /// Returns the new date if it changed, in which case the caller should
    /// load the chart for it.
    pub(crate) fn select_date(&mut self, date: NaiveDate) -> Option<NaiveDate> {
        let date = date.clamp(self.min_date, self.max_date);
        if date == self.date {
            return None;
        }

        self.date = date;
        self.entries.clear();
        self.entries_state.select(None);
        Some(date)
    }

    pub(crate) fn previous_date(&mut self) -> Option<NaiveDate> {
        let date = self.date.checked_sub_days(Days::new(1))?;
        self.select_date(date)
    }

    pub(crate) fn next_date(&mut self) -> Option<NaiveDate> {
        let date = self.date.checked_add_days(Days::new(1))?;
        self.select_date(date)
    }

    /// Shows a loaded chart, unless the selection has since moved to another
    /// date.
    pub(crate) fn set_chart(&mut self, date: NaiveDate, entries: Vec<ChartEntry>) {
        if date != self.date {
            debug!(%date, selected = %self.date, "ignoring chart for stale date");
            return;
        }

        self.entries = entries;
        self.entries_state.select((!self.entries.is_empty()).then_some(0));
    }

    pub(crate) fn selected_entry(&self) -> Option<&ChartEntry> {
        self.entries_state.selected().and_then(|i| self.entries.get(i))
    }

    pub(crate) fn selected_result(&self) -> Option<&Track> {
        self.results_state.selected().and_then(|i| self.results.get(i))
    }

    /// Starts a lookup for a query, returning its sequence number.
    pub(crate) fn begin_lookup(&mut self, query: &str) -> u64 {
        self.lookup_seq += 1;
        self.last_query = Some(query.to_string());
        self.lookup_pending = true;
        self.lookup_seq
    }

    /// Applies a lookup response.
    ///
    /// Responses to anything but the latest lookup are dropped. A failed
    /// lookup leaves the result list empty; the error is returned so the
    /// caller can report it.
    pub(crate) fn finish_lookup(
        &mut self,
        seq: u64,
        result: Result<Vec<Track>, SourceError>,
    ) -> Result<(), SourceError> {
        if seq != self.lookup_seq {
            debug!(seq, latest = self.lookup_seq, "dropping stale lookup response");
            return Ok(());
        }

        self.lookup_pending = false;

        let outcome = match result {
            Ok(tracks) => {
                debug!(seq, count = tracks.len(), "lookup finished");
                self.results = tracks;
                Ok(())
            }
            Err(e) => {
                warn!(seq, error = %e, "lookup failed");
                self.results.clear();
                Err(e)
            }
        };

        self.results_state.select((!self.results.is_empty()).then_some(0));
        outcome
    }

    /// Queues a candidate at the end of the playlist. Playback is untouched.
    pub(crate) fn add_to_playlist(&self, candidate: &Track, store: &mut PlaybackStore) {
        store.append_track(candidate.clone());
    }

    /// Moves playback to a candidate, appending it first unless a track with
    /// the same identifier is already in the playlist.
    ///
    /// The play flag is cleared and a resume requested, the player panel
    /// restarts playback once the widget has loaded the track. Returns the
    /// playlist index now under the cursor.
    pub(crate) fn play_now(&self, candidate: &Track, store: &mut PlaybackStore) -> usize {
        let index = match store.position_of(&candidate.id) {
            Some(existing) => existing,
            None => {
                store.append_track(candidate.clone());
                store.len() - 1
            }
        };

        store.set_cursor(index);
        store.set_playing(false);
        store.request_resume();
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::player::tests::RecordingWidget,
        components::{PlayerPanel, PlayerState},
        config::AppConfig,
        model::store::tests::{store_with, track},
        player::WidgetEvent,
    };

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn panel() -> ChartPanel {
        ChartPanel::new(date("2024-01-01"), date("2024-01-31"))
    }

    fn entry(rank: u32, title: &str) -> ChartEntry {
        ChartEntry {
            rank,
            title: title.to_string(),
            album: String::new(),
            image_url: String::new(),
        }
    }

    #[test]
    fn starts_on_latest_date() {
        assert_eq!(panel().date, date("2024-01-31"));
    }

    #[test]
    fn date_is_clamped_to_range() {
        let mut panel = panel();

        assert_eq!(panel.next_date(), None);
        assert_eq!(panel.select_date(date("2023-06-01")), Some(date("2024-01-01")));
        assert_eq!(panel.previous_date(), None);
        assert_eq!(panel.next_date(), Some(date("2024-01-02")));
    }

    #[test]
    fn chart_for_stale_date_is_ignored() {
        let mut panel = panel();
        panel.previous_date();

        panel.set_chart(date("2024-01-31"), vec![entry(1, "Old")]);
        assert!(panel.entries.is_empty());

        panel.set_chart(date("2024-01-30"), vec![entry(1, "Current")]);
        assert_eq!(panel.selected_entry().map(|e| e.title.as_str()), Some("Current"));
    }

    #[test]
    fn latest_lookup_wins() {
        let mut panel = panel();
        let first = panel.begin_lookup("Ditto");
        let second = panel.begin_lookup("OMG");

        panel.finish_lookup(second, Ok(vec![track("omg")])).unwrap();
        panel.finish_lookup(first, Ok(vec![track("ditto")])).unwrap();

        assert_eq!(panel.results.len(), 1);
        assert_eq!(panel.results[0].id, "omg");
        assert_eq!(panel.last_query.as_deref(), Some("OMG"));
        assert!(!panel.lookup_pending);
    }

    #[test]
    fn failed_lookup_empties_results() {
        let mut panel = panel();
        let seq = panel.begin_lookup("Ditto");
        panel.finish_lookup(seq, Ok(vec![track("a"), track("b")])).unwrap();

        let seq = panel.begin_lookup("Hype Boy");
        let outcome = panel.finish_lookup(seq, Err(SourceError::MissingApiKey));

        assert!(outcome.is_err());
        assert!(panel.results.is_empty());
        assert_eq!(panel.selected_result(), None);
    }

    #[test]
    fn add_to_playlist_leaves_playback_alone() {
        let panel = panel();
        let mut store = store_with(2);
        store.set_cursor(1);
        let generation = store.cursor_generation();

        panel.add_to_playlist(&track("new"), &mut store);

        assert_eq!(store.len(), 3);
        assert_eq!(store.cursor(), Some(1));
        assert_eq!(store.cursor_generation(), generation);
    }

    #[test]
    fn play_now_existing_track_does_not_duplicate() {
        let panel = panel();
        let mut store = store_with(4);

        let index = panel.play_now(&track("2"), &mut store);

        assert_eq!(index, 2);
        assert_eq!(store.len(), 4);
        assert_eq!(store.cursor(), Some(2));
        assert!(!store.is_playing());
    }

    #[test]
    fn play_now_novel_track_appends_once() {
        let panel = panel();
        let mut store = store_with(4);

        let index = panel.play_now(&track("novel"), &mut store);

        assert_eq!(store.len(), 5);
        assert_eq!(index, 4);
        assert_eq!(store.cursor(), Some(store.len() - 1));
        assert_eq!(store.current_track().map(|t| t.id.as_str()), Some("novel"));
    }

    #[test]
    fn play_now_starts_playback_even_without_autoplay() {
        let config = AppConfig {
            autoplay_on_load: false,
            ..AppConfig::default()
        };
        let panel = panel();
        let mut player = PlayerPanel::new(&config);
        let mut widget = RecordingWidget::default();
        let mut store = store_with(2);

        panel.play_now(&track("novel"), &mut store);
        player.sync(&mut store, &mut widget).unwrap();
        assert_eq!(player.state(), PlayerState::Restarting);

        let generation = widget.last_load_generation().unwrap();
        player.on_widget_event(WidgetEvent::Ready(generation), &mut store, &mut widget).unwrap();

        assert_eq!(player.state(), PlayerState::LoadedPlaying);
        assert!(store.is_playing());
    }
}
