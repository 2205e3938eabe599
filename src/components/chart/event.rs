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

//! Event routing for the chart panel.

use std::sync::mpsc::Sender;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};

use crate::{
    actions::events::{AppEvent, AppEventProcessor},
    components::{ChartFocus, ChartPanel, select_next, select_previous},
    model::store::PlaybackStore,
};

impl AppEventProcessor for ChartPanel {
    fn process_event(&mut self, event: Event, _store: &PlaybackStore, event_tx: &Sender<AppEvent>) -> Result<bool> {
        let Some(focus) = self.focus else {
            return Ok(false);
        };

        let Event::Key(key) = event else {
            return Ok(false);
        };

        match (focus, key.code) {
            (_, KeyCode::Char('[')) => {
                if let Some(date) = self.previous_date() {
                    event_tx.send(AppEvent::ChartDateChanged(date))?;
                }
            }
            (_, KeyCode::Char(']')) => {
                if let Some(date) = self.next_date() {
                    event_tx.send(AppEvent::ChartDateChanged(date))?;
                }
            }

            (ChartFocus::Entries, KeyCode::Char('j') | KeyCode::Down) => {
                select_next(&mut self.entries_state, self.entries.len());
            }
            (ChartFocus::Entries, KeyCode::Char('k') | KeyCode::Up) => {
                select_previous(&mut self.entries_state, self.entries.len());
            }
            (ChartFocus::Entries, KeyCode::Enter) => {
                if let Some(entry) = self.selected_entry() {
                    event_tx.send(AppEvent::LookupRequested(entry.title.clone()))?;
                }
            }

            (ChartFocus::Results, KeyCode::Char('j') | KeyCode::Down) => {
                select_next(&mut self.results_state, self.results.len());
            }
            (ChartFocus::Results, KeyCode::Char('k') | KeyCode::Up) => {
                select_previous(&mut self.results_state, self.results.len());
            }
            (ChartFocus::Results, KeyCode::Enter) => {
                if let Some(track) = self.selected_result() {
                    event_tx.send(AppEvent::PlayNow(track.clone()))?;
                }
            }
            (ChartFocus::Results, KeyCode::Char('a')) => {
                if let Some(track) = self.selected_result() {
                    event_tx.send(AppEvent::AddToPlaylist(track.clone()))?;
                }
            }

            _ => return Ok(false),
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use chrono::NaiveDate;
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;
    use crate::model::{ChartEntry, store::tests::track};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn panel() -> ChartPanel {
        let min = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let max = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let mut panel = ChartPanel::new(min, max);
        panel.set_chart(
            max,
            vec![ChartEntry {
                rank: 1,
                title: "Seven".to_string(),
                album: String::new(),
                image_url: String::new(),
            }],
        );
        panel
    }

    #[test]
    fn enter_on_entry_requests_lookup_by_title() {
        let mut panel = panel();
        panel.focus = Some(ChartFocus::Entries);
        let store = PlaybackStore::new();
        let (tx, rx) = mpsc::channel();

        panel.process_event(key(KeyCode::Enter), &store, &tx).unwrap();

        assert!(matches!(rx.try_recv(), Ok(AppEvent::LookupRequested(q)) if q == "Seven"));
    }

    #[test]
    fn result_keys_queue_or_play() {
        let mut panel = panel();
        let seq = panel.begin_lookup("Seven");
        panel.finish_lookup(seq, Ok(vec![track("x")])).unwrap();
        panel.focus = Some(ChartFocus::Results);
        let store = PlaybackStore::new();
        let (tx, rx) = mpsc::channel();

        panel.process_event(key(KeyCode::Char('a')), &store, &tx).unwrap();
        panel.process_event(key(KeyCode::Enter), &store, &tx).unwrap();

        assert!(matches!(rx.try_recv(), Ok(AppEvent::AddToPlaylist(t)) if t.id == "x"));
        assert!(matches!(rx.try_recv(), Ok(AppEvent::PlayNow(t)) if t.id == "x"));
    }

    #[test]
    fn date_keys_report_new_date() {
        let mut panel = panel();
        panel.focus = Some(ChartFocus::Entries);
        let store = PlaybackStore::new();
        let (tx, rx) = mpsc::channel();

        panel.process_event(key(KeyCode::Char(']')), &store, &tx).unwrap();
        panel.process_event(key(KeyCode::Char('[')), &store, &tx).unwrap();

        assert!(matches!(rx.try_recv(), Ok(AppEvent::ChartDateChanged(d)) if d == NaiveDate::from_ymd_opt(2024, 1, 30).unwrap()));
        assert!(rx.try_recv().is_err());
    }
}
