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

//! Event routing for the playlist.
//!
//! Moves the playlist selection and turns `Enter` into a playlist entry
//! activation, the keyboard equivalent of clicking an entry.

use std::sync::mpsc::Sender;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};

use crate::{
    actions::events::{AppEvent, AppEventProcessor},
    components::{PlayerPanel, select_next, select_previous},
    model::store::PlaybackStore,
};

impl AppEventProcessor for PlayerPanel {
    fn process_event(&mut self, event: Event, store: &PlaybackStore, event_tx: &Sender<AppEvent>) -> Result<bool> {
        if !self.is_active {
            return Ok(false);
        }

        let Event::Key(key) = event else {
            return Ok(false);
        };

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => select_next(&mut self.list_state, store.len()),
            KeyCode::Char('k') | KeyCode::Up => select_previous(&mut self.list_state, store.len()),
            KeyCode::Home => self.list_state.select_first(),
            KeyCode::End => self.list_state.select_last(),
            KeyCode::Enter => {
                if let Some(index) = self.list_state.selected() {
                    event_tx.send(AppEvent::ActivatePlaylistEntry(index))?;
                }
            }
            _ => return Ok(false),
        }

        Ok(true)
    }
}
