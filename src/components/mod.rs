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

//! The two interactive panels.
//!
//! * [`player`]: Now playing, transport controls and the playlist.
//! * [`chart`]: The dated chart and the lookup results for its entries.
//!
//! Each panel keeps its own view state and is handed the shared
//! [`PlaybackStore`](crate::model::store::PlaybackStore) for any transition
//! that touches the playlist.

pub(crate) mod chart;
pub(crate) mod player;

pub(crate) use chart::{ChartFocus, ChartPanel};
pub(crate) use player::{PlayerPanel, PlayerState};

use ratatui::widgets::ListState;

/// Moves a list selection down one row, wrapping to the top.
pub(crate) fn select_next(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) => if i >= len - 1 { 0 } else { i + 1 },
        None => 0,
    };
    state.select(Some(i));
}

/// Moves a list selection up one row, wrapping to the bottom.
pub(crate) fn select_previous(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) => if i == 0 { len - 1 } else { i - 1 },
        None => 0,
    };
    state.select(Some(i));
}
