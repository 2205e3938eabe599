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

//! Command-line input logic and state management.
//!
//! This module implements the `:` command line: a text input component that,
//! when a command is submitted, dispatches the corresponding application
//! event. It gives exact control over the sliders (`:vol 42`, `:seek 12.5`) and
//! allows free-text lookups that are not on the chart.

use std::sync::mpsc::Sender;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{Event, KeyCode};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::actions::events::AppEvent;

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    /// Handles a terminal event, returning `true` if the command line
    /// consumed it.
    ///
    /// Fails only if the submitted command cannot be delivered.
    pub(crate) fn handle_event(&mut self, event: &Event, event_tx: &Sender<AppEvent>) -> Result<bool> {
        let Event::Key(key_event) = event else {
            return Ok(false);
        };

        if !self.active {
            if key_event.code == KeyCode::Char(':') {
                self.active = true;
                return Ok(true);
            }
            return Ok(false);
        }

        match key_event.code {
            KeyCode::Esc => {
                self.input.reset();
                self.active = false;
            }

            KeyCode::Enter => {
                let event = parse_command(self.input.value().trim());
                self.input.reset();
                self.active = false;
                if let Some(event) = event {
                    event_tx.send(event)?;
                }
            }

            _ => {
                // Delegate all other key events to the managed input component.
                self.input.handle_event(event);
            }
        }

        Ok(true)
    }
}

/// Translates a command line into the event it stands for.
///
/// Malformed commands become an [`AppEvent::Error`] so the problem shows in
/// the status line; an empty line does nothing.
pub(crate) fn parse_command(buffer: &str) -> Option<AppEvent> {
    let parts: Vec<&str> = buffer.split_whitespace().collect();

    let event = match parts.as_slice() {
        [] => return None,

        ["q" | "quit"] => AppEvent::ExitApplication,

        ["p" | "play"] => AppEvent::TogglePlayPause,
        ["pn" | "next"] => AppEvent::Next,
        ["pp" | "prev"] => AppEvent::Previous,

        ["ms" | "shuffle"] => AppEvent::ToggleShuffle,
        ["mr" | "repeat"] => AppEvent::ToggleRepeat,

        ["v" | "vol", volume] => match volume.parse::<i32>() {
            Ok(volume) => AppEvent::SetVolume(volume),
            Err(_) => AppEvent::Error(format!("Invalid volume: {}", volume)),
        },
        ["vc", delta] => match delta.parse::<i32>() {
            Ok(delta) => AppEvent::AdjustVolume(delta),
            Err(_) => AppEvent::Error(format!("Invalid volume change: {}", delta)),
        },

        ["seek", percent] => match percent.parse::<f64>() {
            Ok(percent) if percent.is_finite() => AppEvent::Seek(percent),
            _ => AppEvent::Error(format!("Invalid seek position: {}", percent)),
        },

        ["date", date] => match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(date) => AppEvent::SelectChartDate(date),
            Err(_) => AppEvent::Error(format!("Invalid date, expected YYYY-MM-DD: {}", date)),
        },

        ["find", query @ ..] if !query.is_empty() => AppEvent::LookupRequested(query.join(" ")),

        [cmd, ..] => AppEvent::Error(format!("Unknown command: {}", cmd)),
    };

    Some(event)
}
