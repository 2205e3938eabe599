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

//! Application event distribution and orchestration.
//!
//! This module defines the central event-handling logic for the application,
//! bridging the gap between user input (keyboard), background worker updates
//! (sources, media widget), and the UI rendering pipeline.
//!
//! # Architecture
//!
//! The system follows a reactive event-loop pattern:
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum through an
//!    asynchronous channel.
//! 2. **Process**: [`apply_event`] updates the [`App`] state, triggers
//!    commands to background workers and lets the player panel catch up with
//!    any change made to the shared playback store.
//! 3. **Render**: After each event is processed, the UI is re-drawn using the
//!    `ratatui` terminal.

use std::{io::Stdout, sync::mpsc::Sender};

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::{error, warn};

use crate::{
    App,
    actions::commands::AppCommand,
    components::ChartFocus,
    error::SourceError,
    model::{ChartEntry, Track, store::PlaybackStore},
    player::WidgetEvent,
    render::draw,
};

const FINE_VOLUME_DELTA: i32 = 1;
const VOLUME_DELTA: i32 = 5;

const FINE_SEEK_DELTA: f64 = 1.0;
const SEEK_DELTA: f64 = 5.0;

/// The list that currently receives navigation keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Focus {
    #[default]
    Playlist,
    Chart,
    Results,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Playlist => Focus::Chart,
            Focus::Chart => Focus::Results,
            Focus::Results => Focus::Playlist,
        }
    }
}

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),
    Tick,

    CatalogLoaded(Result<Vec<Track>, SourceError>),
    ChartLoaded(NaiveDate, Result<Vec<ChartEntry>, SourceError>),
    LookupFinished {
        seq: u64,
        result: Result<Vec<Track>, SourceError>,
    },

    /// The chart panel moved to a new date that still needs loading.
    ChartDateChanged(NaiveDate),
    SelectChartDate(NaiveDate),
    LookupRequested(String),

    ActivatePlaylistEntry(usize),
    AddToPlaylist(Track),
    PlayNow(Track),

    Widget(WidgetEvent),

    TogglePlayPause,
    Next,
    Previous,
    SetVolume(i32),
    AdjustVolume(i32),
    /// Absolute seek slider value, in percent.
    Seek(f64),
    SeekBy(f64),
    ToggleShuffle,
    ToggleRepeat,

    ExitApplication,

    Error(String),
    FatalError(String),
}

pub(crate) trait AppEventProcessor {
    /// Handles a terminal event, returning `true` if it was consumed.
    fn process_event(&mut self, event: Event, store: &PlaybackStore, event_tx: &Sender<AppEvent>) -> Result<bool>;
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed. A fatal error ends the loop with that error.
pub(crate) fn process_events(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::ExitApplication => break,
            AppEvent::FatalError(message) => {
                error!(%message, "fatal error");
                return Err(anyhow!(message));
            }
            event => apply_event(app, event)?,
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

/// Applies a single event to the application state.
///
/// Whatever the event changed in the playback store, the player panel is
/// synchronised with it afterwards.
pub(crate) fn apply_event(app: &mut App, event: AppEvent) -> Result<()> {
    handle_event(app, event)?;
    app.player_panel.sync(&mut app.store, app.audio_player.as_mut())
}

fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    let widget = app.audio_player.as_mut();

    match event {
        AppEvent::Key(key) => process_key_event(app, key)?,

        AppEvent::Tick => {}

        AppEvent::CatalogLoaded(result) => {
            if let Err(e) = &result {
                app.status = Some(format!("Catalog unavailable: {}", e));
            }
            app.store.initialize(result);
        }

        AppEvent::ChartLoaded(date, result) => match result {
            Ok(entries) => app.chart_panel.set_chart(date, entries),
            Err(e) => {
                warn!(%date, error = %e, "chart load failed");
                app.chart_panel.set_chart(date, vec![]);
                app.status = Some(format!("Chart for {} unavailable: {}", date, e));
            }
        },

        AppEvent::LookupFinished { seq, result } => {
            if let Err(e) = app.chart_panel.finish_lookup(seq, result) {
                app.status = Some(format!("Lookup failed: {}", e));
            }
        }

        AppEvent::ChartDateChanged(date) => app.command_tx.send(AppCommand::LoadChart(date))?,
        AppEvent::SelectChartDate(date) => {
            if let Some(date) = app.chart_panel.select_date(date) {
                app.command_tx.send(AppCommand::LoadChart(date))?;
            }
        }
        AppEvent::LookupRequested(query) => {
            let seq = app.chart_panel.begin_lookup(&query);
            app.command_tx.send(AppCommand::Lookup { query, seq })?;
        }

        AppEvent::ActivatePlaylistEntry(index) => app.player_panel.activate_entry(index, &mut app.store, widget)?,
        AppEvent::AddToPlaylist(track) => app.chart_panel.add_to_playlist(&track, &mut app.store),
        AppEvent::PlayNow(track) => {
            app.chart_panel.play_now(&track, &mut app.store);
        }

        AppEvent::Widget(event) => app.player_panel.on_widget_event(event, &mut app.store, widget)?,

        AppEvent::TogglePlayPause => app.player_panel.toggle_play_pause(&mut app.store, widget)?,
        AppEvent::Next => app.player_panel.next(&mut app.store, widget)?,
        AppEvent::Previous => app.player_panel.prev(&mut app.store, widget)?,
        AppEvent::SetVolume(volume) => app.player_panel.set_volume(volume, widget)?,
        AppEvent::AdjustVolume(delta) => app.player_panel.adjust_volume(delta, widget)?,
        AppEvent::Seek(percent) => app.player_panel.set_seek(percent, widget)?,
        AppEvent::SeekBy(delta) => app.player_panel.seek_by(delta, widget)?,
        AppEvent::ToggleShuffle => app.player_panel.toggle_shuffle(),
        AppEvent::ToggleRepeat => app.player_panel.toggle_repeat(),

        AppEvent::Error(message) => {
            warn!(%message, "reported error");
            app.status = Some(message);
        }

        // Both end the loop before getting here.
        AppEvent::ExitApplication | AppEvent::FatalError(_) => {}
    }

    Ok(())
}

/// Routes a key press to the command line, then the focused panel, then the
/// global key bindings, stopping at the first that consumes it.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    let event = Event::Key(key);
    if app.commander.handle_event(&event, &app.event_tx)? {
        return Ok(());
    }

    if app.player_panel.process_event(event.clone(), &app.store, &app.event_tx)? {
        return Ok(());
    }

    if app.chart_panel.process_event(event, &app.store, &app.event_tx)? {
        return Ok(());
    }

    process_global_key_event(app, key)
}

fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    let event = match key.code {
        KeyCode::Char('q') => AppEvent::ExitApplication,

        KeyCode::Tab => {
            let focus = app.focus.next();
            set_focus(app, focus);
            return Ok(());
        }

        // Playback controls
        KeyCode::Char(' ') => AppEvent::TogglePlayPause,
        KeyCode::Char('b') => AppEvent::Previous,
        KeyCode::Char('n') => AppEvent::Next,
        KeyCode::Char('s') => AppEvent::ToggleShuffle,
        KeyCode::Char('r') => AppEvent::ToggleRepeat,
        KeyCode::Char(',') => AppEvent::SeekBy(-FINE_SEEK_DELTA),
        KeyCode::Char('.') => AppEvent::SeekBy(FINE_SEEK_DELTA),
        KeyCode::Char('<') => AppEvent::SeekBy(-SEEK_DELTA),
        KeyCode::Char('>') => AppEvent::SeekBy(SEEK_DELTA),
        KeyCode::Char('-') => AppEvent::AdjustVolume(-FINE_VOLUME_DELTA),
        KeyCode::Char('=') => AppEvent::AdjustVolume(FINE_VOLUME_DELTA),
        KeyCode::Char('_') => AppEvent::AdjustVolume(-VOLUME_DELTA),
        KeyCode::Char('+') => AppEvent::AdjustVolume(VOLUME_DELTA),

        _ => return Ok(()),
    };

    app.event_tx.send(event)?;
    Ok(())
}

fn set_focus(app: &mut App, focus: Focus) {
    app.focus = focus;
    app.player_panel.is_active = focus == Focus::Playlist;
    app.chart_panel.focus = match focus {
        Focus::Playlist => None,
        Focus::Chart => Some(ChartFocus::Entries),
        Focus::Results => Some(ChartFocus::Results),
    };
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Receiver};

    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::{
        components::{PlayerState, player::tests::RecordingWidget},
        config::AppConfig,
        model::store::tests::track,
    };

    fn app() -> (App, Receiver<AppCommand>) {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let app = App::with_channels(
            AppConfig::default(),
            command_tx,
            event_tx,
            event_rx,
            Box::new(RecordingWidget::default()),
        );
        (app, command_rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        apply_event(app, AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))).unwrap();
    }

    /// Applies everything the handlers queued up in the meantime.
    fn pump(app: &mut App) {
        while let Ok(event) = app.event_rx.try_recv() {
            apply_event(app, event).unwrap();
        }
    }

    #[test]
    fn catalog_then_activation_plays_once_ready() {
        let (mut app, _commands) = app();

        apply_event(&mut app, AppEvent::CatalogLoaded(Ok(vec![track("a"), track("b")]))).unwrap();
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.player_panel.state(), PlayerState::Idle);

        apply_event(&mut app, AppEvent::ActivatePlaylistEntry(1)).unwrap();
        assert_eq!(app.player_panel.state(), PlayerState::Restarting);
        assert!(!app.store.is_playing());

        apply_event(&mut app, AppEvent::Widget(WidgetEvent::Ready(1))).unwrap();
        assert_eq!(app.player_panel.state(), PlayerState::LoadedPlaying);
        assert_eq!(app.store.cursor(), Some(1));
        assert!(app.store.is_playing());
    }

    #[test]
    fn failed_catalog_shows_status() {
        let (mut app, _commands) = app();

        apply_event(&mut app, AppEvent::CatalogLoaded(Err(SourceError::Parse("bad".to_string())))).unwrap();

        assert!(app.store.is_empty());
        assert!(app.status.as_deref().is_some_and(|s| s.starts_with("Catalog unavailable")));
    }

    #[test]
    fn tab_cycles_focus() {
        let (mut app, _commands) = app();
        assert!(app.player_panel.is_active);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Chart);
        assert!(!app.player_panel.is_active);
        assert_eq!(app.chart_panel.focus, Some(ChartFocus::Entries));

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.chart_panel.focus, Some(ChartFocus::Results));

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Playlist);
        assert!(app.player_panel.is_active);
        assert_eq!(app.chart_panel.focus, None);
    }

    #[test]
    fn lookup_request_is_numbered_and_result_shown() {
        let (mut app, commands) = app();

        apply_event(&mut app, AppEvent::LookupRequested("Supernova".to_string())).unwrap();
        let seq = match commands.try_recv() {
            Ok(AppCommand::Lookup { query, seq }) => {
                assert_eq!(query, "Supernova");
                seq
            }
            other => panic!("unexpected command: {:?}", other),
        };

        apply_event(&mut app, AppEvent::LookupFinished { seq, result: Ok(vec![track("s")]) }).unwrap();

        assert_eq!(app.chart_panel.results.len(), 1);
        assert!(!app.chart_panel.lookup_pending);
    }

    #[test]
    fn play_now_result_starts_restart() {
        let (mut app, _commands) = app();
        apply_event(&mut app, AppEvent::CatalogLoaded(Ok(vec![track("a")]))).unwrap();

        apply_event(&mut app, AppEvent::PlayNow(track("z"))).unwrap();

        assert_eq!(app.store.len(), 2);
        assert_eq!(app.store.cursor(), Some(1));
        assert_eq!(app.player_panel.state(), PlayerState::Restarting);
    }

    #[test]
    fn global_keys_drive_the_player() {
        let (mut app, _commands) = app();
        apply_event(&mut app, AppEvent::CatalogLoaded(Ok(vec![track("a"), track("b")]))).unwrap();

        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('+'));
        pump(&mut app);

        assert_eq!(app.store.cursor(), Some(0));
        assert_eq!(app.player_panel.transport.volume, 35);
    }

    #[test]
    fn command_line_date_loads_chart() {
        let (mut app, commands) = app();
        let date = NaiveDate::from_ymd_opt(2021, 5, 5).unwrap();

        apply_event(&mut app, AppEvent::SelectChartDate(date)).unwrap();

        assert_eq!(app.chart_panel.date, date);
        assert!(matches!(commands.try_recv(), Ok(AppCommand::LoadChart(d)) if d == date));
    }

    #[test]
    fn reported_error_reaches_status_line() {
        let (mut app, _commands) = app();

        apply_event(&mut app, AppEvent::Error("Unknown command: x".to_string())).unwrap();

        assert_eq!(app.status.as_deref(), Some("Unknown command: x"));
    }
}
