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

//! The "now playing" panel and its playback state machine.
//!
//! The panel owns the transport state (play flag, progress, duration, volume,
//! shuffle and repeat) and drives a [`MediaWidget`]. The playlist and cursor
//! live in the shared [`PlaybackStore`], which is passed in to every
//! transition.
//!
//! # Track changes
//!
//! Any cursor change, from whichever panel, is picked up by
//! [`PlayerPanel::sync`]. The transport is reset, the new media is loaded
//! under a fresh load generation and the panel waits in
//! [`PlayerState::Restarting`] until the widget reports ready for that same
//! generation. Ready notifications for older generations are ignored, so
//! rapid track changes cannot resume the wrong track.

mod event;
mod render;

use anyhow::Result;
use ratatui::widgets::ListState;
use tracing::{debug, warn};

use crate::{
    config::AppConfig,
    model::store::PlaybackStore,
    player::{MediaWidget, WidgetEvent},
};

/// Seek slider resolution, in percent.
const SEEK_STEP: f64 = 0.01;

/// Observable state of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayerState {
    /// Nothing loaded.
    Idle,
    /// New media requested, waiting for the widget to report ready.
    Restarting,
    LoadedPaused,
    LoadedPlaying,
    /// A seek has been issued and not yet confirmed by a progress update.
    Seeking,
    /// The track finished and nothing followed it.
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Restarting { generation: u64, resume: bool },
    Loaded,
    Ended,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Transport {
    pub(crate) is_playing: bool,
    pub(crate) progress: f64,
    pub(crate) duration: f64,
    pub(crate) volume: u8,
    pub(crate) shuffle: bool,
    pub(crate) repeat: bool,
}

pub(crate) struct PlayerPanel {
    pub(crate) transport: Transport,
    pub(crate) list_state: ListState,
    pub(crate) is_active: bool,

    phase: Phase,
    autoplay_on_load: bool,
    seen_cursor_generation: u64,
    load_generation: u64,
    seek_pending: bool,
    scroll_to_cursor: bool,
}

impl PlayerPanel {
    pub(crate) fn new(config: &AppConfig) -> Self {
        Self {
            transport: Transport {
                is_playing: false,
                progress: 0.0,
                duration: 0.0,
                volume: config.initial_volume.min(100),
                shuffle: false,
                repeat: false,
            },
            list_state: ListState::default(),
            is_active: true,
            phase: Phase::Idle,
            autoplay_on_load: config.autoplay_on_load,
            seen_cursor_generation: 0,
            load_generation: 0,
            seek_pending: false,
            scroll_to_cursor: false,
        }
    }

    pub(crate) fn state(&self) -> PlayerState {
        match self.phase {
            Phase::Idle => PlayerState::Idle,
            Phase::Restarting { .. } => PlayerState::Restarting,
            Phase::Ended => PlayerState::Ended,
            Phase::Loaded if self.seek_pending => PlayerState::Seeking,
            Phase::Loaded if self.transport.is_playing => PlayerState::LoadedPlaying,
            Phase::Loaded => PlayerState::LoadedPaused,
        }
    }

    /// Pushes the initial volume to a freshly created widget.
    pub(crate) fn init_widget(&self, widget: &mut dyn MediaWidget) -> Result<()> {
        widget.set_volume_fraction(volume_fraction(self.transport.volume))
    }

    /// Reconciles the panel with the shared store.
    ///
    /// Called after every state change, this starts a restart when the
    /// cursor has moved and forwards play flag changes made elsewhere to the
    /// widget.
    pub(crate) fn sync(&mut self, store: &mut PlaybackStore, widget: &mut dyn MediaWidget) -> Result<()> {
        if store.cursor_generation() != self.seen_cursor_generation {
            self.seen_cursor_generation = store.cursor_generation();
            let resume = store.take_resume_request() || self.autoplay_on_load;
            return self.load_current(store, widget, resume);
        }

        if self.phase == Phase::Loaded && store.is_playing() != self.transport.is_playing {
            self.apply_playing(store.is_playing(), store, widget)?;
        }

        Ok(())
    }

    fn load_current(&mut self, store: &mut PlaybackStore, widget: &mut dyn MediaWidget, resume: bool) -> Result<()> {
        self.transport.progress = 0.0;
        self.transport.duration = 0.0;
        self.transport.is_playing = false;
        self.seek_pending = false;
        store.set_playing(false);

        let Some(track) = store.current_track() else {
            match store.cursor() {
                Some(cursor) => warn!(cursor, len = store.len(), "cursor out of range, nothing loaded"),
                None => debug!("cursor cleared, nothing loaded"),
            }
            // Stop whatever the widget still has loaded.
            if self.phase != Phase::Idle {
                widget.pause()?;
            }
            self.phase = Phase::Idle;
            return Ok(());
        };

        self.load_generation += 1;
        debug!(id = %track.id, generation = self.load_generation, resume, "loading track");
        widget.load(&track.media_url(), self.load_generation)?;

        self.phase = Phase::Restarting {
            generation: self.load_generation,
            resume,
        };
        self.list_state.select(store.cursor());
        self.scroll_to_cursor = true;

        Ok(())
    }

    fn apply_playing(&mut self, playing: bool, store: &mut PlaybackStore, widget: &mut dyn MediaWidget) -> Result<()> {
        self.transport.is_playing = playing;
        store.set_playing(playing);
        if playing {
            widget.play()
        } else {
            widget.pause()
        }
    }

    pub(crate) fn toggle_play_pause(&mut self, store: &mut PlaybackStore, widget: &mut dyn MediaWidget) -> Result<()> {
        match self.phase {
            Phase::Loaded => self.apply_playing(!self.transport.is_playing, store, widget),
            Phase::Restarting { generation, resume } => {
                self.phase = Phase::Restarting {
                    generation,
                    resume: !resume,
                };
                Ok(())
            }
            Phase::Idle | Phase::Ended => Ok(()),
        }
    }

    pub(crate) fn next(&mut self, store: &mut PlaybackStore, widget: &mut dyn MediaWidget) -> Result<()> {
        self.step(store, widget, true)
    }

    pub(crate) fn prev(&mut self, store: &mut PlaybackStore, widget: &mut dyn MediaWidget) -> Result<()> {
        self.step(store, widget, false)
    }

    fn step(&mut self, store: &mut PlaybackStore, widget: &mut dyn MediaWidget, forward: bool) -> Result<()> {
        match step_index(store.cursor(), store.len(), forward, self.transport.shuffle) {
            Some(index) => {
                store.set_cursor(index);
                self.sync(store, widget)
            }
            None => Ok(()),
        }
    }

    /// Plays a playlist entry, as if clicked.
    pub(crate) fn activate_entry(&mut self, index: usize, store: &mut PlaybackStore, widget: &mut dyn MediaWidget) -> Result<()> {
        if index >= store.len() {
            warn!(index, len = store.len(), "ignoring activation of missing playlist entry");
            return Ok(());
        }

        store.set_cursor(index);
        store.request_resume();
        self.sync(store, widget)
    }

    /// Moves the play position to a slider value in `[0, 100]`.
    pub(crate) fn set_seek(&mut self, percent: f64, widget: &mut dyn MediaWidget) -> Result<()> {
        if !matches!(self.phase, Phase::Loaded | Phase::Ended) || !percent.is_finite() {
            return Ok(());
        }

        let percent = ((percent.clamp(0.0, 100.0) / SEEK_STEP).round() * SEEK_STEP).clamp(0.0, 100.0);
        self.transport.progress = percent / 100.0;
        self.seek_pending = true;
        widget.seek_to_fraction(self.transport.progress)
    }

    pub(crate) fn seek_by(&mut self, delta_percent: f64, widget: &mut dyn MediaWidget) -> Result<()> {
        self.set_seek(self.transport.progress * 100.0 + delta_percent, widget)
    }

    pub(crate) fn set_volume(&mut self, volume: i32, widget: &mut dyn MediaWidget) -> Result<()> {
        self.transport.volume = volume.clamp(0, 100) as u8;
        widget.set_volume_fraction(volume_fraction(self.transport.volume))
    }

    pub(crate) fn adjust_volume(&mut self, delta: i32, widget: &mut dyn MediaWidget) -> Result<()> {
        self.set_volume(i32::from(self.transport.volume).saturating_add(delta), widget)
    }

    pub(crate) fn toggle_shuffle(&mut self) {
        self.transport.shuffle = !self.transport.shuffle;
    }

    pub(crate) fn toggle_repeat(&mut self) {
        self.transport.repeat = !self.transport.repeat;
    }

    /// Applies a notification from the media widget.
    pub(crate) fn on_widget_event(
        &mut self,
        event: WidgetEvent,
        store: &mut PlaybackStore,
        widget: &mut dyn MediaWidget,
    ) -> Result<()> {
        match event {
            WidgetEvent::Ready(generation) => match self.phase {
                Phase::Restarting { generation: expected, resume } if expected == generation => {
                    widget.seek_to_fraction(0.0)?;
                    self.phase = Phase::Loaded;
                    if resume {
                        self.apply_playing(true, store, widget)?;
                    }
                }
                _ => debug!(generation, "ignoring stale ready"),
            },

            WidgetEvent::Progress(fraction) => {
                // Progress still arriving from the previous track is dropped
                // until the new one is ready.
                if self.phase == Phase::Loaded && fraction.is_finite() {
                    self.transport.progress = fraction.clamp(0.0, 1.0);
                    self.seek_pending = false;
                }
            }

            WidgetEvent::Duration(seconds) => {
                if self.phase != Phase::Idle && seconds.is_finite() && seconds >= 0.0 {
                    self.transport.duration = seconds;
                }
            }

            WidgetEvent::Ended => {
                if self.phase != Phase::Loaded {
                    return Ok(());
                }

                if self.transport.repeat {
                    self.transport.progress = 0.0;
                    widget.seek_to_fraction(0.0)?;
                    self.apply_playing(true, store, widget)?;
                } else {
                    self.phase = Phase::Ended;
                    self.transport.is_playing = false;
                    store.set_playing(false);
                    self.next(store, widget)?;
                }
            }
        }

        Ok(())
    }

    /// Seconds into the current track, as shown next to the seek bar.
    pub(crate) fn elapsed(&self) -> f64 {
        self.transport.progress * self.transport.duration
    }

    /// Returns `true` once after each cursor change, telling the renderer to
    /// centre the active playlist entry.
    pub(crate) fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_cursor)
    }
}

/// The playlist index `prev`/`next` moves to, or `None` for an empty
/// playlist.
///
/// With shuffle on this is a uniformly random index over the whole playlist,
/// possibly the current one. Otherwise it wraps at both ends. With the
/// cursor unset, forward starts at the first entry and backward at the last.
pub(crate) fn step_index(cursor: Option<usize>, len: usize, forward: bool, shuffle: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }

    if shuffle {
        return Some(rand::random_range(0..len));
    }

    let index = match cursor.map(|c| c.min(len - 1)) {
        Some(c) if forward => (c + 1) % len,
        Some(c) => (c + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };

    Some(index)
}

/// Maps the `0..=100` volume slider to the widget's `[0, 1]` range.
pub(crate) fn volume_fraction(volume: u8) -> f64 {
    f64::from(volume.min(100)) / 100.0
}

/// The list offset that puts `index` in the middle of a view `height` rows
/// tall, without scrolling past the end of the list.
pub(crate) fn center_offset(index: usize, len: usize, height: usize) -> usize {
    index
        .saturating_sub(height / 2)
        .min(len.saturating_sub(height))
}
