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

//! Media playback widget.
//!
//! This module defines the [`MediaWidget`] interface the player panel drives,
//! the [`WidgetEvent`]s the widget reports back, and [`AudioPlayer`], the
//! MPV-backed implementation. The player panel only ever talks to the trait,
//! the widget is driven one way and reports back via the application event
//! channel.

mod commands;

use std::sync::mpsc;

use anyhow::Result;

use crate::{actions::events::AppEvent, player::commands::AudioPlayerCommand};

/// Notifications emitted by the media widget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum WidgetEvent {
    /// The media for the given load generation is ready to play.
    Ready(u64),
    /// Playback position as a fraction of the duration.
    Progress(f64),
    /// Duration of the loaded media, in seconds.
    Duration(f64),
    /// The loaded media played through to the end.
    Ended,
}

/// Commands accepted by a media widget.
pub(crate) trait MediaWidget {
    /// Loads new media, paused. The widget answers with
    /// [`WidgetEvent::Ready`] carrying the same generation.
    fn load(&mut self, media_url: &str, generation: u64) -> Result<()>;

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    fn seek_to_fraction(&mut self, fraction: f64) -> Result<()>;

    fn set_volume_fraction(&mut self, fraction: f64) -> Result<()>;
}

/// A handle to the audio playback engine.
///
/// This struct acts as a command proxy; it does not perform audio processing
/// itself but instead sends instructions to a background worker thread.
pub(crate) struct AudioPlayer {
    /// Channel for sending commands to the background worker thread.
    command_tx: mpsc::Sender<AudioPlayerCommand>,
}

impl AudioPlayer {
    /// Spawns the audio worker thread and returns a new player handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send widget events (progress, ready and so
    ///   on) back to the main event loop.
    pub(crate) fn new(event_tx: mpsc::Sender<AppEvent>) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<AudioPlayerCommand>();

        commands::spawn_player_worker(command_rx, event_tx);

        Ok(Self { command_tx })
    }
}

impl MediaWidget for AudioPlayer {
    fn load(&mut self, media_url: &str, generation: u64) -> Result<()> {
        self.command_tx.send(AudioPlayerCommand::Load {
            url: media_url.to_string(),
            generation,
        })?;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.command_tx.send(AudioPlayerCommand::SetPaused(false))?;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.command_tx.send(AudioPlayerCommand::SetPaused(true))?;
        Ok(())
    }

    fn seek_to_fraction(&mut self, fraction: f64) -> Result<()> {
        self.command_tx
            .send(AudioPlayerCommand::SeekToFraction(fraction.clamp(0.0, 1.0)))?;
        Ok(())
    }

    fn set_volume_fraction(&mut self, fraction: f64) -> Result<()> {
        self.command_tx
            .send(AudioPlayerCommand::SetVolume(fraction.clamp(0.0, 1.0)))?;
        Ok(())
    }
}
