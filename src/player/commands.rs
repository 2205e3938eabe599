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

//! MPV-backed playback engine and event processing.
//!
//! This module bridges the [`AudioPlayerCommand`]s sent by the
//! [`AudioPlayer`](super::AudioPlayer) handle and the MPV property
//! observation system. Remote media references are resolved by MPV's own
//! `ytdl` hook.
//!
//! # Architecture
//!
//! The engine operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`AudioPlayerCommand`]s from the player
//!    panel (load, pause, seek, volume).
//! 2. **Event Channel**: Broadcasts [`WidgetEvent`]s wrapped in
//!    [`AppEvent::Widget`] to report readiness, progress, duration and the
//!    end of a track.

use anyhow::{Context, Result};
use mpv::Format;
use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
};
use tracing::{debug, warn};

use crate::{actions::events::AppEvent, player::WidgetEvent};

/// The most recent load, the only one a `FileLoaded` may report ready.
#[derive(Debug, Clone, PartialEq)]
struct LoadRequest {
    url: String,
    generation: u64,
}

#[derive(Debug)]
pub(crate) enum AudioPlayerCommand {
    Load { url: String, generation: u64 },
    SetPaused(bool),
    SeekToFraction(f64),
    SetVolume(f64),
}

/// Spawns the audio worker thread to process playback commands.
///
/// If the internal worker returns an error, it is caught here and broadcast as
/// a fatal application event.
///
/// # Arguments
///
/// * `command_rx` - The receiving end of the player command channel.
/// * `event_tx` - The channel used to broadcast playback updates and errors.
pub(crate) fn spawn_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = audio_player_worker(command_rx, event_tx) {
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

/// The primary execution loop for the audio player backend.
///
/// Initializes a local `libmpv` context, then alternates between draining
/// pending commands and polling for MPV events until the application goes
/// away.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or if the event
/// channel back to the application is closed.
fn audio_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        builder
            .set_option("ytdl", "yes")
            .context("Failed to enable ytdl hook")?;
        builder
            .set_option("keep-open", "yes")
            .context("Failed to set keep-open")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<f64>("percent-pos", 0)
        .context("Failed to observe percent-pos")?;
    handler
        .observe_property::<bool>("eof-reached", 0)
        .context("Failed to observe eof-reached")?;

    let mut latest_load = None;

    loop {
        if !process_commands(&mut handler, &command_rx, &mut latest_load) {
            return Ok(());
        }
        process_mpv_events(&mut handler, latest_load.as_ref(), &event_tx)?;
    }
}

/// Drains and executes all pending commands from the application channel.
///
/// Returns `false` once the command channel has been closed. A command MPV
/// rejects (such as seeking with nothing loaded) is logged and skipped.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &mpsc::Receiver<AudioPlayerCommand>,
    latest_load: &mut Option<LoadRequest>,
) -> bool {
    loop {
        let command = match command_rx.try_recv() {
            Ok(command) => command,
            Err(mpsc::TryRecvError::Empty) => return true,
            Err(mpsc::TryRecvError::Disconnected) => return false,
        };

        if let Err(e) = process_command(handler, command, latest_load) {
            warn!(error = ?e, "media command rejected");
        }
    }
}

fn process_command(
    handler: &mut mpv::MpvHandler,
    command: AudioPlayerCommand,
    latest_load: &mut Option<LoadRequest>,
) -> Result<()> {
    match command {
        AudioPlayerCommand::Load { url, generation } => {
            debug!(%url, generation, "loading media");
            handler.set_property("pause", true)?;
            handler
                .command(&["loadfile", &url, "replace"])
                .context(format!("Failed to load media: {}", &url))?;
            *latest_load = Some(LoadRequest { url, generation });
        }
        AudioPlayerCommand::SetPaused(paused) => {
            handler.set_property("pause", paused)?;
        }
        AudioPlayerCommand::SeekToFraction(fraction) => {
            let percent = (fraction * 100.0).to_string();
            handler.command(&["seek", &percent, "absolute-percent"])?;
        }
        AudioPlayerCommand::SetVolume(fraction) => {
            handler.set_property("volume", fraction * 100.0)?;
        }
    }

    Ok(())
}

/// Polls for MPV events and forwards them as widget events.
///
/// This function waits for up to 50ms for an event from the MPV context.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    latest_load: Option<&LoadRequest>,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<()> {
    let mut file_loaded = false;

    if let Some(mpv_event) = handler.wait_event(0.05) {
        let mut widget_event = match mpv_event {
            mpv::Event::FileLoaded => {
                file_loaded = true;
                None
            }
            mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
                ("duration", Format::Double(duration)) => Some(WidgetEvent::Duration(duration)),
                ("percent-pos", Format::Double(percent)) => {
                    Some(WidgetEvent::Progress((percent / 100.0).clamp(0.0, 1.0)))
                }
                // The file stays loaded at its end so a repeat can seek back.
                ("eof-reached", Format::Flag(true)) => Some(WidgetEvent::Ended),
                _ => None,
            },
            _ => None,
        };

        if file_loaded {
            let path = handler.get_property::<&str>("path").map(str::to_owned).ok();
            widget_event = ready_generation(path.as_deref(), latest_load).map(WidgetEvent::Ready);
        }

        if let Some(event) = widget_event {
            event_tx
                .send(AppEvent::Widget(event))
                .context("Failed to send widget event")?;
        }
    }

    Ok(())
}

/// The generation a `FileLoaded` event stands for.
///
/// The event only resolves the latest load if the file mpv now has loaded is
/// the one that load asked for. A file from an earlier load that finished
/// after a newer `loadfile` was issued yields `None`.
fn ready_generation(loaded_path: Option<&str>, latest_load: Option<&LoadRequest>) -> Option<u64> {
    let latest = latest_load?;
    match loaded_path {
        Some(path) if path == latest.url => Some(latest.generation),
        _ => {
            debug!(path = ?loaded_path, generation = latest.generation, "file loaded for a superseded request");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str, generation: u64) -> LoadRequest {
        LoadRequest {
            url: url.to_string(),
            generation,
        }
    }

    #[test]
    fn loaded_file_matching_latest_request_is_ready() {
        let latest = request("https://www.youtube.com/watch?v=b", 2);

        assert_eq!(ready_generation(Some("https://www.youtube.com/watch?v=b"), Some(&latest)), Some(2));
    }

    #[test]
    fn file_from_superseded_load_is_not_ready() {
        let latest = request("https://www.youtube.com/watch?v=b", 2);

        assert_eq!(ready_generation(Some("https://www.youtube.com/watch?v=a"), Some(&latest)), None);
        assert_eq!(ready_generation(None, Some(&latest)), None);
        assert_eq!(ready_generation(Some("https://www.youtube.com/watch?v=a"), None), None);
    }
}
