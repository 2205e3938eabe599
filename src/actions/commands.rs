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

//! Asynchronous application command processing.
//!
//! This module implements the command pattern used to offload potentially
//! blocking source access (file reads and HTTP requests) from the main UI
//! thread. It provides a dedicated worker loop that translates
//! [`AppCommand`] requests into source calls and broadcasts the results back
//! to the application via [`AppEvent`]s.
//!
//! Commands are handled in the order they are sent. Source failures are not
//! errors here, they travel back inside the result events so the UI can
//! degrade gracefully.

use anyhow::Result;
use chrono::NaiveDate;
use std::{
    path::PathBuf,
    sync::mpsc::{Receiver, Sender},
    thread,
};
use tracing::{debug, info};

use crate::{
    actions::events::AppEvent,
    config::AppConfig,
    sources::{catalog, chart, lookup::VideoLookup},
};

#[derive(Debug)]
pub(crate) enum AppCommand {
    /// Fetch the track catalog that seeds the playlist.
    LoadCatalog,
    LoadChart(NaiveDate),
    Lookup { query: String, seq: u64 },
}

/// Everything the worker needs, moved onto its thread.
struct Sources {
    catalog_location: String,
    chart_dir: PathBuf,
    lookup: Box<dyn VideoLookup>,
}

/// Spawns a background thread to process application commands.
///
/// The worker enters a blocking loop, listening for incoming
/// [`AppCommand`]s until the sending side is dropped.
///
/// # Arguments
///
/// * `config` - The application configuration.
/// * `lookup` - The video lookup used for [`AppCommand::Lookup`].
/// * `command_rx` - The receiving end of the command channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_command_worker(
    config: &AppConfig,
    lookup: Box<dyn VideoLookup>,
    command_rx: Receiver<AppCommand>,
    event_tx: Sender<AppEvent>,
) {
    let sources = Sources {
        catalog_location: config.catalog_location.clone(),
        chart_dir: PathBuf::from(&config.chart_dir),
        lookup,
    };

    thread::spawn(move || {
        while let Ok(request) = command_rx.recv() {
            if let Err(e) = handle_command(&sources, request, &event_tx) {
                debug!(error = %e, "command worker stopping");
                break;
            }
        }
    });
}

/// Orchestrates the execution of a single command.
///
/// This function implements the logic for each command and sends the result
/// back through the application event channel. The only error is a closed
/// event channel.
fn handle_command(sources: &Sources, command: AppCommand, event_tx: &Sender<AppEvent>) -> Result<()> {
    match command {
        AppCommand::LoadCatalog => {
            info!(location = %sources.catalog_location, "loading catalog");
            let result = catalog::load_catalog(&sources.catalog_location);
            event_tx.send(AppEvent::CatalogLoaded(result))?;
        }
        AppCommand::LoadChart(date) => {
            let result = chart::load_chart(&sources.chart_dir, date);
            event_tx.send(AppEvent::ChartLoaded(date, result))?;
        }
        AppCommand::Lookup { query, seq } => {
            let result = sources.lookup.lookup(&query);
            event_tx.send(AppEvent::LookupFinished { seq, result })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::mpsc, time::Duration};

    use super::*;
    use crate::{error::SourceError, model::Track, model::store::tests::track};

    struct FixedLookup;

    impl VideoLookup for FixedLookup {
        fn lookup(&self, query: &str) -> Result<Vec<Track>, SourceError> {
            Ok(vec![track(query)])
        }
    }

    fn sources(dir: &std::path::Path) -> Sources {
        Sources {
            catalog_location: dir.join("missing.json").to_string_lossy().into_owned(),
            chart_dir: dir.to_path_buf(),
            lookup: Box::new(FixedLookup),
        }
    }

    #[test]
    fn lookup_result_carries_sequence_number() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel();

        handle_command(&sources(dir.path()), AppCommand::Lookup { query: "q".to_string(), seq: 7 }, &tx).unwrap();

        match rx.try_recv() {
            Ok(AppEvent::LookupFinished { seq, result }) => {
                assert_eq!(seq, 7);
                assert_eq!(result.unwrap()[0].id, "q");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn missing_catalog_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel();

        handle_command(&sources(dir.path()), AppCommand::LoadCatalog, &tx).unwrap();

        assert!(matches!(rx.try_recv(), Ok(AppEvent::CatalogLoaded(Err(_)))));
    }

    #[test]
    fn worker_answers_chart_requests() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        fs::write(
            chart::chart_path(dir.path(), date),
            r#"[{"rank": 1, "title": "Magnetic", "album": "SUPER REAL ME"}]"#,
        )
        .unwrap();

        let config = AppConfig {
            chart_dir: dir.path().to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        spawn_command_worker(&config, Box::new(FixedLookup), command_rx, event_tx);

        command_tx.send(AppCommand::LoadChart(date)).unwrap();

        match event_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(AppEvent::ChartLoaded(d, Ok(entries))) => {
                assert_eq!(d, date);
                assert_eq!(entries[0].title, "Magnetic");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
