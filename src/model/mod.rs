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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application, the playable
//! tracks that make up the playlist and the ranked chart entries used to
//! discover new tracks, along with the shared playback store.

pub(crate) mod store;

use serde::{Deserialize, Serialize};

/// A playable media item with display metadata.
///
/// The field names on the wire follow the static catalog file, so a track
/// read from the catalog can be written back out unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Track {
    pub(crate) id: String,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) artist: String,
    #[serde(rename = "imageURL", default)]
    pub(crate) image_url: String,
    #[serde(rename = "videoID")]
    pub(crate) video_id: String,
}

impl Track {
    /// The URL handed to the media widget for this track.
    pub(crate) fn media_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// One ranked row of a dated chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ChartEntry {
    pub(crate) rank: u32,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) album: String,
    #[serde(rename = "imageURL", default)]
    pub(crate) image_url: String,
}
