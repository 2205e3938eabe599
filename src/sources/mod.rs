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

//! External data sources.
//!
//! Everything in here is blocking and is only ever called from the background
//! command worker, never from the UI thread.
//!
//! # Sub-modules
//!
//! * [`catalog`]: The static track list used to seed the playlist.
//! * [`chart`]: Dated chart files.
//! * [`lookup`]: Free-text video search.

pub(crate) mod catalog;
pub(crate) mod chart;
pub(crate) mod lookup;

use std::fs;

use crate::error::SourceError;

/// Reads a text resource that is either an `http(s)` URL or a local path.
pub(crate) fn read_location(location: &str) -> Result<String, SourceError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let text = ureq::get(location).call()?.body_mut().read_to_string()?;
        Ok(text)
    } else {
        fs::read_to_string(location).map_err(|source| SourceError::Io {
            path: location.to_string(),
            source,
        })
    }
}
