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

//! Static track catalog.
//!
//! The catalog is a JSON array of track records, fetched once at startup to
//! seed the playlist. There is no paging and no schema versioning.

use tracing::debug;

use crate::{error::SourceError, model::Track, sources::read_location};

/// Loads the catalog from a URL or file path.
pub(crate) fn load_catalog(location: &str) -> Result<Vec<Track>, SourceError> {
    debug!(location, "loading catalog");
    let text = read_location(location)?;
    parse_catalog(&text)
}

pub(crate) fn parse_catalog(text: &str) -> Result<Vec<Track>, SourceError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{ "id": "1", "title": "OMG", "artist": "NewJeans", "imageURL": "", "videoID": "sVTy_wmn5SU" }},
                {{ "id": "2", "title": "Seven", "artist": "Jung Kook", "videoID": "QU9c0053UAU" }}
            ]"#
        )
        .unwrap();

        let tracks = load_catalog(file.path().to_str().unwrap()).unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].video_id, "QU9c0053UAU");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("music_list.json");

        let err = load_catalog(path.to_str().unwrap()).unwrap_err();

        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn malformed_catalog_is_a_parse_error() {
        let err = parse_catalog(r#"{ "not": "an array" }"#).unwrap_err();

        assert!(matches!(err, SourceError::Parse(_)));
    }
}
