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

//! Free-text video lookup.
//!
//! Turns a chart title (or any query) into candidate playable tracks. The
//! [`YouTubeLookup`] implementation uses the YouTube Data API `search`
//! endpoint; a result either arrives whole or the call fails, there are no
//! partial results.

use serde::Deserialize;
use tracing::debug;

use crate::{config::AppConfig, error::SourceError, model::Track};

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";

const API_KEY_VAR: &str = "YOUTUBE_API_KEY";

pub(crate) trait VideoLookup: Send {
    fn lookup(&self, query: &str) -> Result<Vec<Track>, SourceError>;
}

pub(crate) struct YouTubeLookup {
    api_key: Option<String>,
    max_results: u32,
}

impl YouTubeLookup {
    /// Builds a lookup from configuration, falling back to the
    /// `YOUTUBE_API_KEY` environment variable for the key.
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        let api_key = config
            .lookup_api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_VAR).ok());

        Self {
            api_key,
            max_results: config.lookup_max_results,
        }
    }
}

impl VideoLookup for YouTubeLookup {
    fn lookup(&self, query: &str) -> Result<Vec<Track>, SourceError> {
        let api_key = self.api_key.as_deref().ok_or(SourceError::MissingApiKey)?;

        debug!(query, "video lookup");

        let body = ureq::get(SEARCH_ENDPOINT)
            .query("part", "snippet")
            .query("type", "video")
            .query("maxResults", self.max_results.to_string())
            .query("q", query)
            .query("key", api_key)
            .call()?
            .body_mut()
            .read_to_string()?;

        parse_search_response(&body)
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Deserialize, Default)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: String,
}

/// Maps a search response to tracks, skipping anything that is not a video.
pub(crate) fn parse_search_response(body: &str) -> Result<Vec<Track>, SourceError> {
    let response: SearchResponse = serde_json::from_str(body)?;

    let tracks = response
        .items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            Some(Track {
                id: video_id.clone(),
                title: decode_entities(&item.snippet.title),
                artist: decode_entities(&item.snippet.channel_title),
                image_url: item.snippet.thumbnails.default.map(|t| t.url).unwrap_or_default(),
                video_id,
            })
        })
        .collect();

    Ok(tracks)
}

/// Decodes the HTML escaping the API applies to titles.
///
/// Handles the named `&quot;`, `&apos;`, `&lt;`, `&gt;` and `&amp;`, and any
/// numeric `&#NNN;` or `&#xHH;` reference. Anything else is left as written.
/// Decoding is a single pass, so `&amp;lt;` becomes `&lt;`.
fn decode_entities(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        rest = &rest[start..];

        let entity = rest
            .find(';')
            .and_then(|end| decode_entity(&rest[1..end]).map(|c| (c, end)));

        match entity {
            Some((c, end)) => {
                decoded.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }

    decoded.push_str(rest);
    decoded
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "quot" => Some('"'),
        "apos" => Some('\''),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
