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

//! Dated chart files.
//!
//! Each chart lives in its own file named after the date it covers, e.g.
//! `charts/2024-03-01.json`, holding a JSON array of ranked entries.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use tracing::debug;

use crate::{error::SourceError, model::ChartEntry};

pub(crate) fn chart_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.json", date.format("%Y-%m-%d")))
}

/// Loads the chart for a date, ordered by rank.
///
/// A date with no chart file yields an empty chart rather than an error.
pub(crate) fn load_chart(dir: &Path, date: NaiveDate) -> Result<Vec<ChartEntry>, SourceError> {
    let path = chart_path(dir, date);
    debug!(path = %path.display(), "loading chart");

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
        Err(source) => {
            return Err(SourceError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };

    let mut entries: Vec<ChartEntry> = serde_json::from_str(&text)?;
    entries.sort_by_key(|e| e.rank);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn chart_file_is_named_after_date() {
        let path = chart_path(Path::new("charts"), date("2024-03-01"));

        assert_eq!(path, PathBuf::from("charts/2024-03-01.json"));
    }

    #[test]
    fn loads_entries_sorted_by_rank() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            chart_path(dir.path(), date("2024-03-01")),
            r#"[
                { "rank": 2, "title": "Drama", "album": "Drama" },
                { "rank": 1, "title": "Love wins all", "album": "Love wins all" }
            ]"#,
        )
        .unwrap();

        let entries = load_chart(dir.path(), date("2024-03-01")).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Love wins all");
    }

    #[test]
    fn missing_chart_is_empty() {
        let dir = tempfile::tempdir().unwrap();

        let entries = load_chart(dir.path(), date("1999-01-01")).unwrap();

        assert!(entries.is_empty());
    }
}
