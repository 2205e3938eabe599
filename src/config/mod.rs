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

//! Application configuration.
//!
//! This module manages the application configuration file. Missing fields
//! take their default values, and an unreadable file falls back to the
//! defaults entirely.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "chartplay";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,

    /// Heading shown above the chart entries.
    pub chart_title: String,

    /// Path or `http(s)` URL of the JSON track catalog.
    pub catalog_location: String,
    pub chart_dir: String,
    pub chart_min_date: NaiveDate,
    /// Latest selectable chart date, today when unset.
    pub chart_max_date: Option<NaiveDate>,

    pub autoplay_on_load: bool,
    pub initial_volume: u8,

    pub lookup_api_key: Option<String>,
    pub lookup_max_results: u32,

    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            chart_title: "Music Chart".to_string(),
            catalog_location: "music-data/music_list.json".to_string(),
            chart_dir: "music-data/charts".to_string(),
            chart_min_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            chart_max_date: None,
            autoplay_on_load: true,
            initial_volume: 30,
            lookup_api_key: None,
            lookup_max_results: 10,
            log_file: "chartplay.log".to_string(),
        }
    }
}

impl AppConfig {
    /// The selectable chart date range, always ordered.
    pub fn chart_date_range(&self) -> (NaiveDate, NaiveDate) {
        let max = self.chart_max_date.unwrap_or_else(|| Local::now().date_naive());
        (self.chart_min_date.min(max), max)
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}
