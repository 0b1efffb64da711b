//! Station data: raw per-code records (one per service code, field names
//! matching the upstream station-names dataset) and the canonical station
//! entity used by the game engine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One raw record per service code. Interchanges appear as multiple records
/// sharing `mrt_station_english`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStationRecord {
    pub stn_code: String,
    pub mrt_station_english: String,
    pub mrt_station_pinyin: String,
    pub mrt_station_chinese: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

impl RawStationRecord {
    /// Abbreviation with blanks treated as absent. Records without one never
    /// enter the abbreviation guess map.
    pub fn abbreviation(&self) -> Option<&str> {
        match self.abbreviation.as_deref() {
            Some(abbr) if !abbr.trim().is_empty() => Some(abbr),
            _ => None,
        }
    }
}

/// Canonical station entity. `id` is the record's primary code and stays the
/// display/ownership key for one code-line-segment; `english_name` is the
/// durable identity used for found-tracking and win counting. `codes` holds
/// every primary code sharing the English name, in first-seen order, so
/// `codes.len() > 1` means an interchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub english_name: String,
    pub pinyin_name: String,
    pub chinese_name: String,
    pub codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

impl Station {
    pub fn is_interchange(&self) -> bool {
        self.codes.len() > 1
    }
}

/// Normalized dataset file written by the importer and loaded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationDataset {
    #[serde(default)]
    pub data_version: Option<String>,
    #[serde(default)]
    pub source_note: Option<String>,
    pub stations: Vec<RawStationRecord>,
}

pub const DEFAULT_STATIONS_PATH: &str = "data/stations.json";

/// Load the station dataset from disk. Returns None if the file is missing
/// or unparsable; callers degrade to an empty catalog rather than failing.
pub fn load_station_dataset(path: impl AsRef<Path>) -> Option<StationDataset> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}
