//! Catalog folding: collapse raw per-code records into canonical stations.
//! Pure over its input; built once at load time and treated as immutable for
//! the rest of a session.

use std::collections::{HashMap, HashSet};

use crate::data::station::{RawStationRecord, Station};

/// Ordered list of canonical stations, one per distinct `id`, plus the
/// distinct-name count used for the win condition.
#[derive(Debug, Clone, Default)]
pub struct StationCatalog {
    stations: Vec<Station>,
    total_distinct: usize,
}

impl StationCatalog {
    /// Fold raw records into canonical stations.
    ///
    /// 1. Group codes by English name, first-seen order, no duplicates.
    /// 2. Emit one station per record carrying the group's full code list,
    ///    so every record of an interchange sees all of its codes.
    /// 3. Deduplicate by `id`, keeping the first occurrence.
    pub fn build(records: &[RawStationRecord]) -> StationCatalog {
        let mut codes_by_name: HashMap<&str, Vec<String>> = HashMap::new();
        for record in records {
            let codes = codes_by_name
                .entry(record.mrt_station_english.as_str())
                .or_default();
            if !codes.iter().any(|code| code == &record.stn_code) {
                codes.push(record.stn_code.clone());
            }
        }

        let mut seen_ids: HashSet<&str> = HashSet::new();
        let mut stations = Vec::new();
        for record in records {
            if !seen_ids.insert(record.stn_code.as_str()) {
                continue;
            }
            let codes = codes_by_name
                .get(record.mrt_station_english.as_str())
                .cloned()
                .unwrap_or_else(|| vec![record.stn_code.clone()]);
            stations.push(Station {
                id: record.stn_code.clone(),
                english_name: record.mrt_station_english.clone(),
                pinyin_name: record.mrt_station_pinyin.clone(),
                chinese_name: record.mrt_station_chinese.clone(),
                codes,
                abbreviation: record.abbreviation().map(str::to_string),
            });
        }

        let total_distinct = codes_by_name.len();

        StationCatalog {
            stations,
            total_distinct,
        }
    }

    /// Canonical stations, one per distinct primary code, in first-seen order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Number of distinct English names. An interchange counts once no matter
    /// how many service codes it spans.
    pub fn total_distinct(&self) -> usize {
        self.total_distinct
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
