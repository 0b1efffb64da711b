//! Rail line metadata and the per-line display grouping. Pure derivation of
//! the catalog; holds no session state and can be recomputed at any time.

use serde::Serialize;

use crate::data::catalog::StationCatalog;
use crate::data::station::Station;

/// Fixed presentation order: the heavy-rail lines in their conventional
/// sequence, then the LRT loops. Lines with zero stations are omitted from
/// the grouped output.
pub const LINE_ORDER: &[&str] = &["EW", "CG", "NS", "NE", "CC", "TE", "DT", "BP", "SK", "PG"];

pub fn line_name(code: &str) -> &'static str {
    match code {
        "EW" => "East West Line",
        "NS" => "North South Line",
        "DT" => "Downtown Line",
        "CC" => "Circle Line",
        "NE" => "North East Line",
        "TE" => "Thomson-East Coast Line",
        "BP" => "Bukit Panjang LRT",
        "SK" => "Sengkang LRT",
        "PG" => "Punggol LRT",
        "CG" => "Changi Airport Branch Line",
        _ => "Unknown Line",
    }
}

/// Display color for a line's station code pill.
pub fn line_color(code: &str) -> &'static str {
    match code {
        "EW" | "CG" => "#009645",
        "NS" => "#DA291C",
        "DT" => "#005ec4",
        "CC" | "CE" => "#fa9e0d",
        "NE" => "#9900aa",
        "TE" => "#9D5B25",
        _ => "#778899",
    }
}

/// Leading run of ASCII uppercase letters of a station code ("NS1" -> "NS").
pub fn line_code(station_code: &str) -> &str {
    let end = station_code
        .find(|ch: char| !ch.is_ascii_uppercase())
        .unwrap_or(station_code.len());
    &station_code[..end]
}

/// Numeric suffix of a station code, used for in-line ordering. Codes without
/// a numeric suffix sort first; the dataset validator flags them.
pub fn code_number(station_code: &str) -> u32 {
    let suffix = &station_code[line_code(station_code).len()..];
    suffix.parse().unwrap_or(0)
}

/// One rail line and its stations in travel order.
#[derive(Debug, Clone, Serialize)]
pub struct LineGroup {
    pub line_code: String,
    pub line_name: String,
    pub line_color: String,
    pub stations: Vec<Station>,
}

/// Partition catalog stations by line and order them for display. The CE
/// branch is grouped under the Circle Line, though its stations keep their
/// own codes for guessing and pill display.
pub fn group_by_line(catalog: &StationCatalog) -> Vec<LineGroup> {
    LINE_ORDER
        .iter()
        .filter_map(|&line| {
            let mut stations: Vec<Station> = catalog
                .stations()
                .iter()
                .filter(|station| {
                    let mut code = line_code(&station.id);
                    if code == "CE" {
                        code = "CC";
                    }
                    code == line
                })
                .cloned()
                .collect();
            if stations.is_empty() {
                return None;
            }
            stations.sort_by_key(|station| code_number(&station.id));
            Some(LineGroup {
                line_code: line.to_string(),
                line_name: line_name(line).to_string(),
                line_color: line_color(line).to_string(),
                stations,
            })
        })
        .collect()
}
