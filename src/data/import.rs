//! Import the upstream station-names CSV into the normalized stations.json
//! dataset. Reports what was written, what was skipped and which codes were
//! duplicated so bad source rows are visible instead of silently folded.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::station::{RawStationRecord, StationDataset};

pub const DEFAULT_IMPORT_OUTPUT_PATH: &str = "data/stations.json";

#[derive(Debug)]
pub enum ImportError {
    Read(std::io::Error),
    Parse(csv::Error),
    Write(std::io::Error),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read station CSV: {err}"),
            Self::Parse(err) => write!(f, "failed to parse station CSV: {err}"),
            Self::Write(err) => write!(f, "failed to persist station dataset: {err}"),
        }
    }
}

impl std::error::Error for ImportError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub source_path: String,
    pub output_path: String,
    pub total_rows: usize,
    pub records_written: usize,
    pub skipped_blank: usize,
    pub duplicate_codes: Vec<String>,
}

impl ImportReport {
    pub fn has_issues(&self) -> bool {
        self.skipped_blank > 0 || !self.duplicate_codes.is_empty()
    }
}

/// One CSV row. Header aliases cover the variants seen in published copies
/// of the dataset.
#[derive(Debug, Clone, Deserialize)]
struct CsvRow {
    #[serde(alias = "STN_CODE", alias = "station_code")]
    stn_code: String,
    #[serde(alias = "mrt_station_english_name")]
    mrt_station_english: String,
    #[serde(default)]
    mrt_station_pinyin: String,
    #[serde(default)]
    mrt_station_chinese: String,
    #[serde(default, alias = "stn_abbreviation")]
    abbreviation: Option<String>,
}

/// Convert the CSV at `source_path` into the normalized dataset file at
/// `output_path`. Rows with a blank code or English name are skipped; later
/// rows repeating an already-seen code are dropped and reported.
pub fn import_station_csv(source_path: &str, output_path: &str) -> Result<ImportReport, ImportError> {
    let file = fs::File::open(source_path).map_err(ImportError::Read)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut seen_codes: HashSet<String> = HashSet::new();
    let mut stations: Vec<RawStationRecord> = Vec::new();
    let mut total_rows = 0;
    let mut skipped_blank = 0;
    let mut duplicate_codes = Vec::new();

    for row in reader.deserialize::<CsvRow>() {
        let row = row.map_err(ImportError::Parse)?;
        total_rows += 1;

        let code = row.stn_code.trim().to_string();
        let english = row.mrt_station_english.trim().to_string();
        if code.is_empty() || english.is_empty() {
            skipped_blank += 1;
            continue;
        }
        if !seen_codes.insert(code.clone()) {
            duplicate_codes.push(code);
            continue;
        }

        let abbreviation = row
            .abbreviation
            .as_deref()
            .map(str::trim)
            .filter(|abbr| !abbr.is_empty())
            .map(str::to_string);

        stations.push(RawStationRecord {
            stn_code: code,
            mrt_station_english: english,
            mrt_station_pinyin: row.mrt_station_pinyin.trim().to_string(),
            mrt_station_chinese: row.mrt_station_chinese.trim().to_string(),
            abbreviation,
        });
    }

    let records_written = stations.len();
    let dataset = StationDataset {
        data_version: Some(chrono::Utc::now().to_rfc3339()),
        source_note: Some(format!("imported from {source_path}")),
        stations,
    };

    if let Some(parent) = Path::new(output_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(ImportError::Write)?;
        }
    }
    let payload = serde_json::to_string_pretty(&dataset)
        .map_err(|err| ImportError::Write(std::io::Error::other(err)))?;
    fs::write(output_path, payload).map_err(ImportError::Write)?;

    Ok(ImportReport {
        source_path: source_path.to_string(),
        output_path: output_path.to_string(),
        total_rows,
        records_written,
        skipped_blank,
        duplicate_codes,
    })
}
