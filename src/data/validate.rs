//! Dataset validation: structural and answerability checks over a normalized
//! stations.json file, reported as severity-tagged diagnostics.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::data::station::{self, RawStationRecord};
use crate::game::index::{normalize_chinese, normalize_latin};
use crate::game::lines::line_code;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }
}

/// Validate the dataset at `path`. An unreadable or unparsable file is a
/// hard error here (unlike the game loader, which degrades to empty): the
/// validator exists to make broken data visible.
pub fn validate_station_dataset(path: &str) -> Result<ValidationReport, String> {
    let dataset = station::load_station_dataset(path)
        .ok_or_else(|| format!("unable to read or parse station dataset '{path}'"))?;
    Ok(validate_records(&dataset.stations))
}

pub fn validate_records(records: &[RawStationRecord]) -> ValidationReport {
    let mut report = ValidationReport::default();

    if records.is_empty() {
        report.push(
            ValidationSeverity::Warning,
            "dataset",
            "dataset contains no station records; the game will run disabled",
        );
        return report;
    }

    let mut seen_codes: HashSet<&str> = HashSet::new();
    let all_codes: HashSet<&str> = records.iter().map(|r| r.stn_code.as_str()).collect();

    for record in records {
        let context = if record.stn_code.is_empty() {
            "<blank code>".to_string()
        } else {
            record.stn_code.clone()
        };

        if record.stn_code.trim().is_empty() {
            report.push(ValidationSeverity::Error, context.clone(), "blank station code");
        } else if !seen_codes.insert(record.stn_code.as_str()) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                "duplicate station code; later record is dropped by the catalog fold",
            );
        }

        let prefix = line_code(&record.stn_code);
        let suffix = &record.stn_code[prefix.len()..];
        if prefix.is_empty() {
            report.push(
                ValidationSeverity::Warning,
                context.clone(),
                "code has no leading line letters; station cannot be grouped",
            );
        }
        if suffix.parse::<u32>().is_err() {
            report.push(
                ValidationSeverity::Warning,
                context.clone(),
                "code has no numeric suffix; station sorts first within its line",
            );
        }

        if record.mrt_station_english.trim().is_empty() {
            report.push(ValidationSeverity::Error, context.clone(), "blank English name");
        }
        if record.mrt_station_pinyin.trim().is_empty() {
            report.push(ValidationSeverity::Warning, context.clone(), "blank Pinyin name");
        }
        if record.mrt_station_chinese.trim().is_empty() {
            report.push(ValidationSeverity::Warning, context.clone(), "blank Chinese name");
        }

        if let Some(abbr) = record.abbreviation() {
            if abbr.len() != 3 || !abbr.chars().all(|ch| ch.is_ascii_alphabetic()) {
                report.push(
                    ValidationSeverity::Warning,
                    context.clone(),
                    format!("abbreviation '{abbr}' is not three letters"),
                );
            }
        }

        if all_codes.contains(record.mrt_station_english.as_str()) {
            report.push(
                ValidationSeverity::Warning,
                context.clone(),
                "English name collides with a station code",
            );
        }
    }

    check_normalization_collisions(records, &mut report);
    report
}

/// Two records with different English names but identical normalized answer
/// keys make one of the stations unreachable in that language. Interchange
/// records sharing an English name are expected to collide and are skipped.
fn check_normalization_collisions(records: &[RawStationRecord], report: &mut ValidationReport) {
    let checks: [(&str, fn(&RawStationRecord) -> String); 3] = [
        ("english", |r| normalize_latin(&r.mrt_station_english)),
        ("pinyin", |r| normalize_latin(&r.mrt_station_pinyin)),
        ("chinese", |r| normalize_chinese(&r.mrt_station_chinese)),
    ];

    for (language, key_fn) in checks {
        let mut first_by_key: HashMap<String, &RawStationRecord> = HashMap::new();
        for record in records {
            let key = key_fn(record);
            if key.is_empty() {
                continue;
            }
            match first_by_key.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(slot) => {
                    let first = slot.get();
                    if first.mrt_station_english != record.mrt_station_english {
                        report.push(
                            ValidationSeverity::Warning,
                            record.stn_code.clone(),
                            format!(
                                "{language} answer collides with '{}' after normalization; this station is unreachable in {language}",
                                first.stn_code
                            ),
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, english: &str, pinyin: &str, chinese: &str) -> RawStationRecord {
        RawStationRecord {
            stn_code: code.to_string(),
            mrt_station_english: english.to_string(),
            mrt_station_pinyin: pinyin.to_string(),
            mrt_station_chinese: chinese.to_string(),
            abbreviation: None,
        }
    }

    #[test]
    fn duplicate_codes_are_errors() {
        let records = vec![
            record("NS1", "Jurong East", "yuldong", "裕廊东"),
            record("NS1", "Jurong East", "yuldong", "裕廊东"),
        ];
        let report = validate_records(&records);
        assert!(report.has_errors());
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.message.contains("duplicate station code")));
    }

    #[test]
    fn interchange_name_sharing_is_not_a_collision() {
        let records = vec![
            record("NS1", "Jurong East", "yulangdong", "裕廊东"),
            record("EW24", "Jurong East", "yulangdong", "裕廊东"),
        ];
        let report = validate_records(&records);
        assert!(!report
            .diagnostics
            .iter()
            .any(|d| d.message.contains("collides with") && d.message.contains("normalization")));
    }

    #[test]
    fn cross_station_normalization_collision_is_flagged() {
        let records = vec![
            record("NS1", "China Town", "a", "甲"),
            record("NE4", "Chinatown", "b", "乙"),
        ];
        let report = validate_records(&records);
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.message.contains("unreachable in english")));
    }
}
