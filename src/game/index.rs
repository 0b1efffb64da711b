//! Guess languages and the normalized lookup maps used to resolve typed
//! answers in O(1). Built once from the catalog; a lookup miss is a normal
//! outcome, not an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::catalog::StationCatalog;
use crate::data::station::Station;

/// Which normalized index a typed answer is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuessLanguage {
    English,
    Pinyin,
    Chinese,
    Abbreviation,
}

impl GuessLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Pinyin => "pinyin",
            Self::Chinese => "chinese",
            Self::Abbreviation => "abbreviation",
        }
    }

    pub fn parse(value: &str) -> Option<GuessLanguage> {
        match value.trim().to_ascii_lowercase().as_str() {
            "english" => Some(Self::English),
            "pinyin" => Some(Self::Pinyin),
            "chinese" => Some(Self::Chinese),
            "abbreviation" => Some(Self::Abbreviation),
            _ => None,
        }
    }

    /// Normalize raw input with this language's rule.
    pub fn normalize(&self, raw: &str) -> String {
        match self {
            Self::Chinese => normalize_chinese(raw),
            _ => normalize_latin(raw),
        }
    }
}

/// Latin-script equivalence: lowercase, then keep ASCII alphanumerics only.
/// Whitespace, punctuation, underscores, apostrophes and hyphens are all
/// insignificant, so "Chinatown", "China-town" and "CHINA TOWN" collide.
/// Idempotent by construction.
pub fn normalize_latin(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Chinese-script equivalence: strip whitespace only. Case and punctuation
/// folding do not apply to ideographs.
pub fn normalize_chinese(value: &str) -> String {
    value.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// Four normalized-text -> station maps, one per guess language. First write
/// wins: an interchange's records normalize to the same name and must not
/// overwrite the canonical entry.
#[derive(Debug, Clone, Default)]
pub struct GuessIndex {
    english: HashMap<String, Station>,
    pinyin: HashMap<String, Station>,
    chinese: HashMap<String, Station>,
    abbreviation: HashMap<String, Station>,
}

impl GuessIndex {
    pub fn build(catalog: &StationCatalog) -> GuessIndex {
        let mut index = GuessIndex::default();
        for station in catalog.stations() {
            index
                .english
                .entry(normalize_latin(&station.english_name))
                .or_insert_with(|| station.clone());
            index
                .pinyin
                .entry(normalize_latin(&station.pinyin_name))
                .or_insert_with(|| station.clone());
            index
                .chinese
                .entry(normalize_chinese(&station.chinese_name))
                .or_insert_with(|| station.clone());
            if let Some(abbr) = station.abbreviation.as_deref() {
                if !abbr.trim().is_empty() {
                    index
                        .abbreviation
                        .entry(normalize_latin(abbr))
                        .or_insert_with(|| station.clone());
                }
            }
        }
        index
    }

    /// Resolve a typed answer. None means no match in this language, which
    /// is the regular wrong-guess outcome.
    pub fn resolve(&self, language: GuessLanguage, raw_input: &str) -> Option<&Station> {
        let key = language.normalize(raw_input);
        if key.is_empty() {
            return None;
        }
        self.map_for(language).get(&key)
    }

    fn map_for(&self, language: GuessLanguage) -> &HashMap<String, Station> {
        match language {
            GuessLanguage::English => &self.english,
            GuessLanguage::Pinyin => &self.pinyin,
            GuessLanguage::Chinese => &self.chinese,
            GuessLanguage::Abbreviation => &self.abbreviation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_normalization_is_idempotent_and_punctuation_blind() {
        let once = normalize_latin("CHINA-TOWN");
        assert_eq!(once, "chinatown");
        assert_eq!(normalize_latin(&once), once);
        assert_eq!(normalize_latin("China  town"), normalize_latin("Chinatown"));
        assert_eq!(normalize_latin("one's_place"), "onesplace");
    }

    #[test]
    fn chinese_normalization_strips_whitespace_only() {
        assert_eq!(normalize_chinese("牛 车 水"), "牛车水");
        assert_eq!(normalize_chinese("牛车水"), "牛车水");
    }
}
