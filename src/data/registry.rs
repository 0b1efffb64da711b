//! Startup-loaded data cache for the server and play mode. Load once, pass
//! via Arc; the catalog and its derived indices are immutable afterwards, so
//! guess evaluation never rescans the station list.

use std::path::Path;
use std::sync::Arc;

use crate::data::catalog::StationCatalog;
use crate::data::station::{self, RawStationRecord, DEFAULT_STATIONS_PATH};
use crate::game::index::GuessIndex;
use crate::game::lines::{group_by_line, LineGroup};

/// Read-only bundle of the catalog and everything derived from it.
#[derive(Debug)]
pub struct DataRegistry {
    catalog: StationCatalog,
    guess_index: GuessIndex,
    line_groups: Vec<LineGroup>,
    data_version: Option<String>,
}

impl DataRegistry {
    /// Load the dataset from the default path, or `MRT_RECALL_DATA` when
    /// set. A missing or unreadable dataset yields an empty registry rather
    /// than an error; the game degrades to a "no stations available" state.
    pub fn load() -> Arc<DataRegistry> {
        let path =
            std::env::var("MRT_RECALL_DATA").unwrap_or_else(|_| DEFAULT_STATIONS_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Arc<DataRegistry> {
        match station::load_station_dataset(path) {
            Some(dataset) => Self::from_records(&dataset.stations, dataset.data_version),
            None => Self::from_records(&[], None),
        }
    }

    /// Build a registry directly from raw records. Used by the loaders above
    /// and by tests that construct catalogs inline.
    pub fn from_records(
        records: &[RawStationRecord],
        data_version: Option<String>,
    ) -> Arc<DataRegistry> {
        let catalog = StationCatalog::build(records);
        let guess_index = GuessIndex::build(&catalog);
        let line_groups = group_by_line(&catalog);
        Arc::new(DataRegistry {
            catalog,
            guess_index,
            line_groups,
            data_version,
        })
    }

    pub fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    pub fn guess_index(&self) -> &GuessIndex {
        &self.guess_index
    }

    /// Line groups in canonical presentation order, cached at load time.
    pub fn line_groups(&self) -> &[LineGroup] {
        &self.line_groups
    }

    pub fn data_version(&self) -> Option<&str> {
        self.data_version.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}
