pub mod catalog;
pub mod import;
pub mod registry;
pub mod station;
pub mod validate;

pub use catalog::StationCatalog;
pub use import::{import_station_csv, ImportError, ImportReport, DEFAULT_IMPORT_OUTPUT_PATH};
pub use registry::DataRegistry;
pub use station::{
    load_station_dataset, RawStationRecord, Station, StationDataset, DEFAULT_STATIONS_PATH,
};
pub use validate::{
    validate_records, validate_station_dataset, ValidationDiagnostic, ValidationReport,
    ValidationSeverity,
};
