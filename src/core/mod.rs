//! Core data types and I/O operations.

pub mod loaders;
pub mod writers;

pub use loaders::{load_peak_reading, LoaderError, PartIdPattern, PartReading};
pub use writers::{export_results, write_results_csv, write_results_xlsx, ExportFormat, WriteError};
