//! Peak-force categorization of sensor log files.
//!
//! This crate provides tools for:
//! - Loading a fixed row window of semicolon-delimited force logs
//! - Reducing each log to its peak force and classifying it by configured ranges
//! - Processing whole directories without stopping on unreadable files
//! - Exporting the results as a timestamped spreadsheet
//!
//! # Example
//!
//! ```no_run
//! use force_categorizer::{process_directory, BatchOptions, ProcessorConfig};
//! use std::path::Path;
//!
//! let config = ProcessorConfig::from_yaml("config.yaml").unwrap();
//! let outcome =
//!     process_directory(Path::new("data/"), &config, &BatchOptions::default(), |_, _| {}).unwrap();
//! println!("{} parts, {} failures", outcome.results.len(), outcome.failures.len());
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;

pub use config::{CategoryRange, ConfigError, PathsConfig, ProcessorConfig, RowWindow};
pub use crate::core::loaders::{PartIdPattern, PartReading};
pub use processors::{process_directory, BatchOptions, BatchOutcome, ClassifiedReading};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
