//! Loader for semicolon-delimited force logs.
//!
//! A log file has no header and four positional columns:
//! time, auxiliary field, force reading (decimal comma), auxiliary field.
//! Only a fixed window of rows is inspected and reduced to its peak force.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use regex::Regex;
use thiserror::Error;

use crate::config::RowWindow;

/// Position of the force reading within a row.
const FORCE_COLUMN: usize = 2;

/// Number of positional columns in a log row.
const COLUMN_COUNT: usize = 4;

/// Errors that can occur while reading a single log file.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parsing error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no part identifier matching '{pattern}' in '{path}'")]
    PathPatternMismatch { path: PathBuf, pattern: String },

    #[error("ambiguous part identifier in '{path}': {matches:?}")]
    AmbiguousPartId { path: PathBuf, matches: Vec<String> },

    #[error("invalid force value {value:?} at row {row} of '{path}'")]
    NumericCoercion {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("no complete rows within the row window of '{path}'")]
    EmptyWindow { path: PathBuf },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Regex locating the part identifier inside a file path.
#[derive(Debug, Clone)]
pub struct PartIdPattern {
    regex: Regex,
}

impl PartIdPattern {
    /// Letter prefix followed by exactly six digits.
    pub const DEFAULT: &'static str = r"EBE\d{6}";

    pub fn new(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Source text of the pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Extract the part identifier from the full path string.
    ///
    /// The same identifier may appear several times (e.g. in a directory
    /// and the file name); two different identifiers are an error.
    pub fn extract(&self, path: &Path) -> Result<String> {
        let text = path.to_string_lossy();
        let mut matches: Vec<String> = Vec::new();
        for m in self.regex.find_iter(&text) {
            if !matches.iter().any(|existing| existing == m.as_str()) {
                matches.push(m.as_str().to_string());
            }
        }

        match matches.len() {
            0 => Err(LoaderError::PathPatternMismatch {
                path: path.to_path_buf(),
                pattern: self.as_str().to_string(),
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(LoaderError::AmbiguousPartId {
                path: path.to_path_buf(),
                matches,
            }),
        }
    }
}

impl Default for PartIdPattern {
    fn default() -> Self {
        Self::new(Self::DEFAULT).expect("default part pattern is a valid regex")
    }
}

/// Peak force found in one log file.
#[derive(Debug, Clone, PartialEq)]
pub struct PartReading {
    /// Part identifier taken from the file path.
    pub part_id: String,
    /// Maximum force within the row window, in kN.
    pub peak_force: f64,
    /// Zero-based row within the window where the peak occurs.
    pub peak_row: usize,
}

/// Convert a decimal-comma reading such as `"0,4213"` to `f64`.
///
/// Returns `None` for text that is not a finite number.
pub fn parse_decimal_comma(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Load the row window of a force log and reduce it to its peak.
///
/// Rows with fewer than four fields or any empty field are dropped before
/// the reduction. On ties the first row wins.
///
/// # Errors
///
/// Returns an error if the path carries no part identifier, the file cannot
/// be read, a force value is not numeric, or no complete row remains.
pub fn load_peak_reading<P: AsRef<Path>>(
    path: P,
    window: &RowWindow,
    pattern: &PartIdPattern,
) -> Result<PartReading> {
    let path = path.as_ref();
    let part_id = pattern.extract(path)?;

    let file = File::open(path).map_err(|e| LoaderError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut peak: Option<(usize, f64)> = None;

    let window_end = window.startrow.saturating_add(window.rowcount);

    for (index, result) in reader.records().enumerate().take(window_end) {
        // Read errors in skipped rows still fail the file
        let record = result.map_err(|e| LoaderError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        if index < window.startrow {
            continue;
        }
        let row = index - window.startrow;

        let complete = record.len() >= COLUMN_COUNT
            && record.iter().take(COLUMN_COUNT).all(|f| !f.trim().is_empty());
        if !complete {
            continue;
        }

        let raw = &record[FORCE_COLUMN];
        let value = parse_decimal_comma(raw).ok_or_else(|| LoaderError::NumericCoercion {
            path: path.to_path_buf(),
            row: index,
            value: raw.to_string(),
        })?;

        if peak.map_or(true, |(_, best)| value > best) {
            peak = Some((row, value));
        }
    }

    let (peak_row, peak_force) = peak.ok_or_else(|| LoaderError::EmptyWindow {
        path: path.to_path_buf(),
    })?;

    Ok(PartReading {
        part_id,
        peak_force,
        peak_row,
    })
}
