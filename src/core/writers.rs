//! Export of classified readings.
//!
//! Results are written as one table with the columns `part`, `kN` and
//! `category`, either as an Excel workbook (default) or as CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use clap::ValueEnum;
use log::info;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use crate::processors::classify::ClassifiedReading;

/// Column headers of the exported table.
pub const COLUMNS: [&str; 3] = ["part", "kN", "category"];

/// Name of the single worksheet in exported workbooks.
pub const SHEET_NAME: &str = "categorized_parts";

/// Timestamp prefix of exported file names, e.g. `240131_0915`.
const TIMESTAMP_FORMAT: &str = "%y%m%d_%H%M";

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to flush data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV writing error.
    #[error("CSV write error for '{path}': {source}")]
    CsvError {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Workbook writing error.
    #[error("workbook write error for '{path}': {source}")]
    Xlsx {
        path: String,
        #[source]
        source: XlsxError,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

/// File name for an export made at `timestamp`, e.g. `240131_0915_categorized_parts.xlsx`.
pub fn export_file_name(timestamp: &NaiveDateTime, format: ExportFormat) -> String {
    format!(
        "{}_categorized_parts.{}",
        timestamp.format(TIMESTAMP_FORMAT),
        format.extension()
    )
}

/// Write the readings into `output_dir` and return the written path.
///
/// An empty slice still produces a file containing only the header row.
pub fn export_results(
    output_dir: &Path,
    rows: &[ClassifiedReading],
    format: ExportFormat,
    timestamp: &NaiveDateTime,
) -> Result<PathBuf> {
    let path = output_dir.join(export_file_name(timestamp, format));
    match format {
        ExportFormat::Xlsx => write_results_xlsx(&path, rows)?,
        ExportFormat::Csv => write_results_csv(&path, rows)?,
    }
    info!("wrote {} rows to {}", rows.len(), path.display());
    Ok(path)
}

/// Write readings to an Excel workbook with a bold header row.
pub fn write_results_xlsx(path: &Path, rows: &[ClassifiedReading]) -> Result<()> {
    let path_str = path.display().to_string();
    let xlsx_err = |e: XlsxError| WriteError::Xlsx {
        path: path_str.clone(),
        source: e,
    };

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(xlsx_err)?;

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *name, &header)
            .map_err(xlsx_err)?;
    }

    for (idx, reading) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        worksheet
            .write_string(row, 0, reading.part_id.as_str())
            .map_err(xlsx_err)?;
        worksheet
            .write_number(row, 1, reading.peak_force)
            .map_err(xlsx_err)?;
        worksheet
            .write_string(row, 2, reading.category.as_str())
            .map_err(xlsx_err)?;
    }

    workbook.save(path).map_err(xlsx_err)?;
    Ok(())
}

/// Write readings to CSV with a header row.
pub fn write_results_csv(path: &Path, rows: &[ClassifiedReading]) -> Result<()> {
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut csv_writer = csv::Writer::from_writer(BufWriter::new(file));

    let path_str = path.display().to_string();

    csv_writer
        .write_record(COLUMNS)
        .map_err(|e| WriteError::CsvError {
            path: path_str.clone(),
            source: e,
        })?;

    for reading in rows {
        csv_writer
            .write_record(&[
                reading.part_id.clone(),
                reading.peak_force.to_string(),
                reading.category.clone(),
            ])
            .map_err(|e| WriteError::CsvError {
                path: path_str.clone(),
                source: e,
            })?;
    }

    csv_writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str,
        source: e,
    })?;

    Ok(())
}
