//! Batch processing of a directory of force logs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, warn};
use rayon::prelude::*;
use thiserror::Error;

use crate::config::ProcessorConfig;
use crate::core::loaders::{load_peak_reading, LoaderError};
use crate::processors::classify::ClassifiedReading;

/// Errors that abort the whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to list input directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How the batch is executed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Process files on the rayon pool; output order is unchanged.
    pub parallel: bool,
}

/// A file that could not be processed.
#[derive(Debug)]
pub struct FailedFile {
    pub file_name: String,
    pub error: LoaderError,
}

/// Collected results of one batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Classified readings in input order
    pub results: Vec<ClassifiedReading>,
    /// Files that failed, in input order
    pub failures: Vec<FailedFile>,
}

impl BatchOutcome {
    /// Number of files examined.
    pub fn total(&self) -> usize {
        self.results.len() + self.failures.len()
    }

    /// Names of the files that failed.
    pub fn failed_names(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.file_name.as_str()).collect()
    }
}

/// List every entry of `dir` (non-recursive), sorted by file name.
///
/// No extension filter is applied; entries that are not readable logs fail
/// later and end up in the failure list.
pub fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let entries = fs::read_dir(dir).map_err(|e| BatchError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Read one log file and classify its peak force.
pub fn process_file(path: &Path, config: &ProcessorConfig) -> Result<ClassifiedReading, LoaderError> {
    let reading = load_peak_reading(path, &config.window, &config.part_pattern)?;
    debug!(
        "{}: peak {} kN at window row {}",
        reading.part_id, reading.peak_force, reading.peak_row
    );
    Ok(ClassifiedReading::from_reading(reading, &config.categories))
}

/// Process every file in `input_dir`.
///
/// A failing file is recorded in [`BatchOutcome::failures`] and never stops
/// the batch. `progress` is called with `(done, total)` after each file.
pub fn process_directory<F>(
    input_dir: &Path,
    config: &ProcessorConfig,
    options: &BatchOptions,
    progress: F,
) -> Result<BatchOutcome, BatchError>
where
    F: Fn(usize, usize) + Sync,
{
    let files = list_input_files(input_dir)?;
    let total = files.len();
    let done = AtomicUsize::new(0);

    let run = |path: &PathBuf| {
        let result = process_file(path, config);
        progress(done.fetch_add(1, Ordering::SeqCst) + 1, total);
        result
    };

    // Indexed collect keeps input order in parallel mode too
    let results: Vec<Result<ClassifiedReading, LoaderError>> = if options.parallel {
        files.par_iter().map(run).collect()
    } else {
        files.iter().map(run).collect()
    };

    let mut outcome = BatchOutcome {
        results: Vec::with_capacity(total),
        failures: Vec::new(),
    };

    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(reading) => outcome.results.push(reading),
            Err(error) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                warn!("skipping {}: {}", file_name, error);
                outcome.failures.push(FailedFile { file_name, error });
            }
        }
    }

    Ok(outcome)
}
