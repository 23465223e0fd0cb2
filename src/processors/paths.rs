//! Input/output directory resolution.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::config::PathsConfig;

/// Input directory used when the configured path is empty.
pub const DEFAULT_INPUT_DIR: &str = "data/";

/// Output directory used when the configured path is empty.
pub const DEFAULT_OUTPUT_DIR: &str = "output/";

/// Errors that can occur while resolving directories.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("input directory not found: {0}")]
    InputNotFound(PathBuf),

    #[error("input path is not a directory: {0}")]
    InputNotDirectory(PathBuf),

    #[error("output path exists but is not a directory: {0}")]
    OutputNotDirectory(PathBuf),

    #[error(
        "output directory {0} does not exist and was not created; \
         create it or set PATHS.Output to an existing directory"
    )]
    CreationDeclined(PathBuf),

    #[error("failed to create output directory '{path}': {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read confirmation: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Result type for path resolution.
pub type Result<T> = std::result::Result<T, PathError>;

/// Asks the operator a yes/no question.
pub trait Confirmer {
    fn confirm(&mut self, question: &str) -> std::io::Result<bool>;
}

/// Answers every question with a fixed value.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirmer for AutoConfirm {
    fn confirm(&mut self, question: &str) -> std::io::Result<bool> {
        debug!("auto-answering {:?} with {}", question, self.0);
        Ok(self.0)
    }
}

/// Interactive confirmer reading `y`/`yes`/`n`/`no` lines.
///
/// Any other answer repeats the question. End of input declines.
pub struct PromptConfirmer<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirmer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirmer for PromptConfirmer<R, W> {
    fn confirm(&mut self, question: &str) -> std::io::Result<bool> {
        loop {
            write!(self.output, "{} [y/n]: ", question)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(false);
            }

            match parse_answer(&line) {
                Some(answer) => return Ok(answer),
                None => writeln!(self.output, "Please answer 'y' or 'n'.")?,
            }
        }
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Ensure a directory string ends with a separator.
///
/// Empty input yields `default`. A string containing backslashes but no
/// forward slash is treated as a Windows path and gets `\`; every other
/// string gets `/`.
pub fn normalize_dir(raw: &str, default: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return default.to_string();
    }
    if raw.ends_with('/') || raw.ends_with('\\') {
        return raw.to_string();
    }

    let separator = if raw.contains('\\') && !raw.contains('/') {
        '\\'
    } else {
        '/'
    };
    format!("{}{}", raw, separator)
}

/// Validated input and output directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Normalize both directories, require the input, create the output if allowed.
pub fn resolve_paths(paths: &PathsConfig, confirmer: &mut dyn Confirmer) -> Result<ResolvedPaths> {
    let input = PathBuf::from(normalize_dir(&paths.input, DEFAULT_INPUT_DIR));
    let output = PathBuf::from(normalize_dir(&paths.output, DEFAULT_OUTPUT_DIR));

    check_input_dir(&input)?;
    ensure_output_dir(&output, confirmer)?;

    info!("input directory: {}", input.display());
    info!("output directory: {}", output.display());

    Ok(ResolvedPaths { input, output })
}

// Trailing separators make `exists()` fail for regular files
fn strip_trailing(path: &Path) -> PathBuf {
    path.components().collect()
}

fn check_input_dir(input: &Path) -> Result<()> {
    let probe = strip_trailing(input);
    if !probe.exists() {
        return Err(PathError::InputNotFound(input.to_path_buf()));
    }
    if !probe.is_dir() {
        return Err(PathError::InputNotDirectory(input.to_path_buf()));
    }
    Ok(())
}

/// Create `output` after confirmation when it does not exist yet.
pub fn ensure_output_dir(output: &Path, confirmer: &mut dyn Confirmer) -> Result<()> {
    let probe = strip_trailing(output);
    if probe.is_dir() {
        return Ok(());
    }
    if probe.exists() {
        return Err(PathError::OutputNotDirectory(output.to_path_buf()));
    }

    let question = format!(
        "Output directory {} does not exist. Create it?",
        output.display()
    );
    if !confirmer.confirm(&question)? {
        return Err(PathError::CreationDeclined(output.to_path_buf()));
    }

    fs::create_dir_all(output).map_err(|e| PathError::CreateOutput {
        path: output.to_path_buf(),
        source: e,
    })?;
    info!("created output directory {}", output.display());
    Ok(())
}
