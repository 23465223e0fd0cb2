//! Configuration types for the categorizer.
//!
//! The configuration file is a YAML document with a `PATHS` section (input and
//! output directories), an ordered `CATEGORIES` section (label → `"low-high"`)
//! and optional `WINDOW` and `PART` sections.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::core::loaders::PartIdPattern;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("CATEGORIES section defines no categories")]
    NoCategories,

    #[error("unsupported category label: {0}")]
    InvalidLabel(String),

    #[error("invalid range for category '{label}': {value:?} (expected \"<low>-<high>\")")]
    InvalidRange { label: String, value: String },

    #[error("range for category '{label}' is inverted: {low} > {high}")]
    InvertedRange { label: String, low: f64, high: f64 },

    #[error("invalid part pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("row window must contain at least one row")]
    EmptyWindow,
}

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Raw input/output directory strings, normalized later by the path resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the log files
    #[serde(rename = "Input", default)]
    pub input: String,

    /// Directory receiving the exported table
    #[serde(rename = "Output", default)]
    pub output: String,
}

/// Slice of each log file that is searched for the peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWindow {
    /// Number of leading rows to skip
    #[serde(default = "default_startrow")]
    pub startrow: usize,

    /// Number of rows read after the skipped ones
    #[serde(default = "default_rowcount")]
    pub rowcount: usize,
}

fn default_startrow() -> usize {
    1200
}

fn default_rowcount() -> usize {
    1500
}

impl Default for RowWindow {
    fn default() -> Self {
        Self {
            startrow: default_startrow(),
            rowcount: default_rowcount(),
        }
    }
}

/// One named classification bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRange {
    pub label: String,
    pub low: f64,
    pub high: f64,
}

impl CategoryRange {
    pub fn new(label: impl Into<String>, low: f64, high: f64) -> Self {
        Self {
            label: label.into(),
            low,
            high,
        }
    }

    /// Strict containment: values equal to either limit are outside.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.low < value && value < self.high
    }

    /// Parse a `"low-high"` string such as `"0.1-0.3"` or `"-5-0.1"`.
    ///
    /// The separator is the first `-` that splits the text into two valid
    /// numbers, so negative limits and exponents are accepted.
    pub fn parse(label: &str, text: &str) -> Result<Self> {
        let text = text.trim();
        let invalid = || ConfigError::InvalidRange {
            label: label.to_string(),
            value: text.to_string(),
        };

        let (low, high) = text
            .match_indices('-')
            .filter(|&(idx, _)| idx > 0)
            .find_map(|(idx, _)| {
                let low = text[..idx].trim().parse::<f64>().ok()?;
                let high = text[idx + 1..].trim().parse::<f64>().ok()?;
                Some((low, high))
            })
            .ok_or_else(invalid)?;

        if !low.is_finite() || !high.is_finite() {
            return Err(invalid());
        }
        if low > high {
            return Err(ConfigError::InvertedRange {
                label: label.to_string(),
                low,
                high,
            });
        }

        Ok(Self::new(label, low, high))
    }
}

#[derive(Debug, Deserialize)]
struct PartSection {
    #[serde(default = "default_part_pattern")]
    pattern: String,
}

fn default_part_pattern() -> String {
    PartIdPattern::DEFAULT.to_string()
}

impl Default for PartSection {
    fn default() -> Self {
        Self {
            pattern: default_part_pattern(),
        }
    }
}

/// On-disk layout of the config file.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "PATHS", default)]
    paths: PathsConfig,

    #[serde(rename = "CATEGORIES")]
    categories: Mapping,

    #[serde(rename = "WINDOW", default)]
    window: RowWindow,

    #[serde(rename = "PART", default)]
    part: PartSection,
}

/// Validated configuration used by the whole pipeline.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub paths: PathsConfig,
    /// Category ranges in declaration order
    pub categories: Vec<CategoryRange>,
    pub window: RowWindow,
    pub part_pattern: PartIdPattern,
}

impl ProcessorConfig {
    /// Build a configuration from already-parsed parts.
    pub fn new(paths: PathsConfig, categories: Vec<CategoryRange>) -> Self {
        Self {
            paths,
            categories,
            window: RowWindow::default(),
            part_pattern: PartIdPattern::default(),
        }
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Load configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::parse(content, Path::new("<string>"))
    }

    fn parse(content: &str, origin: &Path) -> Result<Self> {
        let raw: ConfigFile = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            source: e,
        })?;

        let categories = parse_categories(&raw.categories)?;

        if raw.window.rowcount == 0 {
            return Err(ConfigError::EmptyWindow);
        }

        let part_pattern =
            PartIdPattern::new(&raw.part.pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: raw.part.pattern.clone(),
                source: e,
            })?;

        Ok(Self {
            paths: raw.paths,
            categories,
            window: raw.window,
            part_pattern,
        })
    }
}

/// Convert the ordered `CATEGORIES` mapping into ranges.
fn parse_categories(section: &Mapping) -> Result<Vec<CategoryRange>> {
    if section.is_empty() {
        return Err(ConfigError::NoCategories);
    }

    let mut ranges = Vec::with_capacity(section.len());
    for (key, value) in section {
        let label = scalar_text(key).ok_or_else(|| ConfigError::InvalidLabel(format!("{:?}", key)))?;
        let text = match value {
            Value::String(s) => s.as_str(),
            other => {
                return Err(ConfigError::InvalidRange {
                    label,
                    value: format!("{:?}", other),
                })
            }
        };
        ranges.push(CategoryRange::parse(&label, text)?);
    }

    Ok(ranges)
}

// YAML keys like `1:` arrive as numbers
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
