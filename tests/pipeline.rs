use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use tempfile::TempDir;

use force_categorizer::config::ConfigError;
use force_categorizer::core::writers::{export_results, ExportFormat, SHEET_NAME};
use force_categorizer::processors::paths::{resolve_paths, AutoConfirm};
use force_categorizer::{process_directory, BatchOptions, ProcessorConfig};

/// Writes a 3000-row log whose window maximum is `peak`, with larger values outside the window.
fn write_full_log(dir: &Path, name: &str, peak: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    for i in 0..3000 {
        let value = match i {
            _ if i < 1200 || i >= 2700 => "9,5".to_string(),
            1900 => peak.to_string(),
            _ => format!("0,00{}", i % 10),
        };
        writeln!(file, "12:00:{:04};1;{};0", i, value).unwrap();
    }
    path
}

fn write_config(dir: &Path, input: &Path, output: &Path) -> PathBuf {
    let path = dir.join("config.yaml");
    let content = format!(
        "PATHS:\n  Input: {}\n  Output: {}\nCATEGORIES:\n  low: \"0-0.1\"\n  mid: \"0.1-0.3\"\n  high: \"0.3-100\"\n",
        input.display(),
        output.display()
    );
    fs::write(&path, content).unwrap();
    path
}

fn sheet_rows(path: &Path) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range(SHEET_NAME).unwrap();
    range.rows().map(|row| row.to_vec()).collect()
}

#[test]
fn test_directory_to_spreadsheet() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("logs");
    let output = temp_dir.path().join("results");
    fs::create_dir_all(&input).unwrap();

    write_full_log(&input, "EBE100001.csv", "0,05");
    write_full_log(&input, "EBE100002.csv", "0,2");
    write_full_log(&input, "EBE100003.csv", "0,5");
    write_full_log(&input, "EBE100004.csv", "0,3");
    write_full_log(&input, "EBE100005.csv", "kaputt");
    fs::write(input.join("readme.txt"), "not a log").unwrap();

    let config_path = write_config(temp_dir.path(), &input, &output);
    let config = ProcessorConfig::from_yaml(&config_path).unwrap();

    let paths = resolve_paths(&config.paths, &mut AutoConfirm(true)).unwrap();
    assert!(output.is_dir());

    let outcome = process_directory(&paths.input, &config, &BatchOptions::default(), |_, _| {}).unwrap();
    assert_eq!(outcome.results.len(), 4);
    assert_eq!(outcome.failed_names(), vec!["EBE100005.csv", "readme.txt"]);

    let categories: Vec<&str> = outcome.results.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(categories, vec!["low", "mid", "high", "uncategorized"]);
    assert_eq!(outcome.results[2].peak_force, 0.5);

    let timestamp = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap();
    let written = export_results(&paths.output, &outcome.results, ExportFormat::Xlsx, &timestamp).unwrap();
    assert_eq!(
        written.file_name().unwrap().to_string_lossy(),
        "240601_1430_categorized_parts.xlsx"
    );

    let rows = sheet_rows(&written);
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[1][0], Data::String("EBE100001".to_string()));
    assert_eq!(rows[1][1], Data::Float(0.05));
    assert_eq!(rows[4][2], Data::String("uncategorized".to_string()));
}

#[test]
fn test_repeated_runs_produce_identical_rows() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("logs");
    fs::create_dir_all(&input).unwrap();
    for (i, peak) in ["0,07", "0,25", "1,75"].iter().enumerate() {
        write_full_log(&input, &format!("EBE20000{}.csv", i), peak);
    }

    let config_path = write_config(temp_dir.path(), &input, temp_dir.path());
    let config = ProcessorConfig::from_yaml(&config_path).unwrap();

    let first = process_directory(&input, &config, &BatchOptions::default(), |_, _| {}).unwrap();
    let second = process_directory(&input, &config, &BatchOptions { parallel: true }, |_, _| {}).unwrap();

    assert_eq!(first.results, second.results);
    assert_eq!(first.results[2].peak_force, 1.75);
}

#[test]
fn test_empty_directory_exports_headers_only() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("logs");
    fs::create_dir_all(&input).unwrap();

    let config_path = write_config(temp_dir.path(), &input, temp_dir.path());
    let config = ProcessorConfig::from_yaml(&config_path).unwrap();
    let outcome = process_directory(&input, &config, &BatchOptions::default(), |_, _| {}).unwrap();

    let timestamp = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let written = export_results(temp_dir.path(), &outcome.results, ExportFormat::Xlsx, &timestamp).unwrap();

    let rows = sheet_rows(&written);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][2], Data::String("category".to_string()));
}

#[test]
fn test_malformed_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");

    fs::write(&path, "PATHS:\n  Input: data/\n  Output: out/\n").unwrap();
    assert!(matches!(
        ProcessorConfig::from_yaml(&path),
        Err(ConfigError::Parse { .. })
    ));

    fs::write(&path, "CATEGORIES:\n  low: \"0..0.1\"\n").unwrap();
    assert!(matches!(
        ProcessorConfig::from_yaml(&path),
        Err(ConfigError::InvalidRange { .. })
    ));
}
