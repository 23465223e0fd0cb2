//! Command-line interface for the categorizer.

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};

use crate::config::{ProcessorConfig, DEFAULT_CONFIG_FILE};
use crate::core::writers::{export_results, ExportFormat};
use crate::processors::batch::{process_directory, BatchOptions, BatchOutcome};
use crate::processors::paths::{resolve_paths, AutoConfirm, Confirmer, PromptConfirmer};

#[derive(Parser)]
#[command(name = "force-categorizer")]
#[command(about = "Categorize parts by the peak force found in their sensor logs", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override PATHS.Input from the config file
    #[arg(short, long)]
    input: Option<String>,

    /// Override PATHS.Output from the config file
    #[arg(short, long)]
    output: Option<String>,

    /// Create a missing output directory without asking
    #[arg(short, long)]
    yes: bool,

    /// Process files in parallel (result order is unchanged)
    #[arg(long)]
    parallel: bool,

    /// Export file format
    #[arg(long, value_enum, default_value_t = ExportFormat::Xlsx)]
    format: ExportFormat,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Create a progress bar rendering `"{i} / {total} files done"`.
fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{pos} / {len} files done")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 39 {
            format!("{}...", value.chars().take(36).collect::<String>())
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<39} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

fn print_failures(outcome: &BatchOutcome) {
    if outcome.failures.is_empty() {
        return;
    }
    println!();
    println!("The following files could not be read:");
    for name in outcome.failed_names() {
        println!("  - {}", name);
    }
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    if let Err(e) = execute(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let start = Instant::now();

    let mut config = ProcessorConfig::from_yaml(&cli.config)
        .with_context(|| format!("cannot load configuration from {}", cli.config.display()))?;
    println!("Configuration loaded from {}", cli.config.display());
    info!(
        "{} categories, rows {}..{}, part pattern {}",
        config.categories.len(),
        config.window.startrow,
        config.window.startrow.saturating_add(config.window.rowcount),
        config.part_pattern.as_str()
    );

    if let Some(input) = &cli.input {
        config.paths.input = input.clone();
    }
    if let Some(output) = &cli.output {
        config.paths.output = output.clone();
    }

    let mut confirmer: Box<dyn Confirmer> = if cli.yes {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(PromptConfirmer::new(io::stdin().lock(), io::stdout()))
    };
    let paths = resolve_paths(&config.paths, confirmer.as_mut())?;
    println!("Input directory: {}", paths.input.display());
    println!("Output directory: {}", paths.output.display());

    let pb = create_progress_bar();
    let options = BatchOptions {
        parallel: cli.parallel,
    };
    let outcome = process_directory(&paths.input, &config, &options, |done, total| {
        if pb.is_hidden() {
            println!("{} / {} files done", done, total);
        } else {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        }
    })?;
    pb.finish();

    print_failures(&outcome);

    let written = export_results(
        &paths.output,
        &outcome.results,
        cli.format,
        &Local::now().naive_local(),
    )?;

    let unmatched = outcome.results.iter().filter(|r| r.is_unmatched()).count();
    print_summary(
        "Categorization Complete",
        &[
            ("Files processed", outcome.total().to_string()),
            ("Parts categorized", outcome.results.len().to_string()),
            ("Without category", unmatched.to_string()),
            ("Unreadable files", outcome.failures.len().to_string()),
            ("Output file", written.display().to_string()),
            ("Duration", format!("{:.2?}", start.elapsed())),
        ],
    );
    println!("Done");

    Ok(())
}
