use anyhow::Result;
use clap::Parser;
use dupes::adapters::{
    ConsoleOutputAdapter, FileSystemAdapter, JsonOutputAdapter, ProgressBarAdapter, Sha256Hasher,
};
use dupes::cli::Cli;
use dupes::domain::OutputFormat;
use dupes::ports::EventPort;
use dupes::services::TraversalEngine;
use log::debug;
use std::process;

fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .map(std::path::Path::new)
        .and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

fn run() -> Result<i32> {
    let args = Cli::parse();
    let config = args.to_scan_config();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init()?;

    if !config.color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let progress = ProgressBarAdapter::new().with_quiet(!config.progress);
    let events: Box<dyn EventPort> = match config.format {
        OutputFormat::Text => Box::new(
            ConsoleOutputAdapter::new(program_name())
                .with_verbose(config.verbose)
                .with_progress_bar(progress.bar()),
        ),
        OutputFormat::Json => Box::new(JsonOutputAdapter::new().with_progress_bar(progress.bar())),
    };
    let filesystem = FileSystemAdapter::new();
    let hasher = Sha256Hasher::new().with_mmap_threshold(config.mmap_threshold);

    let engine = TraversalEngine::new(filesystem, hasher, events, progress);
    let report = engine.run(&config);

    debug!(
        "{} target(s) scanned, {} failed, {} files processed, {} unique fingerprints",
        report.results.len(),
        report.failures.len(),
        report.total_processed(),
        report.unique_fingerprints
    );

    Ok(report.exit_code(config.strict))
}

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
