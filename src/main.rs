//! CLI entry point for the grades importer.
//!
//! Walks a directory of grade CSVs and writes a per-section table plus a
//! per-course average table.

use anyhow::Result;
use clap::Parser;
use clap::builder::NonEmptyStringValueParser;
use grades_import::import::import_grades;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "grades_import")]
#[command(about = "Extract section grades and course averages from a tree of CSV files", long_about = None)]
struct Cli {
    /// Directory to scan recursively for .csv files
    #[arg(long, env = "GRADES_IMPORT_DIR", value_parser = NonEmptyStringValueParser::new())]
    dir: String,

    /// Directory to write the output CSVs to (defaults to the current directory)
    #[arg(long, env = "GRADES_IMPORT_OUT")]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing();

    let cli = Cli::parse();

    let input_dir = PathBuf::from(&cli.dir);
    let output_dir = match cli.out {
        Some(out) => out,
        None => std::env::current_dir()?,
    };

    info!(input = %input_dir.display(), output = %output_dir.display(), "Starting import");

    let summary = import_grades(&input_dir, &output_dir)?;
    println!("{summary}");

    Ok(())
}

/// Logging setup: colored stderr, plus a JSON rolling log file when
/// `LOG_FILE_PATH` is set. The returned guard must live until exit.
fn init_tracing() -> Option<WorkerGuard> {
    let (file_writer, guard) = match std::env::var("LOG_FILE_PATH") {
        Ok(log_file_path) => {
            let log_dir = Path::new(&log_file_path)
                .parent()
                .unwrap_or(Path::new("logs"));
            let log_file_name = Path::new(&log_file_path)
                .file_name()
                .unwrap_or(OsStr::new("grades_import.log"));

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            (Some(non_blocking_file), Some(guard))
        }
        Err(_) => (None, None),
    };

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = file_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(writer)
            .with_filter(
                EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()),
            )
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}
