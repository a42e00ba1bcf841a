//! `parquet-json`: print a Parquet file as a single line of JSON records

mod error;
mod output;

use crate::error::CliError;
use clap::error::ErrorKind;
use clap::Parser;
use parquet_records::{convert_path, ReaderOptions};
use std::path::PathBuf;
use std::process::ExitCode;

#[cfg(target_os = "linux")]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const USAGE: &str = "Usage: parquet-json <FILE> [--columns <NAME,...>] [--batch-size <ROWS>]";

#[derive(Parser, Debug)]
#[command(
    name = "parquet-json",
    version,
    about = "Convert a Parquet file into a JSON array of records"
)]
struct Cli {
    /// Path to the Parquet file.
    file: PathBuf,

    /// Only emit these columns (comma separated). File order is kept.
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Rows per decoded batch.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    batch_size: Option<u64>,
}

impl Cli {
    fn reader_options(&self) -> ReaderOptions {
        let mut options = ReaderOptions::new();
        if let Some(columns) = &self.columns {
            options = options.with_columns(columns);
        }
        if let Some(size) = self.batch_size {
            options = options.with_batch_size(size as usize);
        }
        options
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = %err, "conversion failed");
            if let Err(write_err) = output::write_error(std::io::stdout().lock(), &err.to_string())
            {
                tracing::error!(error = %write_err, "failed to report error");
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            tracing::debug!(error = %e, "invalid arguments");
            return Err(CliError::Usage(USAGE.to_string()));
        }
    };

    tracing::info!(file = %cli.file.display(), "reading parquet file");
    let conversion = convert_path(&cli.file, &cli.reader_options())?;
    let rows = conversion.row_count();

    let mut records = conversion.into_records();
    let stdout = std::io::BufWriter::new(std::io::stdout().lock());
    let written = output::write_records(stdout, records.by_ref())?;

    let warnings = records.warnings().len();
    if warnings > 0 {
        tracing::warn!(warnings, "some values could not be represented and were replaced");
    }
    tracing::info!(rows, written, "conversion finished");
    Ok(())
}
