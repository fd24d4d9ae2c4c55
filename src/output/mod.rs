//! Output module for reporting crawl results
//!
//! This module handles:
//! - A console text report with batch totals
//! - JSON export of full results
//! - CSV export with one row per seed

mod csv_output;
mod json_output;
mod summary;
mod traits;

pub use csv_output::{CsvOutput, CSV_HEADERS};
pub use json_output::JsonOutput;
pub use summary::{format_result, format_summary, print_summary, TextOutput};
pub use traits::{BatchSummary, OutputError, OutputHandler, OutputResult};

use crate::config::OutputFormat;
use crate::crawler::CrawlResult;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Returns the handler for an output format
pub fn handler_for(format: OutputFormat) -> Box<dyn OutputHandler> {
    match format {
        OutputFormat::Text => Box::new(TextOutput),
        OutputFormat::Json => Box::new(JsonOutput),
        OutputFormat::Csv => Box::new(CsvOutput),
    }
}

/// Writes results in `format` to `path`, or to stdout when no path is given
///
/// # Arguments
///
/// * `results` - Results in seed order
/// * `format` - Output format
/// * `path` - Destination file; created or truncated
pub fn write_results(
    results: &[CrawlResult],
    format: OutputFormat,
    path: Option<&Path>,
) -> OutputResult<()> {
    let handler = handler_for(format);

    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            handler.write_results(results, &mut writer)?;
            writer.flush()?;
            tracing::info!(
                "Wrote {} results as {} to {}",
                results.len(),
                handler.name(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            handler.write_results(results, &mut lock)?;
            lock.flush()?;
        }
    }

    Ok(())
}
