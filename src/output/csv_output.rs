//! CSV export, one row per seed

use crate::crawler::CrawlResult;
use crate::output::traits::{OutputHandler, OutputResult};
use std::io::Write;

/// Column order of the CSV export
pub const CSV_HEADERS: &[&str] = &[
    "url",
    "name",
    "emails",
    "phones",
    "all_emails",
    "all_phones",
    "masked_phones",
    "synthetic_emails",
    "resume_links",
    "pages_crawled",
];

/// Writes results as CSV
///
/// `emails` and `phones` hold the first value of each set, the `all_*` and
/// list columns are semicolon-joined, and `pages_crawled` is a count.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvOutput;

fn joined<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    values
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(";")
}

impl CsvOutput {
    fn row(result: &CrawlResult) -> Vec<String> {
        vec![
            result.seed.clone(),
            result.name.clone().unwrap_or_default(),
            result.emails.iter().next().cloned().unwrap_or_default(),
            result.phones.iter().next().cloned().unwrap_or_default(),
            joined(&result.emails),
            joined(&result.phones),
            joined(&result.masked_phones),
            joined(&result.synthetic_emails),
            joined(&result.resume_links),
            result.pages_crawled.len().to_string(),
        ]
    }
}

impl OutputHandler for CsvOutput {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write_results(&self, results: &[CrawlResult], out: &mut dyn Write) -> OutputResult<()> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(CSV_HEADERS)?;
        for result in results {
            writer.write_record(Self::row(result))?;
        }
        writer.flush()?;
        Ok(())
    }
}
