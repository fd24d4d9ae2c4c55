//! JSON export of full crawl results

use crate::crawler::CrawlResult;
use crate::output::traits::{OutputHandler, OutputResult};
use std::io::Write;

/// Writes results as a pretty-printed JSON array
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOutput;

impl OutputHandler for JsonOutput {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write_results(&self, results: &[CrawlResult], out: &mut dyn Write) -> OutputResult<()> {
        serde_json::to_writer_pretty(&mut *out, results)?;
        writeln!(out)?;
        Ok(())
    }
}
