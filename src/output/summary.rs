//! Console summary of crawl results

use crate::crawler::CrawlResult;
use crate::output::traits::{BatchSummary, OutputHandler, OutputResult};
use std::io::Write;

/// Human-readable report, one block per seed plus batch totals
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOutput;

impl OutputHandler for TextOutput {
    fn name(&self) -> &'static str {
        "text"
    }

    fn write_results(&self, results: &[CrawlResult], out: &mut dyn Write) -> OutputResult<()> {
        out.write_all(format_summary(results).as_bytes())?;
        Ok(())
    }
}

fn push_list<'a>(text: &mut String, label: &str, values: impl ExactSizeIterator<Item = &'a String>) {
    if values.len() == 0 {
        text.push_str(&format!("  {}: none\n", label));
        return;
    }
    text.push_str(&format!("  {} ({}):\n", label, values.len()));
    for value in values {
        text.push_str(&format!("    - {}\n", value));
    }
}

/// Formats one block for a single crawl
pub fn format_result(result: &CrawlResult) -> String {
    let mut text = String::new();

    text.push_str(&format!("=== {} ===\n", result.seed));
    if let Some(root) = &result.root {
        if root != &result.seed {
            text.push_str(&format!("  Root: {}\n", root));
        }
    }
    text.push_str(&format!("  Outcome: {}\n", result.outcome));
    if let Some(name) = &result.name {
        text.push_str(&format!("  Name: {}\n", name));
    }

    push_list(&mut text, "Emails", result.emails.iter());
    push_list(&mut text, "Phones", result.phones.iter());
    if !result.masked_phones.is_empty() {
        push_list(&mut text, "Masked phones", result.masked_phones.iter());
    }
    if !result.synthetic_emails.is_empty() {
        push_list(&mut text, "Guessed emails", result.synthetic_emails.iter());
    }
    if !result.resume_links.is_empty() {
        push_list(&mut text, "Resume links", result.resume_links.iter());
    }

    let elapsed = (result.finished_at - result.started_at).num_milliseconds() as f64 / 1000.0;
    text.push_str(&format!(
        "  Pages: {} crawled, {} skipped in {:.1}s\n",
        result.pages_crawled.len(),
        result.skipped_pages.len(),
        elapsed
    ));

    text
}

/// Formats every result followed by the batch totals
pub fn format_summary(results: &[CrawlResult]) -> String {
    let mut text = String::new();
    for result in results {
        text.push_str(&format_result(result));
        text.push('\n');
    }

    let summary = BatchSummary::from_results(results);
    text.push_str("=== Summary ===\n");
    text.push_str(&format!(
        "  Seeds: {} ({} completed, {} aborted)\n",
        summary.seeds, summary.completed, summary.aborted
    ));
    text.push_str(&format!(
        "  With email: {} ({:.1}%)\n",
        summary.with_email,
        summary.email_rate()
    ));
    text.push_str(&format!("  With phone: {}\n", summary.with_phone));
    text.push_str(&format!("  With resume link: {}\n", summary.with_resume));
    text.push_str(&format!(
        "  Pages: {} crawled, {} skipped\n",
        summary.pages_crawled, summary.pages_skipped
    ));

    text
}

/// Prints the text report to stdout
pub fn print_summary(results: &[CrawlResult]) {
    print!("{}", format_summary(results));
}
