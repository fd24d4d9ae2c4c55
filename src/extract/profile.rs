//! Profile metadata: a best-effort owner name and resume links

use crate::url::{base_host, is_document_url, is_same_site};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("valid selector"));
static H2: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").expect("valid selector"));
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));
static SITE_NAME: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[property="og:site_name"]"#).expect("valid selector")
});
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));

const TITLE_SEPARATORS: &[&str] = &[" - ", " | ", " – ", " — "];
const RESUME_HINTS: &[&str] = &["resume", "cv", "curriculum", "vitae", "biodata"];

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keeps the part of a title before the first separator
fn strip_title_suffix(text: &str) -> &str {
    TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| text.find(sep))
        .min()
        .map_or(text, |index| &text[..index])
        .trim()
}

/// Guesses the site owner's name from headings and the title
///
/// Checks `<h1>`, `<title>` then `<h2>`. A candidate of two to five words is
/// accepted from any of them; headings may also give up to eight words.
/// Falls back to `og:site_name`.
pub fn guess_name_from_dom(document: &Html) -> Option<String> {
    for (selector, is_heading) in [(&*H1, true), (&*TITLE, false), (&*H2, true)] {
        let Some(element) = document.select(selector).next() else {
            continue;
        };
        let text = element_text(element);
        let candidate = strip_title_suffix(&text);
        if candidate.is_empty() {
            continue;
        }

        let words = candidate.split_whitespace().count();
        if (2..=5).contains(&words) || (is_heading && words <= 8) {
            return Some(candidate.to_string());
        }
    }

    document
        .select(&SITE_NAME)
        .filter_map(|meta| meta.value().attr("content"))
        .map(|content| content.split_whitespace().collect::<Vec<_>>().join(" "))
        .find(|content| !content.is_empty())
}

/// Capitalised first label of the host (`jane.dev` → `Jane`)
pub fn name_from_host(url: &Url) -> Option<String> {
    let host = base_host(url)?;
    let label = host.split('.').next().filter(|l| !l.is_empty())?;
    let mut chars = label.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// Name hidden in a document file name (`jane-doe-cv.pdf` → `Jane Doe`)
///
/// Separators become spaces and resume hint words are dropped; two to six
/// remaining words are title-cased.
pub fn name_from_document(url: &Url) -> Option<String> {
    let file = url.path_segments()?.next_back()?;
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    let stem = stem.replace("%20", " ");

    let words: Vec<String> = stem
        .split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .filter(|word| !RESUME_HINTS.contains(&word.to_lowercase().as_str()))
        .map(title_case)
        .collect();

    let has_digits = words.iter().any(|w| w.chars().any(|c| c.is_ascii_digit()));
    if has_digits || !(2..=6).contains(&words.len()) {
        return None;
    }
    Some(words.join(" "))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn has_resume_hint(value: &str) -> bool {
    value
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| RESUME_HINTS.contains(&word))
}

/// Finds links that look like a resume or CV
///
/// A link qualifies if its href or text carries a resume hint as a whole
/// word, or if it points at a document file. Same-site pages and documents
/// on any host are kept, de-duplicated in document order.
pub fn resume_links(document: &Html, page_url: &Url, site_host: &str) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(mut url) = page_url.join(href.trim()) else {
            continue;
        };
        if !matches!(url.scheme(), "http" | "https") {
            continue;
        }
        url.set_fragment(None);

        let is_document = is_document_url(&url);
        let hinted = has_resume_hint(url.path()) || has_resume_hint(&element_text(anchor));
        if !(is_document || hinted) {
            continue;
        }
        if !is_document && !is_same_site(&url, site_host) {
            continue;
        }

        if seen.insert(url.to_string()) {
            links.push(url);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://janedoe.dev/about").unwrap()
    }

    #[test]
    fn test_name_from_h1() {
        let html = Html::parse_document("<h1>Jane Doe</h1><title>Home</title>");
        assert_eq!(guess_name_from_dom(&html), Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_name_from_title_with_separator() {
        let html = Html::parse_document(
            "<html><head><title>Jane Doe | Portfolio</title></head><body></body></html>",
        );
        assert_eq!(guess_name_from_dom(&html), Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_single_word_title_skipped() {
        let html = Html::parse_document(
            "<html><head><title>Home</title></head><body><h2>Jane Q Doe</h2></body></html>",
        );
        assert_eq!(guess_name_from_dom(&html), Some("Jane Q Doe".to_string()));
    }

    #[test]
    fn test_name_from_site_name() {
        let html = Html::parse_document(
            r#"<html><head><meta property="og:site_name" content="Doe Studio"></head></html>"#,
        );
        assert_eq!(guess_name_from_dom(&html), Some("Doe Studio".to_string()));
    }

    #[test]
    fn test_name_from_host() {
        let url = Url::parse("https://www.janedoe.dev/").unwrap();
        assert_eq!(name_from_host(&url), Some("Janedoe".to_string()));
    }

    #[test]
    fn test_name_from_document() {
        let url = Url::parse("https://jane.dev/files/jane-doe-cv.pdf").unwrap();
        assert_eq!(name_from_document(&url), Some("Jane Doe".to_string()));

        let url = Url::parse("https://jane.dev/JOHN_SMITH_Resume.docx").unwrap();
        assert_eq!(name_from_document(&url), Some("John Smith".to_string()));
    }

    #[test]
    fn test_name_from_document_rejects_generic_files() {
        let url = Url::parse("https://jane.dev/cv.pdf").unwrap();
        assert_eq!(name_from_document(&url), None);

        let url = Url::parse("https://jane.dev/resume-2024-final.pdf").unwrap();
        assert_eq!(name_from_document(&url), None);
    }

    #[test]
    fn test_resume_links() {
        let html = Html::parse_document(
            r#"
            <a href="/cv">My CV</a>
            <a href="/files/download.pdf">Download</a>
            <a href="/resume#top">Resume</a>
            <a href="/cv">Again</a>
            <a href="/blog/recovery">Recovery notes</a>
            <a href="https://elsewhere.org/resume">Other resume</a>
            <a href="https://drive.example.org/jane.pdf">PDF</a>
            "#,
        );
        let links: Vec<String> = resume_links(&html, &page(), "janedoe.dev")
            .iter()
            .map(Url::to_string)
            .collect();
        assert_eq!(
            links,
            vec![
                "https://janedoe.dev/cv",
                "https://janedoe.dev/files/download.pdf",
                "https://janedoe.dev/resume",
                "https://drive.example.org/jane.pdf",
            ]
        );
    }
}
