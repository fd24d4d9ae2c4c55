//! Contact extraction module for Contact-Ripple
//!
//! Each source on a page (rendered text, `mailto:`/`tel:` links, data
//! attributes, Cloudflare-protected addresses, JSON-LD) is handled by its own
//! strategy that returns tagged [`Candidate`]s. [`ContactSet`] applies the
//! de-duplication policy, both per page and across a crawl.
//!
//! Everything here works on a parsed [`scraper::Html`] synchronously.

mod candidate;
mod email;
mod obfuscation;
mod phone;
mod profile;
mod structured;

pub use candidate::{
    masked_key, phone_key, Candidate, Confidence, ContactKind, ContactSet, Source,
};
pub use email::{clean_email, deobfuscate, find_emails, is_valid_email, parse_mailto};
pub use obfuscation::{
    cloudflare_payload, CloudflareDecoder, DecodeError, EmailDecoder, CLOUDFLARE_PROTECTION_PATH,
};
pub use phone::PhoneMatcher;
pub use profile::{guess_name_from_dom, name_from_document, name_from_host, resume_links};
pub use structured::extract_json_ld;

use crate::config::ExtractionConfig;
use crate::url::base_host;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));
static CF_EMAIL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[data-cfemail]").expect("valid selector"));
static DATA_EMAIL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("[data-email], [data-mail], [data-contact]").expect("valid selector")
});
static DATA_USER_DOMAIN: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[data-user][data-domain]").expect("valid selector"));
static DATA_PHONE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("[data-phone], [data-tel], [data-telephone]").expect("valid selector")
});
static SCRIPT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script[type]").expect("valid selector"));

/// Elements whose text is never rendered
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line when rendered
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "dd", "div", "dl", "dt",
    "figcaption", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Concatenates the rendered text nodes of a document
///
/// Text nodes inside the same block are joined with a space; a block
/// boundary or a `<br>` becomes a newline, so values in neighbouring list
/// items or table cells never run together.
pub fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    let mut last_block = None;

    for node in document.root_element().descendants() {
        let Some(content) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = content.trim();
        if trimmed.is_empty() {
            continue;
        }

        let block = node
            .ancestors()
            .find(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| BLOCK_ELEMENTS.contains(&element.name()))
            })
            .map(|ancestor| ancestor.id());
        let after_break = node
            .prev_sibling()
            .and_then(|sibling| sibling.value().as_element())
            .is_some_and(|element| element.name() == "br");

        if !text.is_empty() {
            text.push(if block != last_block || after_break { '\n' } else { ' ' });
        }
        text.push_str(trimmed);
        last_block = block;
    }

    text
}

/// Runs every extraction strategy over a page
pub struct ContactExtractor {
    phones: PhoneMatcher,
    decoder: Box<dyn EmailDecoder>,
    decode_obfuscated: bool,
    synthetic_emails: bool,
}

impl ContactExtractor {
    /// Creates an extractor with the Cloudflare decoder
    pub fn new(config: &ExtractionConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            phones: PhoneMatcher::new(config)?,
            decoder: Box::new(CloudflareDecoder),
            decode_obfuscated: config.decode_cloudflare,
            synthetic_emails: config.synthetic_emails,
        })
    }

    /// Replaces the decoder used for protected addresses
    pub fn with_decoder(mut self, decoder: impl EmailDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    /// Extracts all candidates from a page, in strategy order
    ///
    /// # Arguments
    ///
    /// * `document` - The parsed page
    /// * `page_url` - Final URL of the page, used for the synthetic fallback
    pub fn extract(&self, document: &Html, page_url: &Url) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        candidates.extend(self.from_visible_text(document));
        candidates.extend(self.from_links(document, page_url));
        candidates.extend(self.from_protected(document, page_url));
        candidates.extend(self.from_data_attributes(document));
        candidates.extend(self.from_structured_data(document));

        tracing::trace!("Extracted {} candidates from {}", candidates.len(), page_url);
        candidates
    }

    fn from_visible_text(&self, document: &Html) -> Vec<Candidate> {
        let text = visible_text(document);

        let mut candidates: Vec<Candidate> = find_emails(&text)
            .into_iter()
            .map(|email| Candidate::email(email, Source::VisibleText, Confidence::Direct))
            .collect();
        candidates.extend(self.phones.find_in_text(&text, Source::VisibleText));
        candidates
    }

    fn from_links(&self, document: &Html, page_url: &Url) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for anchor in document.select(&ANCHOR) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            let lower = href.to_ascii_lowercase();

            if lower.starts_with("mailto:") {
                candidates.extend(
                    parse_mailto(href)
                        .into_iter()
                        .map(|email| Candidate::email(email, Source::Mailto, Confidence::Direct)),
                );
            } else if lower.starts_with("tel:") {
                let number = href["tel:".len()..]
                    .replace("%20", " ")
                    .replace("%2B", "+")
                    .replace("%2b", "+");
                candidates.extend(self.phones.classify(&number, Source::TelLink));
            } else if let Some(payload) = cloudflare_payload(href) {
                candidates.extend(self.decode_protected(payload, page_url));
            }
        }

        candidates
    }

    fn from_protected(&self, document: &Html, page_url: &Url) -> Vec<Candidate> {
        document
            .select(&CF_EMAIL)
            .filter_map(|element| element.value().attr("data-cfemail"))
            .filter_map(|payload| self.decode_protected(payload, page_url))
            .collect()
    }

    /// Decodes one protected address, falling back to `info@<host>`
    fn decode_protected(&self, payload: &str, page_url: &Url) -> Option<Candidate> {
        if self.decode_obfuscated {
            match self.decoder.decode(payload) {
                Ok(decoded) => match clean_email(&decoded) {
                    Some(email) => {
                        return Some(Candidate::email(email, Source::Cloudflare, Confidence::Decoded))
                    }
                    None => tracing::trace!("Decoded payload is not an email: {}", decoded),
                },
                Err(e) => tracing::trace!("Failed to decode protected email {}: {}", payload, e),
            }
        }

        self.synthetic_email(page_url)
    }

    fn synthetic_email(&self, page_url: &Url) -> Option<Candidate> {
        if !self.synthetic_emails {
            return None;
        }
        let host = base_host(page_url)?;
        let email = format!("info@{}", host);
        is_valid_email(&email)
            .then(|| Candidate::email(email, Source::DomainFallback, Confidence::Synthetic))
    }

    fn from_data_attributes(&self, document: &Html) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for element in document.select(&DATA_EMAIL) {
            for attr in ["data-email", "data-mail", "data-contact"] {
                let Some(raw) = element.value().attr(attr) else {
                    continue;
                };
                let plain = deobfuscate(raw);
                let confidence = if plain == raw.trim().to_lowercase() {
                    Confidence::Direct
                } else {
                    Confidence::Decoded
                };
                if let Some(email) = clean_email(&plain) {
                    candidates.push(Candidate::email(email, Source::DataAttribute, confidence));
                }
            }
        }

        for element in document.select(&DATA_USER_DOMAIN) {
            let el = element.value();
            if let (Some(user), Some(domain)) = (el.attr("data-user"), el.attr("data-domain")) {
                if let Some(email) = clean_email(&format!("{}@{}", user.trim(), domain.trim())) {
                    candidates.push(Candidate::email(
                        email,
                        Source::DataAttribute,
                        Confidence::Decoded,
                    ));
                }
            }
        }

        for element in document.select(&DATA_PHONE) {
            for attr in ["data-phone", "data-tel", "data-telephone"] {
                if let Some(raw) = element.value().attr(attr) {
                    candidates.extend(self.phones.classify(raw, Source::DataAttribute));
                }
            }
        }

        candidates
    }

    fn from_structured_data(&self, document: &Html) -> Vec<Candidate> {
        document
            .select(&SCRIPT)
            .filter(|script| {
                script
                    .value()
                    .attr("type")
                    .is_some_and(|t| t.to_ascii_lowercase().contains("ld+json"))
            })
            .flat_map(|script| {
                let body: String = script.text().collect();
                extract_json_ld(&body, &self.phones)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::obfuscation::encode_cloudflare;

    fn extractor() -> ContactExtractor {
        ContactExtractor::new(&ExtractionConfig::default()).unwrap()
    }

    fn page_url() -> Url {
        Url::parse("https://www.example.com/contact").unwrap()
    }

    fn contacts(html: &str) -> ContactSet {
        let document = Html::parse_document(html);
        ContactSet::from_candidates(&extractor().extract(&document, &page_url()))
    }

    #[test]
    fn test_visible_text_skips_scripts() {
        let document = Html::parse_document(
            "<p>Hello</p><script>var a = 'x@y.com';</script><style>p{}</style><p>World</p>",
        );
        assert_eq!(visible_text(&document), "Hello\nWorld");
    }

    #[test]
    fn test_visible_text_keeps_inline_runs_together() {
        let document = Html::parse_document("<p>Call <b>+977</b> 9860463471<br>Thanks</p>");
        assert_eq!(visible_text(&document), "Call +977 9860463471\nThanks");
    }

    #[test]
    fn test_phones_in_neighbouring_list_items() {
        let set = contacts("<ul><li>+977 9860463471</li><li>01-4412345</li></ul>");

        let mut phones: Vec<&str> = set.phones().collect();
        phones.sort();
        assert_eq!(phones, vec!["+977 9860463471", "01-4412345"]);
    }

    #[test]
    fn test_phones_in_neighbouring_table_cells() {
        let set = contacts(
            "<table><tr><td>+977 9860463471</td><td>+977 9851012345</td></tr></table>",
        );
        assert_eq!(set.phones().count(), 2);
    }

    #[test]
    fn test_mailto_text_and_json_ld_merge() {
        let set = contacts(
            r#"<html><body>
            <a href="mailto:info@example.com">Email us</a>
            <p>Call +977 9860463471</p>
            <script type="application/ld+json">{"email": "info@example.com"}</script>
            </body></html>"#,
        );

        let emails: Vec<&str> = set.emails().iter().map(String::as_str).collect();
        assert_eq!(emails, vec!["info@example.com"]);
        assert_eq!(set.phones().collect::<Vec<_>>(), vec!["+977 9860463471"]);
        assert!(set.synthetic_emails().is_empty());
    }

    #[test]
    fn test_masked_number_not_a_phone() {
        let set = contacts("<p>Phone: +977-XXXXXXXXXX</p>");
        assert_eq!(set.phones().count(), 0);
        assert_eq!(set.masked_phones().collect::<Vec<_>>(), vec!["+977-XXXXXXXXXX"]);
    }

    #[test]
    fn test_tel_link() {
        let set = contacts(r#"<a href="tel:%2B1%20555%20010%209999">Call</a>"#);
        assert_eq!(set.phones().collect::<Vec<_>>(), vec!["+1 555 010 9999"]);
    }

    #[test]
    fn test_cloudflare_span_and_href() {
        let span = encode_cloudflare("hello@example.org", 0x42);
        let href = encode_cloudflare("jobs@example.org", 0x17);
        let set = contacts(&format!(
            r#"<span class="__cf_email__" data-cfemail="{span}">[email&#160;protected]</span>
               <a href="/cdn-cgi/l/email-protection#{href}">Mail</a>"#
        ));

        assert!(set.emails().contains("hello@example.org"));
        assert!(set.emails().contains("jobs@example.org"));
        assert!(set.synthetic_emails().is_empty());
    }

    #[test]
    fn test_undecodable_payload_yields_synthetic() {
        let set = contacts(r#"<span data-cfemail="zz-not-hex">[email protected]</span>"#);
        assert!(set.emails().is_empty());
        let synthetic: Vec<&str> = set.synthetic_emails().iter().map(String::as_str).collect();
        assert_eq!(synthetic, vec!["info@example.com"]);
    }

    #[test]
    fn test_synthetic_disabled() {
        let config = ExtractionConfig {
            synthetic_emails: false,
            ..ExtractionConfig::default()
        };
        let extractor = ContactExtractor::new(&config).unwrap();
        let document = Html::parse_document(r#"<span data-cfemail="zz"></span>"#);
        assert!(extractor.extract(&document, &page_url()).is_empty());
    }

    #[test]
    fn test_data_attributes() {
        let set = contacts(
            r#"<span data-email="jane [at] example [dot] com"></span>
               <span data-user="hr" data-domain="example.com"></span>
               <span data-phone="+44 20 7946 0958"></span>"#,
        );
        assert!(set.emails().contains("jane@example.com"));
        assert!(set.emails().contains("hr@example.com"));
        assert_eq!(set.phones().collect::<Vec<_>>(), vec!["+44 20 7946 0958"]);
    }

    struct Rot1Decoder;

    impl EmailDecoder for Rot1Decoder {
        fn decode(&self, payload: &str) -> Result<String, DecodeError> {
            Ok(payload
                .chars()
                .map(|c| if c == '@' || c == '.' { c } else { ((c as u8) - 1) as char })
                .collect())
        }
    }

    #[test]
    fn test_custom_decoder() {
        let extractor = extractor().with_decoder(Rot1Decoder);
        let document = Html::parse_document(r#"<span data-cfemail="kbof@fybnqmf.dpn"></span>"#);
        let candidates = extractor.extract(&document, &page_url());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].value, "jane@example.com");
        assert_eq!(candidates[0].confidence, Confidence::Decoded);
    }
}
