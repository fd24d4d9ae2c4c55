//! URL handling module for Contact-Ripple
//!
//! This module provides seed and link normalization, same-site scoping, and
//! classification of URLs by the resource type their path names.

mod domain;
mod normalize;

use url::Url;

// Re-export main functions
pub use domain::{base_host, extract_domain, is_same_site};
pub use normalize::{canonicalize, homepage, normalize_seed, normalize_url, seed_document};

/// Extensions of document files a candidate might link to (CVs, resumes)
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "rtf", "odt"];

/// Extensions of non-document resources that are never crawled
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "svg", "webp", "bmp", "ico", "tif", "tiff", "css", "js",
    "mjs", "map", "json", "xml", "woff", "woff2", "ttf", "otf", "eot", "mp3", "mp4", "webm",
    "avi", "mov", "wav", "zip", "gz", "tar", "rar", "7z", "exe", "dmg",
];

/// Returns the lowercase extension of the last path segment, if any
///
/// ```
/// use url::Url;
/// use contact_ripple::url::path_extension;
///
/// let url = Url::parse("https://example.com/img/Logo.PNG?v=2").unwrap();
/// assert_eq!(path_extension(&url), Some("png".to_string()));
/// ```
pub fn path_extension(url: &Url) -> Option<String> {
    let segment = url.path().rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Returns true if the URL points at a document file (`.pdf`, `.docx`, ...)
pub fn is_document_url(url: &Url) -> bool {
    path_extension(url).is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext.as_str()))
}

/// Returns true if the URL points at a resource that must not be crawled
///
/// Documents are excluded too: they are reported as resume links, not parsed.
pub fn has_excluded_extension(url: &Url) -> bool {
    path_extension(url).is_some_and(|ext| {
        EXCLUDED_EXTENSIONS.contains(&ext.as_str()) || DOCUMENT_EXTENSIONS.contains(&ext.as_str())
    })
}
