use crate::url::is_document_url;
use crate::UrlError;
use url::Url;

/// List of tracking query parameters to remove during normalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
];

/// Normalizes a seed URL into the root of a crawl
///
/// # Normalization Steps
///
/// 1. Trim whitespace; prepend `https://` when no scheme is present
/// 2. Normalize like any other link (see [`normalize_url`])
/// 3. If the path names a document (`.pdf`, `.doc`, ...), replace the whole
///    URL with the site homepage, since a document cannot be crawled as HTML
///
/// # Examples
///
/// ```
/// use contact_ripple::url::normalize_seed;
///
/// let root = normalize_seed("https://example.com/files/cv.pdf").unwrap();
/// assert_eq!(root.as_str(), "https://example.com/");
///
/// let root = normalize_seed("example.com/about#me").unwrap();
/// assert_eq!(root.as_str(), "https://example.com/about");
/// ```
pub fn normalize_seed(raw: &str) -> Result<Url, UrlError> {
    let url = parse_seed(raw)?;

    if is_document_url(&url) {
        return Ok(homepage(&url));
    }

    Ok(url)
}

/// Returns the document a seed points at, if it names one
///
/// ```
/// use contact_ripple::url::seed_document;
///
/// let doc = seed_document("example.com/files/cv.pdf").unwrap();
/// assert_eq!(doc.as_str(), "https://example.com/files/cv.pdf");
/// assert!(seed_document("https://example.com/about").is_none());
/// ```
pub fn seed_document(raw: &str) -> Option<Url> {
    parse_seed(raw).ok().filter(is_document_url)
}

fn parse_seed(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    normalize_url(&with_scheme)
}

/// Normalizes a URL string
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only HTTP and HTTPS
/// 3. Require a host
/// 4. Collapse repeated slashes in the path (empty path becomes /)
/// 5. Remove fragment (everything after #)
/// 6. Remove tracking query parameters and sort the rest
///
/// # Examples
///
/// ```
/// use contact_ripple::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.COM//page//#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page/");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(url)
}

/// Applies the normalization rules to an already-parsed URL
pub fn canonicalize(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if url.query().is_some() {
        let filtered_params = filter_and_sort_query_params(&url);

        if filtered_params.is_empty() {
            url.set_query(None);
        } else {
            let query_string = filtered_params
                .iter()
                .map(|(k, v)| {
                    if v.is_empty() {
                        k.clone()
                    } else {
                        format!("{}={}", k, v)
                    }
                })
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&query_string));
        }
    }

    Ok(url)
}

/// Returns the scheme + host (+ port) root of a URL
pub fn homepage(url: &Url) -> Url {
    let mut home = url.clone();
    home.set_path("/");
    home.set_query(None);
    home.set_fragment(None);
    home
}

/// Collapses runs of slashes into one; a trailing slash is kept
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut result = String::with_capacity(path.len());
    let mut previous_slash = false;

    for c in path.chars() {
        if c == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        result.push(c);
    }

    if !result.starts_with('/') {
        result.insert(0, '/');
    }

    result
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
