use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use contact_ripple::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the host that scopes a crawl
///
/// Like [`extract_domain`] but with a leading `www.` removed, so that
/// `www.example.com` and `example.com` count as the same site.
///
/// ```
/// use url::Url;
/// use contact_ripple::url::base_host;
///
/// let url = Url::parse("https://www.Example.com/cv").unwrap();
/// assert_eq!(base_host(&url), Some("example.com".to_string()));
/// ```
pub fn base_host(url: &Url) -> Option<String> {
    extract_domain(url).map(|host| match host.strip_prefix("www.") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => host,
    })
}

/// Returns true if `url` lives on the site identified by `site_host`
pub fn is_same_site(url: &Url, site_host: &str) -> bool {
    base_host(url).is_some_and(|host| host == site_host)
}
