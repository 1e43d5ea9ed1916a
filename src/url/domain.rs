use url::Url;

/// Extracts the politeness domain of a URL
///
/// The domain is the lowercase host, followed by `:port` when the URL carries
/// an explicit non-default port. Two servers on one host but different ports
/// are paced and robots-checked independently.
///
/// # Returns
///
/// * `Some(String)` - The domain key
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use crawl_frontier::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Builds the robots.txt location for the origin serving `url`
///
/// ```
/// use url::Url;
/// use crawl_frontier::url::robots_url;
///
/// let url = Url::parse("https://example.com/a/b?q=1").unwrap();
/// assert_eq!(robots_url(&url).unwrap().as_str(), "https://example.com/robots.txt");
/// ```
pub fn robots_url(url: &Url) -> Option<Url> {
    url.host_str()?;
    url.join("/robots.txt").ok()
}
