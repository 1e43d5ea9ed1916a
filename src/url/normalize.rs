use crate::UrlError;
use url::Url;

/// Query parameters that only carry campaign tracking
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Normalizes a discovered link before it is offered to the frontier
///
/// The frontier deduplicates on the rendered URL string, so links that only
/// differ in fragment or tracking noise must render identically.
///
/// 1. Parse; reject non-HTTP(S) schemes and host-less URLs
/// 2. Drop the fragment
/// 3. Drop `utm_*` and other tracking query parameters, keeping the
///    remaining ones in their original order
/// 4. Remove an empty query string
///
/// Host lowercasing, dot-segment removal and the `/` root path are already
/// applied by [`Url::parse`].
///
/// # Examples
///
/// ```
/// use crawl_frontier::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/a/../b?utm_source=x#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/b");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    Ok(url)
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
