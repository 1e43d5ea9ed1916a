//! Link extraction from fetched HTML

use crate::url::normalize_url;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts the followable links of an HTML page
///
/// Links are resolved against the page URL (or its `<base href>`),
/// normalized with [`normalize_url`], and deduplicated in document order.
///
/// **Skipped:** `<a download>`, fragment-only anchors, and anything that does
/// not resolve to an HTTP(S) URL (`javascript:`, `mailto:`, `tel:`, `data:`).
///
/// # Example
///
/// ```
/// use crawl_frontier::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/a">A</a><a href="/a#top">A again</a><a href="mailto:x@y.z">mail</a>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &base);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/a");
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let base = document_base(&document, page_url);

    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&anchors)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, &base))
        .filter(|url| seen.insert(url.as_str().to_string()))
        .collect()
}

fn document_base(document: &Html, page_url: &Url) -> Url {
    Selector::parse("base[href]")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|element| element.value().attr("href"))
                .and_then(|href| page_url.join(href.trim()).ok())
        })
        .unwrap_or_else(|| page_url.clone())
}

fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute = base.join(href).ok()?;
    normalize_url(absolute.as_str()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/dir/page").unwrap()
    }

    fn links(html: &str) -> Vec<String> {
        extract_links(html, &base_url())
            .into_iter()
            .map(|u| u.to_string())
            .collect()
    }

    #[test]
    fn test_absolute_and_relative_links() {
        let html = r#"<body>
            <a href="https://other.com/page">Abs</a>
            <a href="/root">Root</a>
            <a href="sibling">Sibling</a>
        </body>"#;
        assert_eq!(
            links(html),
            vec![
                "https://other.com/page",
                "https://example.com/root",
                "https://example.com/dir/sibling"
            ]
        );
    }

    #[test]
    fn test_skips_non_http_schemes() {
        let html = r#"
            <a href="javascript:void(0)">js</a>
            <a href="mailto:test@example.com">mail</a>
            <a href="tel:+1234567890">tel</a>
            <a href="data:text/html,hi">data</a>
            <a href="ftp://example.com/file">ftp</a>
        "#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_skips_download_and_fragment_only() {
        let html = r##"<a href="/file.pdf" download>dl</a><a href="#section">jump</a>"##;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_dedups_after_normalization() {
        let html = r#"
            <a href="/a">1</a>
            <a href="/a#frag">2</a>
            <a href="/a?utm_source=mail">3</a>
            <a href="/b">4</a>
        "#;
        assert_eq!(
            links(html),
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[test]
    fn test_respects_base_href() {
        let html = r#"<head><base href="https://cdn.example.com/root/"></head>
            <body><a href="x">x</a></body>"#;
        assert_eq!(links(html), vec!["https://cdn.example.com/root/x"]);
    }
}
