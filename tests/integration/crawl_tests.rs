//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the worker
//! pool end-to-end against the frontier scheduler.

use crawl_frontier::config::{
    Config, FrontierConfig, RobotsConfig, UserAgentConfig, WorkerConfig,
};
use crawl_frontier::crawler::{run_crawl, CrawlSummary};
use crawl_frontier::QueueKeying;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from `seeds`
fn create_test_config(seeds: Vec<String>, page_limit: u64, depth_limit: u32) -> Config {
    Config {
        scheduler: FrontierConfig {
            page_limit,
            depth_limit,
            politeness_interval_secs: 0,
            queue_keying: QueueKeying::Url,
            seeds,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        robots: RobotsConfig::default(),
        workers: WorkerConfig {
            count: 2,
            request_timeout_secs: 5,
            idle_backoff_ms: 10,
        },
    }
}

fn html_page(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: &str, links: &[&str], expected_hits: u64) {
    let base_url = server.uri();
    let body: String = links
        .iter()
        .map(|link| format!(r#"<a href="{}{}">{}</a>"#, base_url, link, link))
        .collect();

    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html_page(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_respects_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", &["/page1", "/page2"], 1).await;
    mount_page(&mock_server, "/page1", &["/page3", "/"], 1).await;
    mount_page(&mock_server, "/page2", &["/page1"], 1).await;
    // Depth 2 is at the limit and never queued
    mount_page(&mock_server, "/page3", &[], 0).await;

    let config = create_test_config(vec![format!("{}/", base_url)], 100, 2);
    let summary = run_crawl(config).await.expect("crawl should succeed");

    assert_eq!(
        summary,
        CrawlSummary {
            fetched: 3,
            failed: 0,
            denied: 0,
            discovered: 3,
            pending: 0,
        }
    );
}

#[tokio::test]
async fn test_crawl_skips_disallowed_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private\n").await;
    mount_page(&mock_server, "/", &["/public", "/private/secret"], 1).await;
    mount_page(&mock_server, "/public", &[], 1).await;
    mount_page(&mock_server, "/private/secret", &[], 0).await;

    let config = create_test_config(vec![format!("{}/", base_url)], 100, 3);
    let summary = run_crawl(config).await.expect("crawl should succeed");

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.denied, 1);
    assert_eq!(summary.discovered, 3);
}

#[tokio::test]
async fn test_robots_failure_denies_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", &[], 0).await;

    let config = create_test_config(vec![format!("{}/", base_url)], 100, 3);
    let summary = run_crawl(config).await.expect("crawl should succeed");

    assert_eq!(summary.fetched, 0);
    assert_eq!(summary.denied, 1);
}

#[tokio::test]
async fn test_missing_robots_allows_everything() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", &["/a"], 1).await;
    mount_page(&mock_server, "/a", &[], 1).await;

    let config = create_test_config(vec![format!("{}/", base_url)], 100, 3);
    let summary = run_crawl(config).await.expect("crawl should succeed");

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.denied, 0);
}

#[tokio::test]
async fn test_page_limit_stops_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", &["/a", "/b", "/c", "/d"], 1).await;
    mount_page(&mock_server, "/a", &[], 1).await;
    for page in ["/b", "/c", "/d"] {
        mount_page(&mock_server, page, &[], 0).await;
    }

    // A single worker makes the stopping point deterministic: the crawl is
    // done once the recorded count exceeds the limit
    let mut config = create_test_config(vec![format!("{}/", base_url)], 1, 3);
    config.workers.count = 1;
    let summary = run_crawl(config).await.expect("crawl should succeed");

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.pending, 3);
}

#[tokio::test]
async fn test_page_limit_holds_with_many_workers() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    let children: Vec<String> = (0..8).map(|i| format!("/child{}", i)).collect();
    let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();
    mount_page(&mock_server, "/", &child_refs, 1).await;
    // Slow responses keep several workers mid-fetch at the same time
    Mock::given(method("GET"))
        .and(path_regex(r"^/child\d$"))
        .respond_with(html_page(String::new()).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(vec![format!("{}/", base_url)], 1, 3);
    config.workers.count = 4;
    let summary = run_crawl(config).await.expect("crawl should succeed");

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.pending, 7);
}

#[tokio::test]
async fn test_http_errors_are_not_counted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", &["/missing", "/ok"], 1).await;
    mount_page(&mock_server, "/ok", &[], 1).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/", base_url)], 100, 3);
    let summary = run_crawl(config).await.expect("crawl should succeed");

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.failed, 1);
}

#[tokio::test]
async fn test_politeness_interval_spaces_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", &["/next"], 1).await;
    mount_page(&mock_server, "/next", &[], 1).await;

    let mut config = create_test_config(vec![format!("{}/", base_url)], 100, 3);
    config.scheduler.politeness_interval_secs = 1;

    let start = Instant::now();
    let summary = run_crawl(config).await.expect("crawl should succeed");

    assert_eq!(summary.fetched, 2);
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    let config = create_test_config(vec!["ftp://example.com/".to_string()], 10, 3);
    assert!(run_crawl(config).await.is_err());
}
