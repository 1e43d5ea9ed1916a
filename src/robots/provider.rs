//! Sources of robots.txt rules

use crate::robots::ParsedRobots;
use crate::CrawlError;
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// Supplies the robots.txt ruleset of a domain
///
/// The scheduler only caches what a provider returns; how the rules are
/// obtained is up to the implementation. An `Err` is treated as "permission
/// unknown" and makes the scheduler deny fetches for that domain until the
/// failure entry expires.
#[async_trait]
pub trait RobotsProvider: Send + Sync {
    /// Obtains the rules published at `robots_url`
    async fn fetch_robots(&self, robots_url: &Url) -> Result<ParsedRobots, CrawlError>;
}

/// Fetches robots.txt over HTTP
///
/// | Response | Outcome |
/// |----------|---------|
/// | 2xx | body parsed |
/// | 4xx | allow all (no robots.txt published) |
/// | 5xx, network error | `Err` |
#[derive(Debug, Clone)]
pub struct HttpRobotsProvider {
    client: Client,
}

impl HttpRobotsProvider {
    /// Creates a provider sharing the crawler's HTTP client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RobotsProvider for HttpRobotsProvider {
    async fn fetch_robots(&self, robots_url: &Url) -> Result<ParsedRobots, CrawlError> {
        let response = self
            .client
            .get(robots_url.clone())
            .send()
            .await
            .map_err(|source| CrawlError::Http {
                url: robots_url.to_string(),
                source,
            })?;

        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(|source| CrawlError::Http {
                url: robots_url.to_string(),
                source,
            })?;
            return Ok(ParsedRobots::from_content(&body));
        }

        if status.is_client_error() {
            tracing::debug!("No robots.txt at {} (HTTP {}), allowing all", robots_url, status);
            return Ok(ParsedRobots::allow_all());
        }

        Err(CrawlError::Status {
            url: robots_url.to_string(),
            status: status.as_u16(),
        })
    }
}
