//! Robots.txt cache entries with expiration

use crate::robots::ParsedRobots;
use chrono::{DateTime, Duration, Utc};

/// Cached robots.txt data for a domain
///
/// An entry remembers when it was obtained and how long it may be trusted.
/// Failed lookups are cached as deny-all with a short lifetime so the domain
/// is retried later instead of on every check.
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// The parsed robots.txt content
    pub content: ParsedRobots,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,

    /// How long after `fetched_at` the entry stays fresh
    pub ttl: Duration,

    /// Whether this entry stands in for a failed fetch
    pub failed: bool,
}

impl CachedRobots {
    /// Caches a successfully fetched ruleset
    pub fn new(content: ParsedRobots, ttl: Duration) -> Self {
        Self {
            content,
            fetched_at: Utc::now(),
            ttl,
            failed: false,
        }
    }

    /// Caches a failed lookup as deny-all
    pub fn failure(retry_after: Duration) -> Self {
        Self {
            content: ParsedRobots::disallow_all(),
            fetched_at: Utc::now(),
            ttl: retry_after,
            failed: true,
        }
    }

    /// Checks if the entry is older than its TTL
    pub fn is_stale(&self) -> bool {
        self.age() > self.ttl
    }

    /// Returns the age of the cached entry
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }

    /// Checks if a URL is allowed according to the cached rules
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        self.content.is_allowed(url, user_agent)
    }

    /// Gets the crawl delay from the cached rules
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        self.content.crawl_delay(user_agent)
    }
}
