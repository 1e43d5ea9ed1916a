use crate::scheduler::QueueKeying;
use serde::Deserialize;

/// Main configuration structure for Crawl-Frontier
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scheduler: FrontierConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub robots: RobotsConfig,
    #[serde(default)]
    pub workers: WorkerConfig,
}

/// Frontier limits and dispatch behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct FrontierConfig {
    /// Number of fetched pages after which the crawl is finished
    #[serde(rename = "page-limit")]
    pub page_limit: u64,

    /// Links at this depth or deeper are never queued
    #[serde(rename = "depth-limit")]
    pub depth_limit: u32,

    /// Minimum time between two dispatches to the same domain (seconds)
    #[serde(
        rename = "politeness-interval-secs",
        default = "default_politeness_interval_secs"
    )]
    pub politeness_interval_secs: u64,

    /// How frontier entries are grouped into queue keys
    #[serde(rename = "queue-keying", default)]
    pub queue_keying: QueueKeying,

    /// Seed URLs, queued at depth 0 in order
    pub seeds: Vec<String>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the token matched against robots.txt groups
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Full `User-Agent` header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Robots.txt cache behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct RobotsConfig {
    /// Age after which a cached robots.txt is fetched again (hours)
    #[serde(rename = "cache-ttl-hours", default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// How long a failed robots.txt lookup keeps denying before a retry (seconds)
    #[serde(rename = "failure-retry-secs", default = "default_failure_retry_secs")]
    pub failure_retry_secs: u64,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_hours: default_cache_ttl_hours(),
            failure_retry_secs: default_failure_retry_secs(),
        }
    }
}

/// Worker pool configuration for the bundled crawl driver
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    /// Number of concurrent worker tasks
    #[serde(default = "default_worker_count")]
    pub count: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Sleep used when the frontier has nothing ready and no cooldown hint exists (milliseconds)
    #[serde(rename = "idle-backoff-ms", default = "default_idle_backoff_ms")]
    pub idle_backoff_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            count: default_worker_count(),
            request_timeout_secs: default_request_timeout_secs(),
            idle_backoff_ms: default_idle_backoff_ms(),
        }
    }
}

/// Default politeness interval between requests to one domain, in seconds
pub const TIME_LIMIT_BETWEEN_REQUESTS: u64 = 20;

fn default_politeness_interval_secs() -> u64 {
    TIME_LIMIT_BETWEEN_REQUESTS
}

fn default_cache_ttl_hours() -> u64 {
    24
}

fn default_failure_retry_secs() -> u64 {
    300
}

fn default_worker_count() -> u32 {
    4
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_idle_backoff_ms() -> u64 {
    250
}
