use crate::config::{Config, TIME_LIMIT_BETWEEN_REQUESTS};
use crate::scheduler::QueueKeying;
use std::time::Duration;

/// Runtime settings of a [`FrontierScheduler`](crate::scheduler::FrontierScheduler)
///
/// Fixed for the lifetime of the scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Product token matched against robots.txt `User-agent` groups
    pub user_agent: String,

    /// The crawl is done once more than this many fetches were recorded
    pub page_limit: u64,

    /// Pages at this depth or deeper are rejected
    pub depth_limit: u32,

    /// Minimum spacing between two dispatches to the same domain
    pub politeness_interval: Duration,

    /// Grouping of frontier entries
    pub queue_keying: QueueKeying,

    /// Lifetime of a fetched robots.txt
    pub robots_cache_ttl: chrono::Duration,

    /// Lifetime of a failed robots.txt lookup
    pub robots_failure_retry: chrono::Duration,
}

impl SchedulerConfig {
    /// Settings with the given identity and limits, defaults elsewhere
    pub fn new(user_agent: impl Into<String>, page_limit: u64, depth_limit: u32) -> Self {
        Self {
            user_agent: user_agent.into(),
            page_limit,
            depth_limit,
            politeness_interval: Duration::from_secs(TIME_LIMIT_BETWEEN_REQUESTS),
            queue_keying: QueueKeying::Url,
            robots_cache_ttl: chrono::Duration::hours(24),
            robots_failure_retry: chrono::Duration::minutes(5),
        }
    }

    /// Builds scheduler settings from a validated configuration file
    pub fn from_config(config: &Config) -> Self {
        Self {
            user_agent: config.user_agent.crawler_name.clone(),
            page_limit: config.scheduler.page_limit,
            depth_limit: config.scheduler.depth_limit,
            politeness_interval: Duration::from_secs(config.scheduler.politeness_interval_secs),
            queue_keying: config.scheduler.queue_keying,
            // Bounds are checked by config validation
            robots_cache_ttl: chrono::Duration::hours(config.robots.cache_ttl_hours as i64),
            robots_failure_retry: chrono::Duration::seconds(config.robots.failure_retry_secs as i64),
        }
    }

    pub fn with_politeness_interval(mut self, interval: Duration) -> Self {
        self.politeness_interval = interval;
        self
    }

    pub fn with_queue_keying(mut self, keying: QueueKeying) -> Self {
        self.queue_keying = keying;
        self
    }

    pub fn with_robots_failure_retry(mut self, retry: chrono::Duration) -> Self {
        self.robots_failure_retry = retry;
        self
    }
}
