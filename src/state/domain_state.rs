use crate::robots::CachedRobots;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Tracks the state of a domain during crawling
///
/// This structure keeps the per-domain information the scheduler needs for
/// pacing and robots.txt caching.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Number of URLs dispatched to workers for this domain
    pub request_count: u32,

    /// When a URL of this domain was last dispatched
    pub last_request_time: Option<Instant>,

    /// Dispatch time before the latest one, held until `release_request`
    /// restores it or the next dispatch replaces it
    previous_request_time: Option<Option<Instant>>,

    /// Cached robots.txt rules keyed by scheme, since robots.txt is per origin
    pub robots: HashMap<String, CachedRobots>,
}

impl DomainState {
    /// Creates a new DomainState with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum spacing between two dispatches to this domain
    ///
    /// The larger of `base` and the largest cached robots.txt `Crawl-delay`
    /// for `user_agent` across the domain's origins.
    pub fn effective_interval(&self, base: Duration, user_agent: &str) -> Duration {
        self.robots
            .values()
            .filter_map(|cached| cached.crawl_delay(user_agent))
            .filter_map(|secs| Duration::try_from_secs_f64(secs).ok())
            .fold(base, Duration::max)
    }

    /// Checks if a request can be made to this domain at `now`
    pub fn can_request(&self, interval: Duration, now: Instant) -> bool {
        self.time_until_next_request(interval, now).is_none()
    }

    /// Records that a URL of this domain was dispatched
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.previous_request_time = Some(self.last_request_time.replace(now));
    }

    /// Undoes the latest `record_request`, for a dispatch that was never fetched
    ///
    /// Only the latest dispatch can be released; a second call is a no-op.
    pub fn release_request(&mut self) -> bool {
        let Some(previous) = self.previous_request_time.take() else {
            return false;
        };
        self.request_count = self.request_count.saturating_sub(1);
        self.last_request_time = previous;
        true
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, interval: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < interval {
            Some(interval - elapsed)
        } else {
            None
        }
    }

    /// Returns the cached robots.txt entry for `scheme` unless it has expired
    pub fn fresh_robots(&self, scheme: &str) -> Option<&CachedRobots> {
        self.robots.get(scheme).filter(|cached| !cached.is_stale())
    }

    /// Replaces the robots.txt cache entry for `scheme`
    pub fn update_robots(&mut self, scheme: &str, robots: CachedRobots) {
        self.robots.insert(scheme.to_string(), robots);
    }
}
