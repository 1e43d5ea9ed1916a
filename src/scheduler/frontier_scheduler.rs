//! The shared scheduler workers pull from and feed into

use crate::robots::{CachedRobots, RobotsProvider};
use crate::scheduler::frontier::{Frontier, PendingEntry};
use crate::scheduler::{QueueKeying, SchedulerConfig};
use crate::state::DomainState;
use crate::url::{extract_domain, robots_url};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use url::Url;

/// Snapshot of scheduler counters for progress reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Entries waiting in the frontier
    pub pending: usize,

    /// URLs ever accepted
    pub discovered: usize,

    /// Fetches recorded with `record_fetch`
    pub pages_fetched: u64,

    /// Domains the scheduler holds state for
    pub domains_seen: usize,
}

/// Everything guarded by the scheduler lock
struct FrontierState {
    frontier: Frontier,
    discovered: HashSet<String>,
    domains: HashMap<String, DomainState>,
    page_count: u64,
    robots_flights: HashMap<String, Arc<tokio::sync::Mutex<()>>>,
}

/// Frontier scheduler shared by all crawl workers
///
/// All bookkeeping sits behind one mutex held for the whole of each call, so
/// every operation is atomic with respect to the others. Nothing here blocks
/// waiting for work: `next_url` answers `None` right away and the caller owns
/// the retry policy. Robots.txt lookups in [`can_fetch`](Self::can_fetch) run
/// outside the lock.
pub struct FrontierScheduler {
    config: SchedulerConfig,
    state: Mutex<FrontierState>,
    robots: Arc<dyn RobotsProvider>,
}

impl FrontierScheduler {
    /// Creates a scheduler and queues `seeds` at depth 0, in order
    ///
    /// Seeds are subject to the usual acceptance rules, so duplicates are
    /// dropped and a depth limit of 0 rejects them all.
    pub fn new<I>(config: SchedulerConfig, seeds: I, robots: Arc<dyn RobotsProvider>) -> Self
    where
        I: IntoIterator<Item = Url>,
    {
        let scheduler = Self {
            state: Mutex::new(FrontierState {
                frontier: Frontier::new(config.queue_keying),
                discovered: HashSet::new(),
                domains: HashMap::new(),
                page_count: 0,
                robots_flights: HashMap::new(),
            }),
            config,
            robots,
        };

        let mut accepted = 0usize;
        for seed in seeds {
            if scheduler.add_page(seed.clone(), 0) {
                accepted += 1;
            } else {
                tracing::warn!("Seed {} was not accepted into the frontier", seed);
            }
        }
        tracing::info!("Frontier seeded with {} URLs", accepted);

        scheduler
    }

    /// Settings this scheduler runs with
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        // Every mutation leaves the state consistent, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Offers a discovered link to the frontier
    ///
    /// Returns `false` without side effects when `depth` reaches the depth
    /// limit, when the URL was accepted before, when its queue key is already
    /// pending, or when the URL has no host. Otherwise the URL is queued at
    /// the end of the frontier, recorded as discovered, and `true` is returned.
    pub fn add_page(&self, url: Url, depth: u32) -> bool {
        let mut state = self.lock();
        if !self.accepts(&state, &url, depth) {
            tracing::trace!("Rejected {} at depth {}", url, depth);
            return false;
        }

        let rendered = url.as_str().to_string();
        if !state.frontier.push(PendingEntry::new(url, depth)) {
            return false;
        }
        tracing::debug!("Queued {} at depth {}", rendered, depth);
        state.discovered.insert(rendered);
        true
    }

    /// Whether [`add_page`](Self::add_page) would accept `url` at `depth`
    ///
    /// Pure predicate; callers use it to pre-filter extracted links.
    pub fn can_add_page(&self, url: &Url, depth: u32) -> bool {
        let state = self.lock();
        self.accepts(&state, url, depth)
    }

    fn accepts(&self, state: &FrontierState, url: &Url, depth: u32) -> bool {
        if depth >= self.config.depth_limit {
            return false;
        }
        let Some(key) = state.frontier.key_for(url) else {
            return false;
        };
        if state.discovered.contains(url.as_str()) {
            return false;
        }
        // Under URL keying the key is the URL itself and is already covered
        // by the discovered set; under domain keying a pending domain is fine.
        match state.frontier.keying() {
            QueueKeying::Url => !state.frontier.contains_key(&key),
            QueueKeying::Domain => true,
        }
    }

    /// Takes the next URL to fetch
    ///
    /// Scans the frontier in key order and dispatches the first entry whose
    /// domain is outside its politeness interval; that domain's dispatch time
    /// is stamped. `None` means nothing can be dispatched right now, either
    /// because the frontier is empty or because every pending domain is
    /// cooling down (see [`time_until_ready`](Self::time_until_ready)). It
    /// does not mean the crawl is finished.
    pub fn next_url(&self) -> Option<PendingEntry> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let now = Instant::now();
        let base = self.config.politeness_interval;
        let user_agent = self.config.user_agent.as_str();
        let domains = &state.domains;

        let entry = state.frontier.pop_next(|entry| {
            entry
                .domain()
                .and_then(|domain| domains.get(&domain))
                .map_or(true, |ds| ds.can_request(ds.effective_interval(base, user_agent), now))
        })?;

        if let Some(domain) = entry.domain() {
            state.domains.entry(domain).or_default().record_request(now);
        }
        tracing::debug!("Dispatching {} (depth {})", entry.url, entry.depth);
        Some(entry)
    }

    /// Accounts for one successfully fetched page
    pub fn record_fetch(&self) {
        let mut state = self.lock();
        state.page_count += 1;
        tracing::trace!("Recorded fetch #{}", state.page_count);
    }

    /// Whether the page budget is exhausted
    ///
    /// True once the recorded fetch count exceeds the page limit, so
    /// `page_limit + 1` fetches are recorded before the crawl stops.
    pub fn is_done(&self) -> bool {
        self.lock().page_count > self.config.page_limit
    }

    /// Number of fetches recorded so far
    pub fn page_count(&self) -> u64 {
        self.lock().page_count
    }

    /// Gives back the politeness slot taken when `url` was dispatched
    ///
    /// For a dispatched URL that was never fetched, such as one robots.txt
    /// denied: the domain's pacing goes back to its previous dispatch. Returns
    /// `false` when there is nothing to release.
    pub fn release_dispatch(&self, url: &Url) -> bool {
        let Some(domain) = extract_domain(url) else {
            return false;
        };
        let released = self
            .lock()
            .domains
            .get_mut(&domain)
            .map_or(false, DomainState::release_request);
        if released {
            tracing::trace!("Released dispatch slot of {}", domain);
        }
        released
    }

    /// Asks the robots.txt rules of `url`'s origin whether it may be fetched
    ///
    /// The rules are fetched through the [`RobotsProvider`] on first use and
    /// cached per origin (scheme and domain) until they expire. The provider
    /// call happens outside the scheduler lock; concurrent checks for one
    /// origin wait for a single lookup while other origins proceed. A failed
    /// lookup denies, and keeps denying until its failure entry expires. URLs
    /// without a host are denied.
    pub async fn can_fetch(&self, url: &Url) -> bool {
        let Some(domain) = extract_domain(url) else {
            return false;
        };
        let scheme = url.scheme();

        let flight = {
            let mut state = self.lock();
            if let Some(allowed) = self.cached_permission(&state, &domain, url) {
                return allowed;
            }
            state
                .robots_flights
                .entry(format!("{}://{}", scheme, domain))
                .or_default()
                .clone()
        };

        let _in_flight = flight.lock().await;

        // Another worker may have filled the cache while this one waited
        {
            let state = self.lock();
            if let Some(allowed) = self.cached_permission(&state, &domain, url) {
                return allowed;
            }
        }

        let Some(location) = robots_url(url) else {
            return false;
        };

        tracing::debug!("Fetching robots.txt for {} from {}", domain, location);
        let cached = match self.robots.fetch_robots(&location).await {
            Ok(rules) => CachedRobots::new(rules, self.config.robots_cache_ttl),
            Err(e) => {
                tracing::warn!("robots.txt unavailable for {}, denying: {}", domain, e);
                CachedRobots::failure(self.config.robots_failure_retry)
            }
        };

        let allowed = cached.is_allowed(url.as_str(), &self.config.user_agent);
        self.lock()
            .domains
            .entry(domain)
            .or_default()
            .update_robots(scheme, cached);
        allowed
    }

    fn cached_permission(&self, state: &FrontierState, domain: &str, url: &Url) -> Option<bool> {
        state
            .domains
            .get(domain)
            .and_then(|ds| ds.fresh_robots(url.scheme()))
            .map(|cached| cached.is_allowed(url.as_str(), &self.config.user_agent))
    }

    /// Politeness check alone: whether `url`'s domain may be contacted now
    pub fn can_fetch_now(&self, url: &Url) -> bool {
        let Some(domain) = extract_domain(url) else {
            return false;
        };
        let state = self.lock();
        state.domains.get(&domain).map_or(true, |ds| {
            ds.can_request(self.domain_interval(ds), Instant::now())
        })
    }

    /// How long until some pending entry becomes dispatchable
    ///
    /// `None` when the frontier is empty, `Some(Duration::ZERO)` when an
    /// entry is ready now, otherwise the shortest remaining cooldown.
    pub fn time_until_ready(&self) -> Option<Duration> {
        let state = self.lock();
        let now = Instant::now();
        state
            .frontier
            .heads()
            .map(|entry| {
                entry
                    .domain()
                    .and_then(|domain| state.domains.get(&domain))
                    .and_then(|ds| ds.time_until_next_request(self.domain_interval(ds), now))
                    .unwrap_or(Duration::ZERO)
            })
            .min()
    }

    fn domain_interval(&self, domain: &DomainState) -> Duration {
        domain.effective_interval(self.config.politeness_interval, &self.config.user_agent)
    }

    /// Whether `url` was ever accepted into the frontier
    pub fn is_discovered(&self, url: &Url) -> bool {
        self.lock().discovered.contains(url.as_str())
    }

    /// Number of entries waiting in the frontier
    pub fn pending(&self) -> usize {
        self.lock().frontier.len()
    }

    /// Current counters
    pub fn stats(&self) -> SchedulerStats {
        let state = self.lock();
        SchedulerStats {
            pending: state.frontier.len(),
            discovered: state.discovered.len(),
            pages_fetched: state.page_count,
            domains_seen: state.domains.len(),
        }
    }
}

impl fmt::Debug for FrontierScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrontierScheduler")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
