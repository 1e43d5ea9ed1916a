//! Crawl driver: a pool of tokio workers sharing one frontier scheduler
//!
//! Each worker repeats the same cycle until the page budget is spent or the
//! frontier is drained: take the next dispatchable URL, check robots.txt,
//! fetch, record the fetch and feed discovered links back into the frontier.
//! Workers never sleep while holding the scheduler lock.

use crate::config::{Config, WorkerConfig};
use crate::crawler::{build_http_client, extract_links, fetch_url, FetchResult};
use crate::robots::HttpRobotsProvider;
use crate::scheduler::{FrontierScheduler, PendingEntry, SchedulerConfig};
use crate::url::normalize_url;
use crate::CrawlError;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of a finished crawl
///
/// `fetched` never exceeds `page_limit + 1`: workers reserve a slot of that
/// budget before taking a URL and give it back when the URL is not fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Fetches recorded against the page budget
    pub fetched: u64,
    /// Fetches that ended in an HTTP or network error
    pub failed: u64,
    /// URLs skipped because robots.txt denied them
    pub denied: u64,
    /// Distinct URLs ever accepted into the frontier
    pub discovered: usize,
    /// Entries still waiting when the crawl stopped
    pub pending: usize,
}

/// A worker pool bound to a scheduler and an HTTP client
pub struct Crawler {
    scheduler: Arc<FrontierScheduler>,
    client: Client,
    worker_count: usize,
    idle_backoff: Duration,
}

impl Crawler {
    /// Creates a crawler around an existing scheduler
    pub fn new(scheduler: Arc<FrontierScheduler>, client: Client, workers: &WorkerConfig) -> Self {
        Self {
            scheduler,
            client,
            worker_count: workers.count.max(1) as usize,
            idle_backoff: Duration::from_millis(workers.idle_backoff_ms.max(1)),
        }
    }

    /// Builds the client, robots provider and seeded scheduler from a configuration
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.user_agent, config.workers.request_timeout_secs)?;

        let seeds = config
            .scheduler
            .seeds
            .iter()
            .map(|seed| normalize_url(seed))
            .collect::<Result<Vec<_>, _>>()?;

        let robots = Arc::new(HttpRobotsProvider::new(client.clone()));
        let scheduler = FrontierScheduler::new(SchedulerConfig::from_config(config), seeds, robots);

        Ok(Self::new(Arc::new(scheduler), client, &config.workers))
    }

    /// The scheduler this crawler drives
    pub fn scheduler(&self) -> &Arc<FrontierScheduler> {
        &self.scheduler
    }

    /// Runs the workers to completion
    pub async fn run(&self) -> Result<CrawlSummary, CrawlError> {
        let start_time = Instant::now();
        let shared = Arc::new(Shared {
            scheduler: Arc::clone(&self.scheduler),
            client: self.client.clone(),
            idle_backoff: self.idle_backoff,
            budget: self.scheduler.config().page_limit.saturating_add(1),
            reserved: AtomicU64::new(self.scheduler.page_count()),
            in_flight: AtomicUsize::new(0),
            failed: AtomicU64::new(0),
            denied: AtomicU64::new(0),
        });

        tracing::info!(
            "Starting crawl with {} workers, {} seed(s) pending",
            self.worker_count,
            self.scheduler.pending()
        );

        let handles: Vec<_> = (0..self.worker_count)
            .map(|id| tokio::spawn(worker_loop(id, Arc::clone(&shared))))
            .collect();

        for handle in handles {
            handle
                .await
                .map_err(|e| CrawlError::Worker(e.to_string()))?;
        }

        let stats = self.scheduler.stats();
        let summary = CrawlSummary {
            fetched: stats.pages_fetched,
            failed: shared.failed.load(Ordering::Relaxed),
            denied: shared.denied.load(Ordering::Relaxed),
            discovered: stats.discovered,
            pending: stats.pending,
        };

        tracing::info!(
            "Crawl finished in {:?}: {} fetched, {} failed, {} denied, {} discovered, {} left pending",
            start_time.elapsed(),
            summary.fetched,
            summary.failed,
            summary.denied,
            summary.discovered,
            summary.pending
        );
        Ok(summary)
    }
}

/// Builds a crawler from `config` and runs it
pub async fn run_crawl(config: Config) -> Result<CrawlSummary, CrawlError> {
    Crawler::from_config(&config)?.run().await
}

struct Shared {
    scheduler: Arc<FrontierScheduler>,
    client: Client,
    idle_backoff: Duration,
    /// Fetches the scheduler records before `is_done` turns true
    budget: u64,
    /// Recorded fetches plus fetches in progress
    reserved: AtomicU64,
    /// Workers holding a dispatched entry, plus those about to ask for one
    in_flight: AtomicUsize,
    failed: AtomicU64,
    denied: AtomicU64,
}

impl Shared {
    fn try_reserve(&self) -> bool {
        self.reserved
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |reserved| {
                (reserved < self.budget).then_some(reserved + 1)
            })
            .is_ok()
    }

    fn release(&self) {
        self.reserved.fetch_sub(1, Ordering::SeqCst);
    }
}

async fn worker_loop(id: usize, shared: Arc<Shared>) {
    let scheduler = &shared.scheduler;
    tracing::debug!("Worker {} started", id);

    loop {
        if scheduler.is_done() {
            tracing::debug!("Worker {} stopping: page limit reached", id);
            break;
        }

        // Every slot is held by a fetch in progress; one of them may fail
        // and hand its slot back.
        if !shared.try_reserve() {
            tokio::time::sleep(shared.idle_backoff).await;
            continue;
        }

        // Counted before asking so an idle peer cannot see an empty frontier
        // while this worker holds an entry it has not yet processed.
        shared.in_flight.fetch_add(1, Ordering::SeqCst);
        let Some(entry) = scheduler.next_url() else {
            shared.release();
            let busy = shared.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            if busy == 0 && scheduler.pending() == 0 {
                tracing::debug!("Worker {} stopping: frontier drained", id);
                break;
            }

            let wait = scheduler
                .time_until_ready()
                .unwrap_or(shared.idle_backoff)
                .min(shared.idle_backoff);
            if wait.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(wait).await;
            }
            continue;
        };

        process_entry(id, &shared, entry).await;
        shared.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

async fn process_entry(id: usize, shared: &Shared, entry: PendingEntry) {
    let scheduler = &shared.scheduler;
    let url = &entry.url;

    if !scheduler.can_fetch(url).await {
        tracing::info!("{} disallowed by robots.txt", url);
        shared.denied.fetch_add(1, Ordering::Relaxed);
        shared.release();
        // Nothing was sent, so the domain's pacing is not charged
        scheduler.release_dispatch(url);
        return;
    }

    let result = fetch_url(&shared.client, url).await;
    if result.is_fetched() {
        scheduler.record_fetch();
    } else {
        shared.release();
    }

    match result {
        FetchResult::Success {
            final_url, body, ..
        } => {
            let next_depth = entry.depth.saturating_add(1);
            let added = extract_links(&body, &final_url)
                .into_iter()
                .filter(|link| scheduler.add_page(link.clone(), next_depth))
                .count();
            tracing::info!(
                "[worker {}] fetched {} (depth {}), {} new link(s)",
                id,
                url,
                entry.depth,
                added
            );
        }
        FetchResult::ContentMismatch { content_type } => {
            tracing::debug!("{} is {}, not following links", url, content_type);
        }
        FetchResult::HttpError { status_code } => {
            shared.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("{} returned HTTP {}", url, status_code);
        }
        FetchResult::NetworkError { error } => {
            shared.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Failed to fetch {}: {}", url, error);
        }
    }

    let fetched = scheduler.page_count();
    if fetched > 0 && fetched % 10 == 0 {
        tracing::info!(
            "Progress: {} pages fetched, {} in frontier",
            fetched,
            scheduler.pending()
        );
    }
}
