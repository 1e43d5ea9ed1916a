//! Integration tests for the frontier scheduler's public API
//!
//! These drive the scheduler the way a worker pool does, including from
//! several threads at once.

use async_trait::async_trait;
use crawl_frontier::robots::{ParsedRobots, RobotsProvider};
use crawl_frontier::{CrawlError, FrontierScheduler, QueueKeying, SchedulerConfig};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use url::Url;

/// Serves the same robots.txt body for every domain
struct FixedRobots(&'static str);

#[async_trait]
impl RobotsProvider for FixedRobots {
    async fn fetch_robots(&self, _robots_url: &Url) -> Result<ParsedRobots, CrawlError> {
        Ok(ParsedRobots::from_content(self.0))
    }
}

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn scheduler(page_limit: u64, depth_limit: u32) -> FrontierScheduler {
    let config = SchedulerConfig::new("TestBot", page_limit, depth_limit)
        .with_politeness_interval(Duration::ZERO);
    FrontierScheduler::new(config, Vec::new(), Arc::new(FixedRobots("")))
}

#[test]
fn test_crawl_lifecycle() {
    let scheduler = scheduler(2, 2);

    assert!(scheduler.add_page(url("https://a.example/"), 0));
    assert!(scheduler.add_page(url("https://a.example/x"), 1));
    assert!(!scheduler.add_page(url("https://a.example/y"), 2));
    assert!(!scheduler.add_page(url("https://a.example/x"), 1));

    let first = scheduler.next_url().unwrap();
    assert_eq!(first.url.as_str(), "https://a.example/");
    assert_eq!(first.depth, 0);
    scheduler.record_fetch();

    let second = scheduler.next_url().unwrap();
    assert_eq!(second.url.as_str(), "https://a.example/x");
    assert_eq!(second.depth, 1);
    scheduler.record_fetch();

    assert!(scheduler.next_url().is_none());
    assert!(!scheduler.is_done());

    // Done only once the count passes the limit
    scheduler.record_fetch();
    assert!(scheduler.is_done());
}

#[test]
fn test_can_add_page_does_not_mutate() {
    let scheduler = scheduler(10, 3);
    let page = url("https://a.example/page");

    assert!(scheduler.can_add_page(&page, 1));
    assert!(scheduler.can_add_page(&page, 1));
    assert_eq!(scheduler.pending(), 0);

    assert!(scheduler.add_page(page.clone(), 1));
    assert!(!scheduler.can_add_page(&page, 1));
}

#[test]
fn test_domain_keying_interleaves_hosts() {
    let config = SchedulerConfig::new("TestBot", 10, 3)
        .with_politeness_interval(Duration::ZERO)
        .with_queue_keying(QueueKeying::Domain);
    let scheduler = FrontierScheduler::new(config, Vec::new(), Arc::new(FixedRobots("")));

    for page in ["https://a.example/1", "https://a.example/2", "https://b.example/1"] {
        assert!(scheduler.add_page(url(page), 0));
    }

    let order: Vec<String> = std::iter::from_fn(|| scheduler.next_url())
        .map(|entry| entry.url.to_string())
        .collect();
    assert_eq!(
        order,
        vec![
            "https://a.example/1",
            "https://b.example/1",
            "https://a.example/2"
        ]
    );
}

#[test]
fn test_concurrent_producers_and_consumers() {
    let scheduler = Arc::new(scheduler(u64::MAX - 1, 10));
    let taken = Arc::new(Mutex::new(Vec::new()));

    // Every producer offers the same 200 URLs; each must be accepted once
    let producers: Vec<_> = (0..4)
        .map(|_| {
            let scheduler = Arc::clone(&scheduler);
            thread::spawn(move || {
                (0..200)
                    .filter(|i| {
                        let page = url(&format!("https://host{}.example/page/{}", i % 7, i));
                        scheduler.add_page(page, 1)
                    })
                    .count()
            })
        })
        .collect();

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let scheduler = Arc::clone(&scheduler);
            let taken = Arc::clone(&taken);
            thread::spawn(move || {
                for _ in 0..1000 {
                    if let Some(entry) = scheduler.next_url() {
                        taken.lock().unwrap().push(entry.url.to_string());
                    }
                    thread::yield_now();
                }
            })
        })
        .collect();

    let accepted: usize = producers.into_iter().map(|p| p.join().unwrap()).sum();
    for consumer in consumers {
        consumer.join().unwrap();
    }
    while let Some(entry) = scheduler.next_url() {
        taken.lock().unwrap().push(entry.url.to_string());
    }

    let taken = taken.lock().unwrap();
    let unique: HashSet<_> = taken.iter().collect();
    assert_eq!(accepted, 200);
    assert_eq!(taken.len(), 200);
    assert_eq!(unique.len(), 200);
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(scheduler.stats().discovered, 200);
}

#[test]
fn test_concurrent_record_fetch_reaches_limit_exactly() {
    let scheduler = Arc::new(scheduler(99, 1));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let scheduler = Arc::clone(&scheduler);
            thread::spawn(move || {
                for _ in 0..25 {
                    scheduler.record_fetch();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(scheduler.page_count(), 100);
    assert!(scheduler.is_done());
}

#[tokio::test]
async fn test_can_fetch_follows_robots_rules() {
    let config = SchedulerConfig::new("TestBot", 10, 3);
    let scheduler = FrontierScheduler::new(
        config,
        Vec::new(),
        Arc::new(FixedRobots("User-agent: *\nDisallow: /admin\n")),
    );

    assert!(scheduler.can_fetch(&url("https://a.example/public")).await);
    assert!(!scheduler.can_fetch(&url("https://a.example/admin/panel")).await);
}
