//! Crawl-Frontier: the frontier scheduler of a polite web crawler
//!
//! This crate decides which URL a crawler fetches next. The scheduler keeps an
//! ordered, deduplicated frontier, enforces the page budget and link-depth
//! ceiling, paces requests per domain and gates fetches on robots.txt rules.
//! A small worker pool, fetcher and link extractor are included so the
//! scheduler can drive a real crawl.

pub mod config;
pub mod crawler;
pub mod robots;
pub mod scheduler;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Failure reported by a custom [`RobotsProvider`] that has no HTTP status to give
    #[error("Robots.txt error: {0}")]
    Robots(String),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

// Re-export commonly used types
pub use config::Config;
pub use robots::{HttpRobotsProvider, ParsedRobots, RobotsProvider};
pub use scheduler::{FrontierScheduler, PendingEntry, QueueKeying, SchedulerConfig, SchedulerStats};
pub use state::DomainState;
pub use url::{extract_domain, normalize_url};
