//! Crawl driver built on the frontier scheduler
//!
//! - HTTP fetching
//! - HTML link extraction
//! - A tokio worker pool that feeds results back into the frontier

mod fetcher;
mod parser;
mod worker;

pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use parser::extract_links;
pub use worker::{run_crawl, CrawlSummary, Crawler};
