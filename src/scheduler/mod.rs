//! Frontier scheduler
//!
//! This module is the crawl's single point of coordination:
//! - an ordered, deduplicated frontier of `(url, depth)` entries
//! - the page budget and link-depth ceiling
//! - per-domain politeness pacing
//! - a lazily populated robots.txt permission cache

mod frontier;
mod frontier_scheduler;
mod settings;

pub use frontier::{Frontier, PendingEntry, QueueKeying};
pub use frontier_scheduler::{FrontierScheduler, SchedulerStats};
pub use settings::SchedulerConfig;
