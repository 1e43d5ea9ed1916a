//! Robots.txt handling module
//!
//! This module provides the ruleset wrapper, the cache entry type the
//! scheduler keeps per domain, and the provider seam through which rules are
//! fetched.

mod cache;
mod parser;
mod provider;

pub use cache::CachedRobots;
pub use parser::ParsedRobots;
pub use provider::{HttpRobotsProvider, RobotsProvider};
