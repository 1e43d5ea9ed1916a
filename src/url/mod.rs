//! URL helpers used around the frontier
//!
//! Normalization of discovered links, the per-URL politeness domain and the
//! robots.txt location of an origin.

mod domain;
mod normalize;

pub use domain::{extract_domain, robots_url};
pub use normalize::normalize_url;
