//! Per-domain crawl state
//!
//! `DomainState` carries what the scheduler remembers about each domain:
//! when it was last dispatched and its cached robots.txt rules.

mod domain_state;

pub use domain_state::DomainState;
