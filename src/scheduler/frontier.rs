//! Ordered, keyed queue of pending fetches

use crate::url::extract_domain;
use serde::Deserialize;
use std::collections::{HashMap, VecDeque};
use url::Url;

/// How pending entries are grouped into frontier keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueKeying {
    /// One key per URL: a FIFO work queue over acceptance order
    #[default]
    Url,
    /// One key per domain: dispatch rotates across domains
    Domain,
}

/// A URL queued for fetching together with its link depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    /// The URL to fetch
    pub url: Url,

    /// Number of link hops from a seed
    pub depth: u32,
}

impl PendingEntry {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }

    /// The politeness domain of this entry
    pub fn domain(&self) -> Option<String> {
        extract_domain(&self.url)
    }
}

/// The frontier proper
///
/// Keys keep their insertion order. Under [`QueueKeying::Url`] every key owns
/// exactly one entry; under [`QueueKeying::Domain`] a key owns the FIFO of its
/// domain's entries and moves to the back after each dispatch.
#[derive(Debug)]
pub struct Frontier {
    keying: QueueKeying,
    order: VecDeque<String>,
    queues: HashMap<String, VecDeque<PendingEntry>>,
    len: usize,
}

impl Frontier {
    pub fn new(keying: QueueKeying) -> Self {
        Self {
            keying,
            order: VecDeque::new(),
            queues: HashMap::new(),
            len: 0,
        }
    }

    pub fn keying(&self) -> QueueKeying {
        self.keying
    }

    /// Computes the queue key of `url`, `None` for host-less URLs
    pub fn key_for(&self, url: &Url) -> Option<String> {
        let domain = extract_domain(url)?;
        match self.keying {
            QueueKeying::Url => Some(url.as_str().to_string()),
            QueueKeying::Domain => Some(domain),
        }
    }

    /// Whether `key` currently owns at least one pending entry
    pub fn contains_key(&self, key: &str) -> bool {
        self.queues.get(key).is_some_and(|queue| !queue.is_empty())
    }

    /// Appends `entry` under its key
    ///
    /// A new key goes to the end of the order; an existing key keeps its
    /// position. Returns `false` for URLs without a key.
    pub fn push(&mut self, entry: PendingEntry) -> bool {
        let Some(key) = self.key_for(&entry.url) else {
            return false;
        };

        match self.queues.get_mut(&key) {
            Some(queue) => {
                if queue.is_empty() && !self.order.contains(&key) {
                    self.order.push_back(key);
                }
                queue.push_back(entry);
            }
            None => {
                self.order.push_back(key.clone());
                self.queues.insert(key, VecDeque::from([entry]));
            }
        }

        self.len += 1;
        true
    }

    /// Removes and returns the first entry, in key order, accepted by `ready`
    ///
    /// Empty keys met during the scan are deleted. Only the front entry of
    /// each key is offered to `ready`. Under domain keying the dispatched key
    /// rotates to the back of the order.
    pub fn pop_next<F>(&mut self, mut ready: F) -> Option<PendingEntry>
    where
        F: FnMut(&PendingEntry) -> bool,
    {
        let mut index = 0;
        while index < self.order.len() {
            let key = &self.order[index];
            let Some(queue) = self.queues.get_mut(key) else {
                self.order.remove(index);
                continue;
            };

            let Some(front) = queue.front() else {
                let key = self.order.remove(index);
                if let Some(key) = key {
                    self.queues.remove(&key);
                }
                continue;
            };

            if !ready(front) {
                index += 1;
                continue;
            }

            let entry = queue.pop_front();
            let drained = queue.is_empty();
            let key = self.order.remove(index);
            if let Some(key) = key {
                if drained {
                    self.queues.remove(&key);
                } else {
                    self.order.push_back(key);
                }
            }

            if entry.is_some() {
                self.len -= 1;
            }
            return entry;
        }

        None
    }

    /// Iterates over the front entry of every non-empty key, in key order
    pub fn heads(&self) -> impl Iterator<Item = &PendingEntry> {
        self.order
            .iter()
            .filter_map(|key| self.queues.get(key).and_then(VecDeque::front))
    }

    /// Number of pending entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of keys in the order
    pub fn key_count(&self) -> usize {
        self.order.len()
    }
}
