//! TTL response cache
//!
//! Key→value cache with per-entry expiry and a capacity bound, shared
//! concurrently via DashMap. Expired entries are dropped lazily on access
//! and swept when the cache is full.

use dashmap::DashMap;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
struct CacheEntry {
    value: String,
    inserted_at: Instant,
}

pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    capacity: usize,
}

impl ResponseCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        ResponseCache {
            entries: DashMap::new(),
            ttl,
            capacity,
        }
    }

    /// Fetch a live entry, dropping it if its TTL has passed.
    pub fn get(&self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(entry.value.clone())
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    pub fn set(&self, key: &str, value: String) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(key) {
            self.entries
                .retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
            // Still full after the sweep: evict one entry. Which one is not
            // significant for a response cache. The key is cloned out before
            // removing so no shard guard is held across the remove call.
            if self.entries.len() >= self.capacity {
                let victim = self.entries.iter().next().map(|e| e.key().clone());
                if let Some(victim) = victim {
                    self.entries.remove(&victim);
                }
            }
        }
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Remove one entry, returning whether it existed.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
