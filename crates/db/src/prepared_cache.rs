// SPDX-License-Identifier: MIT

//! Per-connection prepared-statement cache (spec §3, §8 invariant 5):
//! insertion-ordered map, default capacity 100, LRU eviction.

use indexmap::IndexMap;

/// Opaque backend-specific prepared statement handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedHandle(pub String);

pub const DEFAULT_PREPARED_CACHE_CAPACITY: usize = 100;

struct CacheEntry {
    handle: PreparedHandle,
    last_used: u64,
}

/// LRU-evicting cache keyed by caller-chosen statement name. Every
/// successful `get` counts as a use and refreshes recency, matching the
/// "most recently inserted/used" semantics tested by §8 invariant 5.
pub struct PreparedStatementCache {
    capacity: usize,
    counter: u64,
    entries: IndexMap<String, CacheEntry>,
}

impl PreparedStatementCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            counter: 0,
            entries: IndexMap::new(),
        }
    }

    /// Insert or replace `name`'s handle. If inserting a new name pushes
    /// the cache over capacity, the entry with the lowest recency
    /// counter is evicted.
    pub fn insert(&mut self, name: impl Into<String>, handle: PreparedHandle) {
        let name = name.into();
        self.counter += 1;
        let counter = self.counter;
        self.entries.insert(
            name,
            CacheEntry {
                handle,
                last_used: counter,
            },
        );
        while self.entries.len() > self.capacity {
            self.evict_least_recently_used();
        }
    }

    pub fn get(&mut self, name: &str) -> Option<&PreparedHandle> {
        self.counter += 1;
        let counter = self.counter;
        if let Some(entry) = self.entries.get_mut(name) {
            entry.last_used = counter;
            Some(&entry.handle)
        } else {
            None
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_least_recently_used(&mut self) {
        let Some(victim) = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(name, _)| name.clone())
        else {
            return;
        };
        self.entries.shift_remove(&victim);
    }
}
