//! In-memory response cache
//!
//! Stands in for the external cache service behind the `ResponseCache`
//! port. Real TTL and eviction policy belong to that service; this store
//! only keeps a capacity bound so an abusive client cannot grow it without
//! limit.

use async_trait::async_trait;
use dashmap::DashMap;
use geodoh_application::ports::{
    CacheKey, CacheStatsPort, CacheStatsSnapshot, ResponseCache, StoredResponse,
};
use geodoh_domain::RelayError;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

pub struct MemoryResponseCache {
    entries: DashMap<CacheKey, StoredResponse>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
}

impl MemoryResponseCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            insertions: AtomicU64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ResponseCache for MemoryResponseCache {
    async fn lookup(&self, key: &CacheKey) -> Option<StoredResponse> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    async fn store(&self, key: CacheKey, response: StoredResponse) -> Result<(), RelayError> {
        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            // Coarse room-making: drop one arbitrary entry. Anything smarter
            // is the real cache service's job. The victim is copied out first
            // so the iterator's shard guard is released before the remove.
            let victim = self.entries.iter().next().map(|e| *e.key());
            if let Some(victim) = victim {
                self.entries.remove(&victim);
                debug!(evicted = ?victim, "Cache at capacity, evicted one entry");
            }
        }

        self.entries.insert(key, response);
        self.insertions.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl CacheStatsPort for MemoryResponseCache {
    fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
        }
    }
}
