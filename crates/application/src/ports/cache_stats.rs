/// Snapshot of response-cache counters for API exposure.
#[derive(Debug, Clone)]
pub struct CacheStatsSnapshot {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
}

/// Port for cache metrics exposed to the API layer.
pub trait CacheStatsPort: Send + Sync {
    fn snapshot(&self) -> CacheStatsSnapshot;
}
