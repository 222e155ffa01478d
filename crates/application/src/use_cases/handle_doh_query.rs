use crate::ports::{CacheKey, ResponseCache, StoredResponse, SubnetRewriter, UpstreamExchange};
use bytes::Bytes;
use geodoh_domain::RelayError;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// Response handed back to the HTTP layer.
#[derive(Debug, Clone)]
pub struct DohResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub cache: CacheStatus,
    /// Winning endpoint, present on a miss only.
    pub upstream: Option<Arc<str>>,
}

/// Per-request pipeline: cache lookup, client-subnet mutation, upstream
/// race, detached cache population. Region resolution and query extraction
/// happen in the HTTP layer before this use case runs; no step retries.
pub struct HandleDohQueryUseCase {
    cache: Arc<dyn ResponseCache>,
    rewriter: Arc<dyn SubnetRewriter>,
    upstreams: Arc<dyn UpstreamExchange>,
    cache_enabled: bool,
}

impl HandleDohQueryUseCase {
    pub fn new(
        cache: Arc<dyn ResponseCache>,
        rewriter: Arc<dyn SubnetRewriter>,
        upstreams: Arc<dyn UpstreamExchange>,
    ) -> Self {
        Self {
            cache,
            rewriter,
            upstreams,
            cache_enabled: true,
        }
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub async fn execute(
        &self,
        path: &str,
        subnet: IpAddr,
        raw_query: Bytes,
    ) -> Result<DohResponse, RelayError> {
        let start = Instant::now();
        let key = CacheKey::for_query(path, &raw_query);

        if self.cache_enabled {
            if let Some(stored) = self.cache.lookup(&key).await {
                debug!(
                    path,
                    key = ?key,
                    status = stored.status,
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "Replaying cached response"
                );
                return Ok(DohResponse {
                    status: stored.status,
                    headers: stored.headers,
                    body: stored.body,
                    cache: CacheStatus::Hit,
                    upstream: None,
                });
            }
        }

        let mutated = self.rewriter.apply(&raw_query, subnet)?;
        let answer = self.upstreams.race(Bytes::from(mutated)).await?;

        debug!(
            path,
            subnet = %subnet,
            endpoint = %answer.endpoint,
            status = answer.status,
            latency_ms = start.elapsed().as_millis() as u64,
            "Upstream race won"
        );

        if self.cache_enabled {
            // Store a duplicate; the response below is already on its way to
            // the client and must never wait for this.
            let stored = StoredResponse {
                status: answer.status,
                headers: answer.headers.clone(),
                body: answer.body.clone(),
            };
            let cache = Arc::clone(&self.cache);
            tokio::spawn(async move {
                if let Err(e) = cache.store(key, stored).await {
                    warn!(key = ?key, error = %e, "Failed to store response in cache");
                }
            });
        }

        Ok(DohResponse {
            status: answer.status,
            headers: answer.headers,
            body: answer.body,
            cache: CacheStatus::Miss,
            upstream: Some(answer.endpoint),
        })
    }
}
