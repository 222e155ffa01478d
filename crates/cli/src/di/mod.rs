use geodoh_application::ports::CacheStatsPort;
use geodoh_application::use_cases::HandleDohQueryUseCase;
use geodoh_domain::{Config, RegionMap};
use geodoh_infrastructure::cache::MemoryResponseCache;
use geodoh_infrastructure::dns::{DohUpstreamRacer, EcsRewriter};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Everything the HTTP layer needs, wired from validated configuration.
pub struct Services {
    pub pipeline: Arc<HandleDohQueryUseCase>,
    pub regions: Arc<RegionMap>,
    pub cache_stats: Arc<dyn CacheStatsPort>,
}

impl Services {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let cache = Arc::new(MemoryResponseCache::new(config.cache.max_entries));

        let racer = DohUpstreamRacer::new(
            config.upstream.servers.clone(),
            Duration::from_secs(config.upstream.query_timeout),
        )?;
        info!(upstreams = racer.endpoints().len(), "Upstream racer ready");

        let regions = Arc::new(config.region_map()?);
        info!(
            active_regions = regions.active_regions(),
            "Region table loaded"
        );

        let pipeline = Arc::new(
            HandleDohQueryUseCase::new(
                cache.clone(),
                Arc::new(EcsRewriter::new()),
                Arc::new(racer),
            )
            .with_cache_enabled(config.cache.enabled),
        );

        Ok(Self {
            pipeline,
            regions,
            cache_stats: cache,
        })
    }
}
