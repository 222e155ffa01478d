use geodoh_application::ports::CacheStatsPort;
use geodoh_application::use_cases::HandleDohQueryUseCase;
use geodoh_domain::RegionMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<HandleDohQueryUseCase>,
    pub regions: Arc<RegionMap>,
    pub cache_stats: Arc<dyn CacheStatsPort>,
}
