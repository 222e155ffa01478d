mod cache_stats;
mod response_cache;
mod subnet_rewriter;
mod upstream_exchange;

pub use cache_stats::{CacheStatsPort, CacheStatsSnapshot};
pub use response_cache::{CacheKey, ResponseCache, StoredResponse};
pub use subnet_rewriter::SubnetRewriter;
pub use upstream_exchange::{UpstreamAnswer, UpstreamExchange};
