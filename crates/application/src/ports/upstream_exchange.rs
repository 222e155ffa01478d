use async_trait::async_trait;
use bytes::Bytes;
use geodoh_domain::RelayError;
use std::sync::Arc;

/// Winning response of one upstream race.
#[derive(Debug, Clone)]
pub struct UpstreamAnswer {
    /// Endpoint URL that answered first.
    pub endpoint: Arc<str>,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

/// Races the encoded query against every configured upstream resolver.
///
/// First successful (2xx) response wins; losers are abandoned and never
/// observed by the caller. Fails with `AllUpstreamsFailed` only when every
/// endpoint has failed.
#[async_trait]
pub trait UpstreamExchange: Send + Sync {
    async fn race(&self, query: Bytes) -> Result<UpstreamAnswer, RelayError>;
}
