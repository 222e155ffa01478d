use async_trait::async_trait;
use bytes::Bytes;
use geodoh_domain::RelayError;
use sha2::{Digest, Sha256};
use std::fmt;

/// Deterministic cache key over (route path, raw pre-mutation query bytes).
///
/// The transaction ID is part of the keyed bytes on purpose: the stored
/// response replays the original wire bytes, so a key that ignored the ID
/// would hand later clients a response whose ID does not match their query.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    pub fn for_query(path: &str, raw_query: &[u8]) -> Self {
        let digest = Sha256::new()
            .chain_update(path.as_bytes())
            .chain_update([0u8])
            .chain_update(raw_query)
            .finalize();
        Self(digest.into())
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey(")?;
        for byte in &self.0[..8] {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, "..)")
    }
}

/// Complete upstream HTTP response as replayed to future identical queries.
#[derive(Debug, Clone)]
pub struct StoredResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

/// Key → response store backed by an external cache service. Eviction and
/// TTL policy belong to the service, not to this pipeline.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn lookup(&self, key: &CacheKey) -> Option<StoredResponse>;

    async fn store(&self, key: CacheKey, response: StoredResponse) -> Result<(), RelayError>;
}
