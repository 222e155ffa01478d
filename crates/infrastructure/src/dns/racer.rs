//! Upstream DoH race
//!
//! One POST per configured endpoint, all in flight at once; the first 2xx
//! response wins and the remaining attempts are aborted best-effort. Losing
//! attempts stay at debug level, they are not request errors.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use geodoh_application::ports::{UpstreamAnswer, UpstreamExchange};
use geodoh_domain::{RelayError, UpstreamFailure};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Media type for DoH requests and responses (RFC 8484)
const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// Response headers never replayed from the stored copy.
const SKIPPED_HEADERS: [&str; 5] = [
    "connection",
    "content-length",
    "keep-alive",
    "transfer-encoding",
    "upgrade",
];

#[derive(Debug)]
pub struct DohUpstreamRacer {
    endpoints: Vec<Arc<str>>,
    client: reqwest::Client,
    attempt_timeout: Duration,
}

impl DohUpstreamRacer {
    /// Fails before any request is issued when no endpoints are configured.
    pub fn new(endpoints: Vec<String>, attempt_timeout: Duration) -> Result<Self, RelayError> {
        if endpoints.is_empty() {
            return Err(RelayError::NoUpstreamsConfigured);
        }

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(attempt_timeout)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| RelayError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoints: endpoints.into_iter().map(Arc::from).collect(),
            client,
            attempt_timeout,
        })
    }

    pub fn endpoints(&self) -> &[Arc<str>] {
        &self.endpoints
    }

    async fn attempt(
        client: reqwest::Client,
        endpoint: Arc<str>,
        query: Bytes,
        timeout: Duration,
    ) -> Result<UpstreamAnswer, UpstreamFailure> {
        let failure = |cause: String| UpstreamFailure {
            endpoint: endpoint.to_string(),
            cause,
        };

        let response = tokio::time::timeout(
            timeout,
            client
                .post(endpoint.as_ref())
                .header("Content-Type", DNS_MESSAGE_CONTENT_TYPE)
                .header("Accept", DNS_MESSAGE_CONTENT_TYPE)
                .body(query)
                .send(),
        )
        .await
        .map_err(|_| failure(format!("timeout after {:?}", timeout)))?
        .map_err(|e| failure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failure(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let headers = response
            .headers()
            .iter()
            .filter(|(name, _)| !SKIPPED_HEADERS.contains(&name.as_str()))
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = tokio::time::timeout(timeout, response.bytes())
            .await
            .map_err(|_| failure("timeout reading response body".to_string()))?
            .map_err(|e| failure(e.to_string()))?;

        Ok(UpstreamAnswer {
            endpoint,
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

#[async_trait]
impl UpstreamExchange for DohUpstreamRacer {
    async fn race(&self, query: Bytes) -> Result<UpstreamAnswer, RelayError> {
        debug!(endpoints = self.endpoints.len(), "Racing all upstreams");

        let mut abort_handles = Vec::with_capacity(self.endpoints.len());
        let mut in_flight = FuturesUnordered::new();

        for endpoint in &self.endpoints {
            let handle = tokio::spawn(Self::attempt(
                self.client.clone(),
                Arc::clone(endpoint),
                query.clone(),
                self.attempt_timeout,
            ));
            abort_handles.push(handle.abort_handle());
            in_flight.push(handle);
        }

        let mut failures = Vec::new();
        let mut winner = None;

        while let Some(join_result) = in_flight.next().await {
            match join_result {
                Ok(Ok(answer)) => {
                    debug!(endpoint = %answer.endpoint, status = answer.status, "Fastest upstream answered");
                    winner = Some(answer);
                    break;
                }
                Ok(Err(f)) => {
                    debug!(endpoint = %f.endpoint, cause = %f.cause, "Upstream attempt failed");
                    failures.push(f);
                }
                Err(e) => {
                    warn!(error = %e, "Upstream task panicked");
                    failures.push(UpstreamFailure {
                        endpoint: "unknown".to_string(),
                        cause: e.to_string(),
                    });
                }
            }
        }

        // Losers keep running only until this abort lands; their outcomes
        // are discarded either way.
        for handle in &abort_handles {
            handle.abort();
        }

        winner.ok_or(RelayError::AllUpstreamsFailed(failures))
    }
}
