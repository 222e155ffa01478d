use crate::errors::ApiError;
use crate::extract;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::Response;
use bytes::Bytes;
use geodoh_application::use_cases::DohResponse;
use geodoh_domain::RelayError;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Response header carrying the cache verdict.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Response header naming the winning upstream on a miss.
pub const UPSTREAM_HEADER: &str = "x-upstream";

#[derive(Debug, Deserialize)]
pub struct DnsQueryParams {
    dns: Option<String>,
}

#[instrument(skip(state, params), name = "doh_get", fields(path = uri.path()))]
pub async fn handle_get(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<DnsQueryParams>,
) -> Result<Response, ApiError> {
    let path = uri.path();
    let (region, subnet) = state.regions.subnet_for_path(path)?;
    let raw_query = extract::decode_get_param(params.dns.as_deref())?;

    debug!(region = %region, query_len = raw_query.len(), "DoH GET query received");

    let response = state.pipeline.execute(path, subnet, raw_query).await?;
    build_response(response)
}

#[instrument(skip(state, headers, body), name = "doh_post", fields(path = uri.path()))]
pub async fn handle_post(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let path = uri.path();
    let (region, subnet) = state.regions.subnet_for_path(path)?;
    let raw_query = extract::require_dns_message_body(&headers, body)?;

    debug!(region = %region, query_len = raw_query.len(), "DoH POST query received");

    let response = state.pipeline.execute(path, subnet, raw_query).await?;
    build_response(response)
}

/// Query routes answer GET and POST only; anything else is a client error.
pub async fn method_not_supported() -> ApiError {
    ApiError(RelayError::UnsupportedTransport(
        "method not supported; use GET with ?dns= or POST application/dns-message".to_string(),
    ))
}

fn build_response(doh: DohResponse) -> Result<Response, ApiError> {
    let status = StatusCode::from_u16(doh.status)
        .map_err(|e| RelayError::Internal(format!("Invalid upstream status: {}", e)))?;

    let mut builder = Response::builder().status(status);
    for (name, value) in &doh.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder = builder.header(CACHE_STATUS_HEADER, doh.cache.as_str());
    if let Some(upstream) = &doh.upstream {
        builder = builder.header(UPSTREAM_HEADER, upstream.as_ref());
    }

    builder
        .body(Body::from(doh.body))
        .map_err(|e| ApiError(RelayError::Internal(e.to_string())))
}
