//! Inbound request normalization
//!
//! Both RFC 8484 transport encodings end up as the raw DNS query bytes the
//! client meant to send; everything else is a client error.

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bytes::Bytes;
use geodoh_domain::RelayError;

/// Media type for DoH requests and responses (RFC 8484)
pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// GET carries the query in a required `dns` parameter, URL-safe base64
/// without padding.
pub fn decode_get_param(dns: Option<&str>) -> Result<Bytes, RelayError> {
    let encoded = dns.filter(|s| !s.is_empty());
    let encoded = encoded.ok_or(RelayError::MissingQueryParameter)?;
    URL_SAFE_NO_PAD
        .decode(encoded)
        .map(Bytes::from)
        .map_err(|e| RelayError::InvalidQueryEncoding(e.to_string()))
}

/// POST carries the query verbatim in the body, and must say so in the
/// content type.
pub fn require_dns_message_body(headers: &HeaderMap, body: Bytes) -> Result<Bytes, RelayError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !content_type.starts_with(DNS_MESSAGE_CONTENT_TYPE) {
        return Err(RelayError::UnsupportedTransport(format!(
            "content type '{}' is not {}",
            content_type, DNS_MESSAGE_CONTENT_TYPE
        )));
    }

    Ok(body)
}
