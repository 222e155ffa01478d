use geodoh_domain::RelayError;
use std::net::IpAddr;

/// Rewrites a raw DNS query so its EDNS section carries exactly one
/// client-subnet option for the given address.
///
/// Fails with `MalformedQuery` when the input does not parse as a DNS wire
/// message and with `EncodeFailure` when the mutated message cannot be
/// re-encoded; both stem from client data or region configuration.
pub trait SubnetRewriter: Send + Sync {
    fn apply(&self, raw_query: &[u8], subnet: IpAddr) -> Result<Vec<u8>, RelayError>;
}
