//! EDNS Client Subnet injection
//!
//! Decodes the client's raw query with `hickory-proto`, replaces whatever
//! client-subnet option it carried with the region's address, and re-encodes.
//! The question and answer sections are never touched; section counts are
//! recomputed by the encoder.

use geodoh_application::ports::SubnetRewriter;
use geodoh_domain::RelayError;
use hickory_proto::op::{Edns, Message};
use hickory_proto::rr::rdata::opt::{ClientSubnet, EdnsCode, EdnsOption};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::IpAddr;
use std::str::FromStr;

/// UDP payload size advertised when the client sent no EDNS section.
const DEFAULT_UDP_PAYLOAD: u16 = 4096;

/// Fixed source prefix: /24 keeps the hint at subnet granularity.
const ECS_SOURCE_PREFIX: u8 = 24;

pub struct EcsRewriter;

impl EcsRewriter {
    pub fn new() -> Self {
        Self
    }

    fn serialize(message: &Message) -> Result<Vec<u8>, RelayError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);
        message
            .emit(&mut encoder)
            .map_err(|e| RelayError::EncodeFailure(e.to_string()))?;
        Ok(buf)
    }
}

impl Default for EcsRewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SubnetRewriter for EcsRewriter {
    fn apply(&self, raw_query: &[u8], subnet: IpAddr) -> Result<Vec<u8>, RelayError> {
        let mut message =
            Message::from_vec(raw_query).map_err(|e| RelayError::MalformedQuery(e.to_string()))?;

        let edns = message.edns.get_or_insert_with(|| {
            let mut edns = Edns::new();
            edns.set_max_payload(DEFAULT_UDP_PAYLOAD);
            edns.set_version(0);
            edns
        });

        // Scope prefix stays 0, the resolver fills in the answered scope.
        let hint = ClientSubnet::from_str(&format!("{}/{}", subnet, ECS_SOURCE_PREFIX))
            .map_err(|e| RelayError::EncodeFailure(e.to_string()))?;

        // At most one subnet option survives: strip whatever the client sent.
        edns.options_mut().remove(EdnsCode::Subnet);
        edns.options_mut().insert(EdnsOption::Subnet(hint));

        Self::serialize(&message)
    }
}
