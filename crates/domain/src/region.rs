use std::fmt;
use std::net::IpAddr;

use crate::errors::RelayError;

/// Regions a query route can steer towards. Each region is bound to one
/// fixed route path; the subnet address per region comes from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    HongKong,
    Japan,
    Singapore,
    UnitedStates,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::HongKong,
        Region::Japan,
        Region::Singapore,
        Region::UnitedStates,
    ];

    /// Route path this region is served on.
    pub fn route_path(&self) -> &'static str {
        match self {
            Region::HongKong => "/hk-query",
            Region::Japan => "/jp-query",
            Region::Singapore => "/sg-query",
            Region::UnitedStates => "/us-query",
        }
    }

    /// Short region tag, as used in logs and configuration keys.
    pub fn tag(&self) -> &'static str {
        match self {
            Region::HongKong => "hk",
            Region::Japan => "jp",
            Region::Singapore => "sg",
            Region::UnitedStates => "us",
        }
    }

    pub fn from_path(path: &str) -> Option<Region> {
        Region::ALL.iter().copied().find(|r| r.route_path() == path)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Immutable region → client-subnet table, built once at startup from
/// validated configuration. A region without an entry is inactive.
#[derive(Debug, Clone)]
pub struct RegionMap {
    subnets: [Option<IpAddr>; 4],
}

impl RegionMap {
    pub fn new(entries: impl IntoIterator<Item = (Region, IpAddr)>) -> Self {
        let mut subnets = [None; 4];
        for (region, addr) in entries {
            subnets[region as usize] = Some(addr);
        }
        Self { subnets }
    }

    pub fn subnet_for(&self, region: Region) -> Option<IpAddr> {
        self.subnets[region as usize]
    }

    /// Resolves a request path to its region and configured subnet address.
    ///
    /// An unrecognized path and a recognized-but-unconfigured region are both
    /// client-facing 404s, but stay distinct for logging.
    pub fn subnet_for_path(&self, path: &str) -> Result<(Region, IpAddr), RelayError> {
        let region =
            Region::from_path(path).ok_or_else(|| RelayError::UnknownRoute(path.to_string()))?;
        let subnet = self
            .subnet_for(region)
            .ok_or(RelayError::RegionNotConfigured(region.tag()))?;
        Ok((region, subnet))
    }

    /// Number of regions with a configured subnet.
    pub fn active_regions(&self) -> usize {
        self.subnets.iter().filter(|s| s.is_some()).count()
    }
}
