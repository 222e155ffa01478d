use geodoh_domain::{Region, RegionMap, RelayError};
use std::net::IpAddr;

fn sample_map() -> RegionMap {
    RegionMap::new([
        (Region::HongKong, "203.0.113.5".parse::<IpAddr>().unwrap()),
        (Region::Japan, "2001:db8::1".parse::<IpAddr>().unwrap()),
    ])
}

#[test]
fn test_region_from_path_known_routes() {
    assert_eq!(Region::from_path("/hk-query"), Some(Region::HongKong));
    assert_eq!(Region::from_path("/jp-query"), Some(Region::Japan));
    assert_eq!(Region::from_path("/sg-query"), Some(Region::Singapore));
    assert_eq!(Region::from_path("/us-query"), Some(Region::UnitedStates));
}

#[test]
fn test_region_from_path_unknown_route() {
    assert_eq!(Region::from_path("/dns-query"), None);
    assert_eq!(Region::from_path("/hk-query/"), None);
    assert_eq!(Region::from_path(""), None);
}

#[test]
fn test_subnet_for_path_configured_region() {
    let map = sample_map();

    let (region, subnet) = map.subnet_for_path("/hk-query").unwrap();
    assert_eq!(region, Region::HongKong);
    assert_eq!(subnet, "203.0.113.5".parse::<IpAddr>().unwrap());

    let (region, subnet) = map.subnet_for_path("/jp-query").unwrap();
    assert_eq!(region, Region::Japan);
    assert!(subnet.is_ipv6());
}

#[test]
fn test_subnet_for_path_unknown_route() {
    let map = sample_map();
    let err = map.subnet_for_path("/nope").unwrap_err();
    assert!(matches!(err, RelayError::UnknownRoute(_)));
}

#[test]
fn test_subnet_for_path_unconfigured_region() {
    let map = sample_map();
    let err = map.subnet_for_path("/sg-query").unwrap_err();
    assert!(matches!(err, RelayError::RegionNotConfigured("sg")));
}

#[test]
fn test_active_regions_counts_configured_entries() {
    assert_eq!(sample_map().active_regions(), 2);
    assert_eq!(RegionMap::new([]).active_regions(), 0);
}

#[test]
fn test_region_display_uses_tag() {
    assert_eq!(Region::HongKong.to_string(), "hk");
    assert_eq!(Region::UnitedStates.to_string(), "us");
}
