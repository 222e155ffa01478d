use geodoh_application::ports::SubnetRewriter;
use geodoh_domain::RelayError;
use geodoh_infrastructure::dns::EcsRewriter;
use hickory_proto::op::{Message, UpdateMessage};
use hickory_proto::rr::rdata::opt::{ClientSubnet, EdnsCode, EdnsOption};
use hickory_proto::rr::RecordType;
use std::net::IpAddr;
use std::str::FromStr;

fn build_a_query(domain: &str, arcount: u16) -> Vec<u8> {
    let mut buf = vec![
        0x12, 0x34, // ID
        0x01, 0x00, // flags: RD set
        0x00, 0x01, // QDCOUNT = 1
        0x00, 0x00, // ANCOUNT = 0
        0x00, 0x00, // NSCOUNT = 0
    ];
    buf.extend_from_slice(&arcount.to_be_bytes());
    for label in domain.split('.') {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }
    buf.push(0x00); // root label
    buf.extend_from_slice(&[0x00, 0x01]); // QTYPE = A
    buf.extend_from_slice(&[0x00, 0x01]); // QCLASS = IN
    buf
}

fn ecs_option(family: u16, source_prefix: u8, scope_prefix: u8, addr: &[u8]) -> Vec<u8> {
    let mut opt = vec![0x00, 0x08]; // OPTION-CODE = 8 (edns-client-subnet)
    opt.extend_from_slice(&((4 + addr.len()) as u16).to_be_bytes());
    opt.extend_from_slice(&family.to_be_bytes());
    opt.push(source_prefix);
    opt.push(scope_prefix);
    opt.extend_from_slice(addr);
    opt
}

fn append_opt_record(buf: &mut Vec<u8>, payload_size: u16, options: &[Vec<u8>]) {
    buf.push(0x00); // NAME = root
    buf.extend_from_slice(&[0x00, 41]); // TYPE = OPT
    buf.extend_from_slice(&payload_size.to_be_bytes()); // CLASS = UDP payload size
    buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // extended RCODE, version, flags
    let rdlen: u16 = options.iter().map(|o| o.len() as u16).sum();
    buf.extend_from_slice(&rdlen.to_be_bytes());
    for option in options {
        buf.extend_from_slice(option);
    }
}

fn subnet_v4() -> IpAddr {
    "203.0.113.5".parse().unwrap()
}

/// The wire format only carries source_prefix/8 bits of the address, so the
/// option reads back with the trailing octet zeroed.
fn expected_v4() -> ClientSubnet {
    ClientSubnet::from_str("203.0.113.0/24").unwrap()
}

fn decode(bytes: &[u8]) -> Message {
    Message::from_vec(bytes).expect("rewriter output must be well-formed")
}

#[test]
fn test_query_without_edns_gets_synthesized_opt() {
    let raw = build_a_query("example.com", 0);
    let out = EcsRewriter::new().apply(&raw, subnet_v4()).unwrap();

    let message = decode(&out);
    let edns = message.edns.as_ref().expect("OPT must be created");
    assert_eq!(edns.max_payload(), 4096);
    assert_eq!(
        edns.option(EdnsCode::Subnet),
        Some(&EdnsOption::Subnet(expected_v4()))
    );
}

#[test]
fn test_existing_opt_keeps_client_payload_size() {
    let mut raw = build_a_query("example.com", 1);
    append_opt_record(&mut raw, 1232, &[]);

    let out = EcsRewriter::new().apply(&raw, subnet_v4()).unwrap();

    let edns_out = decode(&out);
    let edns = edns_out.edns.as_ref().unwrap();
    assert_eq!(edns.max_payload(), 1232);
    assert!(edns.option(EdnsCode::Subnet).is_some());
}

#[test]
fn test_existing_subnet_option_is_replaced() {
    let mut raw = build_a_query("example.com", 1);
    let client_ecs = ecs_option(1, 32, 0, &[10, 0, 0, 1]);
    append_opt_record(&mut raw, 4096, &[client_ecs]);

    let out = EcsRewriter::new().apply(&raw, subnet_v4()).unwrap();

    let message = decode(&out);
    let edns = message.edns.as_ref().unwrap();
    assert_eq!(
        edns.option(EdnsCode::Subnet),
        Some(&EdnsOption::Subnet(expected_v4()))
    );
}

#[test]
fn test_multiple_subnet_options_collapse_to_one() {
    let mut raw = build_a_query("example.com", 1);
    let first = ecs_option(1, 24, 0, &[10, 0, 0]);
    let second = ecs_option(1, 16, 0, &[192, 168]);
    append_opt_record(&mut raw, 4096, &[first, second]);

    let out = EcsRewriter::new().apply(&raw, subnet_v4()).unwrap();

    let message = decode(&out);
    let edns = message.edns.as_ref().unwrap();
    assert_eq!(
        edns.option(EdnsCode::Subnet),
        Some(&EdnsOption::Subnet(expected_v4()))
    );
}

#[test]
fn test_unrelated_options_survive() {
    let mut raw = build_a_query("example.com", 1);
    let cookie = vec![0x00, 0x0A, 0x00, 0x08, 1, 2, 3, 4, 5, 6, 7, 8];
    append_opt_record(&mut raw, 4096, &[cookie]);

    let out = EcsRewriter::new().apply(&raw, subnet_v4()).unwrap();

    let message = decode(&out);
    let edns = message.edns.as_ref().unwrap();
    assert!(edns.option(EdnsCode::Cookie).is_some());
    assert!(edns.option(EdnsCode::Subnet).is_some());
}

#[test]
fn test_injection_is_idempotent() {
    let raw = build_a_query("example.com", 0);
    let rewriter = EcsRewriter::new();

    let once = rewriter.apply(&raw, subnet_v4()).unwrap();
    let twice = rewriter.apply(&once, subnet_v4()).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_ipv6_subnet_address() {
    let raw = build_a_query("example.com", 0);
    let subnet: IpAddr = "2001:db8:1234:5678::1".parse().unwrap();

    let out = EcsRewriter::new().apply(&raw, subnet).unwrap();

    let message = decode(&out);
    let edns = message.edns.as_ref().unwrap();
    // /24 keeps the first three octets of the v6 address as well.
    let expected = ClientSubnet::from_str("2001:d00::/24").unwrap();
    assert_eq!(
        edns.option(EdnsCode::Subnet),
        Some(&EdnsOption::Subnet(expected))
    );
}

#[test]
fn test_question_section_is_untouched() {
    let raw = build_a_query("cache.example.com", 0);
    let out = EcsRewriter::new().apply(&raw, subnet_v4()).unwrap();

    let message = decode(&out);
    assert_eq!(message.id(), 0x1234);
    assert_eq!(message.queries.len(), 1);
    assert_eq!(message.queries[0].query_type(), RecordType::A);
    assert_eq!(message.queries[0].name().to_utf8(), "cache.example.com.");
    assert!(message.answers.is_empty());
    // The only OPT lives in the EDNS section, not among plain additionals.
    assert!(message
        .additionals()
        .iter()
        .all(|r| r.record_type() != RecordType::OPT));
}

#[test]
fn test_truncated_input_is_rejected() {
    let err = EcsRewriter::new()
        .apply(&[0x12, 0x34, 0x00], subnet_v4())
        .unwrap_err();
    assert!(matches!(err, RelayError::MalformedQuery(_)));
}

#[test]
fn test_garbage_input_is_rejected() {
    let mut raw = build_a_query("example.com", 2); // ARCOUNT lies
    raw.truncate(raw.len() - 2);
    let result = EcsRewriter::new().apply(&raw, subnet_v4());
    assert!(result.is_err());
}
