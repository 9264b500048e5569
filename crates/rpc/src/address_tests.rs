use super::*;
use donkey_engine::ErrorCode;

#[test]
fn parses_supported_forms() {
    let cases: &[(&str, &str, u16)] = &[
        ("", "127.0.0.1", 50052),
        ("  ", "127.0.0.1", 50052),
        ("example.com", "example.com", 50052),
        ("example.com:7000", "example.com", 7000),
        (":7000", "127.0.0.1", 7000),
        ("10.1.2.3:", "10.1.2.3", 50052),
        ("[::1]:7000", "::1", 7000),
        ("[::1]", "::1", 50052),
        ("::1", "::1", 50052),
    ];

    for (input, host, port) in cases {
        let addr: NetworkAddress = input.parse().expect("parse");
        assert_eq!(addr.host(), *host, "host of {input:?}");
        assert_eq!(addr.port(), *port, "port of {input:?}");
    }
}

#[test]
fn rejects_bad_ports_and_brackets() {
    for input in ["host:http", "host:70000", "host:-1", "[::1", "[::1]x"] {
        let err = input.parse::<NetworkAddress>().expect_err(input);
        assert_eq!(err.code, ErrorCode::InvalidArgument, "{input:?}");
    }
}

#[test]
fn display_brackets_ipv6() {
    assert_eq!(NetworkAddress::new("::1", 9).to_string(), "[::1]:9");
    assert_eq!(NetworkAddress::default().to_string(), "127.0.0.1:50052");
}
