//! Unit tests for error construction and rendering.

use rstest::rstest;

use super::EnvError;
use crate::{Path, UnsupportedKind};

fn int_error(raw: &str) -> std::num::ParseIntError {
    match raw.parse::<usize>() {
        Err(err) => err,
        Ok(value) => panic!("'{raw}' unexpectedly parsed as {value}"),
    }
}

#[rstest]
#[case::unsupported(
    EnvError::unsupported("fn() -> u8", UnsupportedKind::Function),
    "unsupported type fn() -> u8 (function)"
)]
#[case::out_of_bounds(
    EnvError::index_out_of_bounds(12, 10, "CONFIG_12_NAME"),
    "index 12 in environment variable CONFIG_12_NAME exceeds array length 10"
)]
#[case::sequence_too_large(
    EnvError::sequence_too_large(12, "u8", None),
    "index 12 is too large for a sequence of u8"
)]
#[case::missing_parser(EnvError::missing_parser("u8"), "no parser registered for type u8")]
#[case::recursion(
    EnvError::recursion_limit(&Path::from_segments(["node", "next"])),
    "configuration nesting too deep at 'node.next'"
)]
fn renders_messages(#[case] err: EnvError, #[case] expected: &str) {
    assert_eq!(err.to_string(), expected);
}

#[rstest]
fn invalid_index_keeps_source() {
    let err = EnvError::invalid_index("batman", "CONFIG_BATMAN", int_error("batman"));
    assert!(err.to_string().starts_with("invalid index 'batman' in environment variable CONFIG_BATMAN"));
    assert!(std::error::Error::source(&err).is_some());
}

#[rstest]
fn parse_error_exposes_raw_value() {
    let err = EnvError::parse("u16", "eighty", Box::new(int_error("eighty")));
    assert!(matches!(&err, EnvError::Parse { raw, .. } if raw == "eighty"));
    assert!(err.to_string().starts_with("failed to parse 'eighty' as u16"));
}
