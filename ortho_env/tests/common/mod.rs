//! Shared fixtures for the integration tests.
//!
//! Records here mirror the configuration shapes exercised across the
//! discovery, assignment and loading suites.

use ortho_env::{DiscoveredValue, Path, Reflect};

/// A flat record with one leaf of each common kind.
#[derive(Debug, Default, Clone, PartialEq, Eq, Reflect)]
pub struct BasicAppConfig {
    /// Read from `STRING_VALUE`.
    pub string_value: String,
    /// Read from `INT_VALUE`.
    pub int_value: i64,
    /// Read from `BOOL_VALUE`.
    pub bool_value: bool,
}

/// Builds a discovered value from a raw string and path segments.
#[must_use]
pub fn value(raw: &str, segments: &[&str]) -> DiscoveredValue {
    DiscoveredValue::new(raw, Path::from_segments(segments.iter().copied()))
}

/// Renders values as `(dotted path, raw)` pairs sorted by path, so results
/// compare independently of environment iteration order.
#[must_use]
pub fn rendered(values: &[DiscoveredValue]) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = values
        .iter()
        .map(|found| (found.path.to_string(), found.raw.clone()))
        .collect();
    pairs.sort();
    pairs
}
