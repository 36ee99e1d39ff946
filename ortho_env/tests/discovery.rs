//! Discovery of environment values for derived configuration records.
//!
//! Each case pairs a record shape with an in-memory environment and checks
//! which `(path, raw)` pairs are found, or that discovery is rejected.
#![expect(dead_code, reason = "most records are only inspected through their shapes")]

mod common;

use std::collections::HashMap;
use std::time::SystemTime;

use anyhow::{Result, ensure};
use common::{BasicAppConfig, rendered};
use ortho_env::{
    DiscoveredValue, Discoverer, EnvError, EnvNaming, EnvSource, MapEnv, ParserRegistry, Path,
    Reflect, Shape, UnsupportedKind,
};
use rstest::rstest;

trait Greeter {
    fn greet(&self) -> String;
}

#[derive(Default, Reflect)]
struct WithPrivate {
    unexported: String,
    pub int_value: i64,
}

#[derive(Default, Reflect)]
struct WithEmbedded {
    #[ortho_env(flatten)]
    pub basic: BasicAppConfig,
    pub float_value: f32,
}

#[derive(Default, Reflect)]
struct Nested {
    pub config: BasicAppConfig,
}

#[derive(Default, Reflect)]
struct DoubleNested {
    pub nested: Nested,
}

#[derive(Default, Reflect)]
struct NestedBoxed {
    pub config: Option<Box<BasicAppConfig>>,
}

#[derive(Default, Reflect)]
struct DoubleNestedBoxed {
    pub nested: Option<Box<NestedBoxed>>,
}

#[derive(Default, Reflect)]
struct MixedNesting {
    pub nested: Option<Nested>,
}

#[derive(Default, Reflect)]
struct OptionalLeaf {
    pub int_value: Option<i64>,
}

#[derive(Default, Reflect)]
struct NestedOptionalLeaf {
    pub config: OptionalLeaf,
}

#[derive(Default, Reflect)]
struct DoublyIndirectLeaf {
    pub config: Option<Box<Option<i64>>>,
}

#[derive(Default, Reflect)]
struct DoublyIndirectRecord {
    pub config: Option<Box<Option<BasicAppConfig>>>,
}

#[derive(Reflect)]
struct Delegator {
    pub greeter: Box<dyn Greeter>,
    pub int_value: i64,
    pub string_value: String,
}

#[derive(Default, Reflect)]
struct StringMap {
    pub config: HashMap<String, String>,
}

#[derive(Default, Reflect)]
struct RecordMap {
    pub config: HashMap<String, BasicAppConfig>,
}

#[derive(Default, Reflect)]
struct BoxedRecordMap {
    pub config: HashMap<String, Option<Box<BasicAppConfig>>>,
}

#[derive(Default, Reflect)]
struct NestedMaps {
    pub config: HashMap<i32, HashMap<String, Option<Box<BasicAppConfig>>>>,
}

#[derive(Default, Reflect)]
struct IntSequence {
    pub config: Vec<i32>,
}

#[derive(Default, Reflect)]
struct IntArray {
    pub config: [i32; 10],
}

#[derive(Default, Reflect)]
struct RecordSequence {
    pub config: Vec<BasicAppConfig>,
}

#[derive(Default, Reflect)]
struct NestedSequences {
    pub config: Vec<Vec<BasicAppConfig>>,
}

#[derive(Default, Reflect)]
struct SequenceOfMaps {
    pub config: Vec<HashMap<String, BasicAppConfig>>,
}

#[derive(Reflect)]
struct WithFunction {
    pub config: BasicAppConfig,
    pub time: fn() -> SystemTime,
}

#[derive(Default, Reflect)]
struct Basic {
    #[ortho_env(flatten)]
    pub users: Vec<String>,
    pub users_file: String,
}

#[derive(Default, Reflect)]
struct WebAuth {
    pub basic: Option<Box<Basic>>,
    pub users_file: String,
}

const BASIC_ENV: &[(&str, &str)] = &[
    ("STRING_VALUE", "FOOO"),
    ("INT_VALUE", "10"),
    ("BOOL_VALUE", "true"),
];

const CONFIG_ENV: &[(&str, &str)] = &[
    ("CONFIG_STRING_VALUE", "FOOO"),
    ("CONFIG_INT_VALUE", "10"),
    ("CONFIG_BOOL_VALUE", "true"),
];

const NESTED_CONFIG_ENV: &[(&str, &str)] = &[
    ("NESTED_CONFIG_STRING_VALUE", "FOOO"),
    ("NESTED_CONFIG_INT_VALUE", "10"),
    ("NESTED_CONFIG_BOOL_VALUE", "true"),
];

const BASIC_FOUND: &[(&str, &str)] = &[
    ("bool_value", "true"),
    ("int_value", "10"),
    ("string_value", "FOOO"),
];

const CONFIG_FOUND: &[(&str, &str)] = &[
    ("config.bool_value", "true"),
    ("config.int_value", "10"),
    ("config.string_value", "FOOO"),
];

const NESTED_CONFIG_FOUND: &[(&str, &str)] = &[
    ("nested.config.bool_value", "true"),
    ("nested.config.int_value", "10"),
    ("nested.config.string_value", "FOOO"),
];

const INDEXED_ENV: &[(&str, &str)] = &[
    ("CONFIG_0", "FOOO"),
    ("CONFIG_1", "10"),
    ("CONFIG_2", "true"),
];

const INDEXED_FOUND: &[(&str, &str)] = &[
    ("config.0", "FOOO"),
    ("config.1", "10"),
    ("config.2", "true"),
];

fn discover(shape: &Shape, vars: &[(&str, &str)]) -> Result<Vec<DiscoveredValue>, EnvError> {
    let env: MapEnv = vars.iter().copied().collect();
    let naming = EnvNaming::default();
    Discoverer::new(&naming, &env).discover(shape, &Path::root())
}

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(path, raw)| ((*path).to_owned(), (*raw).to_owned()))
        .collect()
}

#[rstest]
#[case::basic(BasicAppConfig::shape(), BASIC_ENV, BASIC_FOUND)]
#[case::unexported_fields(
    WithPrivate::shape(),
    &[("UNEXPORTED", "FOOO"), ("INT_VALUE", "10")],
    &[("int_value", "10")]
)]
#[case::embedded_record(
    WithEmbedded::shape(),
    &[
        ("STRING_VALUE", "FOOO"),
        ("INT_VALUE", "10"),
        ("BOOL_VALUE", "true"),
        ("FLOAT_VALUE", "42.1"),
    ],
    &[
        ("bool_value", "true"),
        ("float_value", "42.1"),
        ("int_value", "10"),
        ("string_value", "FOOO"),
    ]
)]
#[case::nested_record(Nested::shape(), CONFIG_ENV, CONFIG_FOUND)]
#[case::double_nested_record(DoubleNested::shape(), NESTED_CONFIG_ENV, NESTED_CONFIG_FOUND)]
#[case::nested_boxed_record(NestedBoxed::shape(), CONFIG_ENV, CONFIG_FOUND)]
#[case::double_nested_boxed_record(DoubleNestedBoxed::shape(), NESTED_CONFIG_ENV, NESTED_CONFIG_FOUND)]
#[case::mixed_nesting(MixedNesting::shape(), NESTED_CONFIG_ENV, NESTED_CONFIG_FOUND)]
#[case::optional_leaf(OptionalLeaf::shape(), &[("INT_VALUE", "10")], &[("int_value", "10")])]
#[case::nested_optional_leaf(
    NestedOptionalLeaf::shape(),
    &[("CONFIG_INT_VALUE", "10")],
    &[("config.int_value", "10")]
)]
#[case::doubly_indirect_leaf(DoublyIndirectLeaf::shape(), &[("CONFIG", "10")], &[("config", "10")])]
#[case::doubly_indirect_record(DoublyIndirectRecord::shape(), CONFIG_ENV, CONFIG_FOUND)]
#[case::trait_object_field(
    Delegator::shape(),
    &[("STRING_VALUE", "FOOO"), ("INT_VALUE", "10"), ("GREETER", "hello")],
    &[("int_value", "10"), ("string_value", "FOOO")]
)]
#[case::map_of_leaves(
    StringMap::shape(),
    &[("CONFIG_FOO", "FOO"), ("CONFIG_BAR", "MEH"), ("CONFIG_BIZ", "BAR")],
    &[("config.bar", "MEH"), ("config.biz", "BAR"), ("config.foo", "FOO")]
)]
#[case::map_of_records(
    RecordMap::shape(),
    &[
        ("CONFIG_FOO_STRING_VALUE", "FOO"),
        ("CONFIG_BAR_STRING_VALUE", "MEH"),
        ("CONFIG_BIZ_STRING_VALUE", "BAR"),
    ],
    &[
        ("config.bar.string_value", "MEH"),
        ("config.biz.string_value", "BAR"),
        ("config.foo.string_value", "FOO"),
    ]
)]
#[case::map_of_boxed_records(
    BoxedRecordMap::shape(),
    &[
        ("CONFIG_FOO_STRING_VALUE", "FOO"),
        ("CONFIG_BAR_STRING_VALUE", "MEH"),
        ("CONFIG_BIZ_STRING_VALUE", "BAR"),
    ],
    &[
        ("config.bar.string_value", "MEH"),
        ("config.biz.string_value", "BAR"),
        ("config.foo.string_value", "FOO"),
    ]
)]
#[case::map_of_maps(
    NestedMaps::shape(),
    &[
        ("CONFIG_0_FOO_STRING_VALUE", "FOO"),
        ("CONFIG_1_BAR_STRING_VALUE", "MEH"),
        ("CONFIG_0_BIZ_STRING_VALUE", "BAR"),
    ],
    &[
        ("config.0.biz.string_value", "BAR"),
        ("config.0.foo.string_value", "FOO"),
        ("config.1.bar.string_value", "MEH"),
    ]
)]
#[case::sequence_of_leaves(IntSequence::shape(), INDEXED_ENV, INDEXED_FOUND)]
#[case::array_of_leaves(IntArray::shape(), INDEXED_ENV, INDEXED_FOUND)]
#[case::sequence_of_records(
    RecordSequence::shape(),
    &[
        ("CONFIG_0_STRING_VALUE", "FOOO"),
        ("CONFIG_0_INT_VALUE", "10"),
        ("CONFIG_1_STRING_VALUE", "MIMI"),
        ("CONFIG_1_INT_VALUE", "15"),
    ],
    &[
        ("config.0.int_value", "10"),
        ("config.0.string_value", "FOOO"),
        ("config.1.int_value", "15"),
        ("config.1.string_value", "MIMI"),
    ]
)]
#[case::sequence_of_sequences(
    NestedSequences::shape(),
    &[
        ("CONFIG_0_0_STRING_VALUE", "FOOO"),
        ("CONFIG_0_0_INT_VALUE", "10"),
        ("CONFIG_1_1_STRING_VALUE", "MIMI"),
        ("CONFIG_1_1_INT_VALUE", "15"),
    ],
    &[
        ("config.0.0.int_value", "10"),
        ("config.0.0.string_value", "FOOO"),
        ("config.1.1.int_value", "15"),
        ("config.1.1.string_value", "MIMI"),
    ]
)]
#[case::sequence_of_maps(
    SequenceOfMaps::shape(),
    &[
        ("CONFIG_0_FOO_STRING_VALUE", "FOOO"),
        ("CONFIG_0_FOO_INT_VALUE", "10"),
        ("CONFIG_1_BAR_STRING_VALUE", "MIMI"),
        ("CONFIG_1_BAR_INT_VALUE", "15"),
    ],
    &[
        ("config.0.foo.int_value", "10"),
        ("config.0.foo.string_value", "FOOO"),
        ("config.1.bar.int_value", "15"),
        ("config.1.bar.string_value", "MIMI"),
    ]
)]
#[case::flattened_sequence(
    WebAuth::shape(),
    &[("BASIC_0", "UserZero"), ("BASIC_1", "UserOne"), ("USERS_FILE", "path/to/file")],
    &[("basic.0", "UserZero"), ("basic.1", "UserOne"), ("users_file", "path/to/file")]
)]
fn discovers_present_values(
    #[case] shape: Shape,
    #[case] vars: &[(&str, &str)],
    #[case] expected: &[(&str, &str)],
) -> Result<()> {
    let found = discover(&shape, vars)?;
    let actual = rendered(&found);
    ensure!(actual == owned(expected), "unexpected values {actual:?}");
    Ok(())
}

#[rstest]
fn empty_environment_discovers_nothing() -> Result<()> {
    let found = discover(&NestedMaps::shape(), &[])?;
    ensure!(found.is_empty(), "expected nothing, got {found:?}");
    Ok(())
}

#[rstest]
fn rejects_non_numeric_sequence_index() {
    let outcome = discover(
        &IntSequence::shape(),
        &[("CONFIG_0", "FOOO"), ("CONFIG_1", "10"), ("CONFIG_PATATE", "true")],
    );
    assert!(
        matches!(&outcome, Err(EnvError::InvalidIndex { key, variable, .. })
            if key == "patate" && variable == "CONFIG_PATATE"),
        "unexpected outcome {outcome:?}"
    );
}

#[rstest]
fn rejects_non_numeric_array_index() {
    let outcome = discover(&IntArray::shape(), &[("CONFIG_0", "1"), ("CONFIG_X", "2")]);
    assert!(
        matches!(&outcome, Err(EnvError::InvalidIndex { key, variable, .. })
            if key == "x" && variable == "CONFIG_X"),
        "unexpected outcome {outcome:?}"
    );
}

#[rstest]
#[case::first_past_the_end("CONFIG_10", 10)]
#[case::further_out("CONFIG_11", 11)]
fn rejects_array_index_past_the_end(#[case] variable: &str, #[case] expected: usize) {
    let outcome = discover(&IntArray::shape(), &[(variable, "10")]);
    assert!(
        matches!(
            outcome,
            Err(EnvError::IndexOutOfBounds {
                index,
                len: 10,
                ..
            }) if index == expected
        ),
        "unexpected outcome {outcome:?}"
    );
}

#[rstest]
fn last_array_index_loads() -> Result<()> {
    let env: MapEnv = [("CONFIG_9", "7")].into_iter().collect();
    let source = EnvSource::with_environment(EnvNaming::default(), ParserRegistry::with_defaults(), env);
    let loaded: IntArray = source.load()?;
    ensure!(
        loaded.config == [0, 0, 0, 0, 0, 0, 0, 0, 0, 7],
        "unexpected array {:?}",
        loaded.config
    );
    Ok(())
}

#[rstest]
fn rejects_function_fields() {
    let outcome = discover(&WithFunction::shape(), CONFIG_ENV);
    assert!(
        matches!(
            outcome,
            Err(EnvError::UnsupportedKind {
                kind: UnsupportedKind::Function,
                ..
            })
        ),
        "unexpected outcome {outcome:?}"
    );
}

#[rstest]
fn prefix_is_prepended_to_every_name() -> Result<()> {
    let env = MapEnv::new()
        .with("APP_CONFIG_INT_VALUE", "10")
        .with("CONFIG_STRING_VALUE", "unprefixed");
    let naming = EnvNaming::new("APP", "_");
    let found = Discoverer::new(&naming, &env).discover(&Nested::shape(), &Path::root())?;
    ensure!(
        found == [common::value("10", &["config", "int_value"])],
        "unexpected values {found:?}"
    );
    Ok(())
}

#[rstest]
fn custom_separator_splits_words_and_levels() -> Result<()> {
    let env = MapEnv::new()
        .with("APP__CONFIG__0__STRING__VALUE", "a")
        .with("APP__CONFIG__1__INT__VALUE", "2");
    let naming = EnvNaming::new("APP", "__");
    let found = Discoverer::new(&naming, &env).discover(&RecordSequence::shape(), &Path::root())?;
    let actual = rendered(&found);
    ensure!(
        actual == owned(&[("config.0.string_value", "a"), ("config.1.int_value", "2")]),
        "unexpected values {actual:?}"
    );
    Ok(())
}

#[rstest]
fn discovery_is_rooted_at_the_given_path() -> Result<()> {
    let env = MapEnv::new().with("OUTER_STRING_VALUE", "x");
    let naming = EnvNaming::default();
    let found = Discoverer::new(&naming, &env)
        .discover(&BasicAppConfig::shape(), &Path::from_segments(["outer"]))?;
    ensure!(
        found == [common::value("x", &["outer", "string_value"])],
        "unexpected values {found:?}"
    );
    Ok(())
}
