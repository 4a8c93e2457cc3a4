//! Serialization tests for values, type tags and matcher configuration.

#![cfg(feature = "serde")]

use funkit::prelude::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
fn test_value_serializes_to_natural_json() {
    let value = Value::seq([
        Value::Unit,
        Value::from(true),
        Value::from(7),
        Value::from(2.5),
        Value::from("text"),
        Value::map([("key", Value::seq([Value::from(1)]))]),
    ]);

    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        json!([null, true, 7, 2.5, "text", { "key": [1] }])
    );
}

#[rstest]
fn test_value_deserializes_from_json() {
    let value: Value =
        serde_json::from_str(r#"{"rules": [1, "a", null], "strict": false}"#).unwrap();

    assert_eq!(
        value,
        Value::map([
            (
                "rules",
                Value::seq([Value::from(1), Value::from("a"), Value::Unit])
            ),
            ("strict", Value::from(false)),
        ])
    );
}

#[rstest]
fn test_function_values_do_not_serialize() {
    let value = Value::from(identity());
    assert!(serde_json::to_string(&value).is_err());
}

#[rstest]
fn test_large_unsigned_becomes_float() {
    let value: Value = serde_json::from_str("18446744073709551615").unwrap();
    assert_eq!(value.type_tag(), TypeTag::Float);
}

#[rstest]
#[case(TypeTag::Int, json!("Int"))]
#[case(TypeTag::Number, json!("Number"))]
fn test_type_tag_serialization(#[case] tag: TypeTag, #[case] expected: serde_json::Value) {
    assert_eq!(serde_json::to_value(tag).unwrap(), expected);
    assert_eq!(serde_json::from_value::<TypeTag>(expected).unwrap(), tag);
}

#[rstest]
fn test_matcher_config_round_trip_and_defaults() {
    let config = MatcherConfig::new().with_catch_all(CatchAllPolicy::Anywhere);
    let encoded = serde_json::to_value(config).unwrap();
    assert_eq!(encoded, json!({ "catch_all": "anywhere" }));

    let decoded: MatcherConfig = serde_json::from_value(json!({})).unwrap();
    assert_eq!(decoded, MatcherConfig::default());
}

#[rstest]
fn test_deserialized_values_drive_dispatch() {
    let matcher = MatcherBuilder::new()
        .rule(pattern![TypeTag::Str, TypeTag::Int], "named count")
        .rule(pattern![..], "other")
        .build()
        .unwrap();
    let arguments: Vec<Value> = serde_json::from_str(r#"["apples", 3]"#).unwrap();

    assert_eq!(matcher.call(&arguments).unwrap(), Value::from("named count"));
}
