//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zinorm.
//! The Zinorm project belongs to the Dunimd Team.

use serde_json::{json, Value};
use zinorm::{ZiError, ZiEvent, ZiFunction, ZiFunctionContext, ZiFunctionRegistry};

fn event(value: Value) -> ZiEvent {
    value.as_object().cloned().unwrap()
}

fn step(name: &str, args: Value) -> Box<dyn ZiFunction + Send + Sync> {
    ZiFunctionRegistry::with_defaults()
        .build(name, &args, &ZiFunctionContext::default())
        .unwrap()
}

#[test]
fn test_parse_json_replaces_event() {
    let f = step("parse_json", json!({"field": "raw"}));
    let out = f.apply(event(json!({"raw": "{\"a\":1}"}))).unwrap();
    assert_eq!(out, event(json!({"a": 1})));
}

#[test]
fn test_parse_json_in_place() {
    let f = step("parse_json", json!({"field": "payload.body", "in_place": "TRUE"}));
    let out = f
        .apply(event(json!({"payload": {"body": "[1, 2]"}, "keep": true})))
        .unwrap();
    assert_eq!(out, event(json!({"payload": {"body": [1, 2]}, "keep": true})));
}

#[test]
fn test_parse_json_skips_empty_values() {
    let f = step("parse_json", json!({"field": "raw"}));
    for raw in [json!(null), json!(""), json!([]), json!({})] {
        let input = event(json!({"raw": raw, "x": 1}));
        assert_eq!(f.apply(input.clone()).unwrap(), input);
    }
    let input = event(json!({"x": 1}));
    assert_eq!(f.apply(input.clone()).unwrap(), input);
}

#[test]
fn test_parse_json_failures() {
    let f = step("parse_json", json!({"field": "raw"}));
    for raw in [json!(5), json!("{not json"), json!("[1, 2]")] {
        let err = f.apply(event(json!({"raw": raw}))).unwrap_err();
        assert!(matches!(err, ZiError::Parse { .. }), "{err:?}");
    }
}

#[test]
fn test_regex_named_groups() {
    let f = step(
        "regex",
        json!({"pattern": r"^(?P<ip>\S+) (\S+) (?P<path>/\S*)", "field": "log"}),
    );
    let out = f.apply(event(json!({"log": "1.2.3.4 GET /index"}))).unwrap();
    assert_eq!(out, event(json!({"ip": "1.2.3.4", "path": "/index"})));
}

#[test]
fn test_regex_searches_unanchored() {
    let f = step("regex", json!({"pattern": r"user=(?P<user>\w+)", "field": "msg"}));
    let out = f.apply(event(json!({"msg": "login ok user=bob"}))).unwrap();
    assert_eq!(out, event(json!({"user": "bob"})));
}

#[test]
fn test_regex_failures() {
    let f = step("regex", json!({"pattern": r"^(?P<ip>\S+) .*", "field": "log"}));

    let err = f.apply(event(json!({"log": "nomatch"}))).unwrap_err();
    assert!(matches!(err, ZiError::NoMatch { .. }));

    let err = f.apply(event(json!({"other": "x"}))).unwrap_err();
    assert!(matches!(err, ZiError::NoMatch { .. }));

    let err = f.apply(event(json!({"log": 42}))).unwrap_err();
    assert!(matches!(err, ZiError::FieldType { .. }));
}

#[test]
fn test_rename_moves_value() {
    let f = step("rename", json!({"from_field": "event.user", "to_field": "user.name"}));
    let out = f
        .apply(event(json!({"event": {"user": "J", "id": 1}})))
        .unwrap();
    assert_eq!(out, event(json!({"event": {"id": 1}, "user": {"name": "J"}})));
}

#[test]
fn test_rename_missing_field() {
    let f = step("rename", json!({"from_field": "a", "to_field": "b"}));
    assert_eq!(
        f.apply(event(json!({"c": 1}))).unwrap_err(),
        ZiError::not_found("a")
    );
    assert_eq!(
        f.apply(event(json!({"a": null}))).unwrap_err(),
        ZiError::not_found("a")
    );
}

#[test]
fn test_drop_fields() {
    let f = step("drop", json!({"fields": "a, b.c , missing,"}));
    let out = f
        .apply(event(json!({"a": 1, "b": {"c": 2, "d": 3}, "e": 4})))
        .unwrap();
    assert_eq!(out, event(json!({"b": {"d": 3}, "e": 4})));

    let f = step("drop", json!({"fields": ["e"]}));
    assert_eq!(f.apply(event(json!({"e": 1}))).unwrap(), ZiEvent::new());
}

#[test]
fn test_set_value() {
    let f = step("set", json!({"field": "event.type", "value": "http_access"}));
    let out = f.apply(event(json!({"event": "scalar"}))).unwrap();
    assert_eq!(out, event(json!({"event": {"type": "http_access"}})));

    let f = step("set", json!({"field": "n", "value": 3}));
    assert_eq!(f.apply(ZiEvent::new()).unwrap(), event(json!({"n": 3})));
}

#[test]
fn test_extract_merges_map() {
    let f = step("extract", json!({"field": "user"}));
    let out = f
        .apply(event(json!({"user": {"name": "J"}, "x": 1})))
        .unwrap();
    assert_eq!(out, event(json!({"name": "J", "x": 1})));

    let out = f
        .apply(event(json!({"user": {"x": 2}, "x": 1})))
        .unwrap();
    assert_eq!(out, event(json!({"x": 2})));
}

#[test]
fn test_extract_edge_cases() {
    let f = step("extract", json!({"field": "user"}));

    let out = f.apply(event(json!({"user": {}, "x": 1}))).unwrap();
    assert_eq!(out, event(json!({"x": 1})));

    for value in [json!(null), json!(""), json!([])] {
        let input = event(json!({"user": value}));
        assert_eq!(f.apply(input.clone()).unwrap(), input);
    }

    assert_eq!(
        f.apply(event(json!({"user": "J"}))).unwrap_err(),
        ZiError::type_mismatch("user")
    );
}

#[test]
fn test_parse_win_event_log_field_errors() {
    let f = step("parse_win_event_log", json!({"field": "_raw"}));
    assert_eq!(
        f.apply(ZiEvent::new()).unwrap_err(),
        ZiError::not_found("_raw")
    );
    assert!(matches!(
        f.apply(event(json!({"_raw": 1}))).unwrap_err(),
        ZiError::FieldType { .. }
    ));
    assert_eq!(
        f.apply(event(json!({"_raw": ""}))).unwrap(),
        ZiEvent::new()
    );
}

#[test]
fn test_factories_validate_arguments() {
    let registry = ZiFunctionRegistry::with_defaults();
    let context = ZiFunctionContext::default();

    for (name, args) in [
        ("parse_json", json!({})),
        ("parse_json", json!({"field": "raw", "in_place": "maybe"})),
        ("regex", json!({"field": "log"})),
        ("rename", json!({"from_field": "a"})),
        ("drop", json!({"fields": 3})),
        ("set", json!({"field": "a"})),
        ("extract", json!("user")),
    ] {
        let err = registry.build(name, &args, &context).unwrap_err();
        assert!(matches!(err, ZiError::InvalidArgument { .. }), "{name}: {err:?}");
    }

    let err = registry
        .build("regex", &json!({"pattern": "(", "field": "log"}), &context)
        .unwrap_err();
    assert!(matches!(err, ZiError::InvalidPattern { .. }));
}
