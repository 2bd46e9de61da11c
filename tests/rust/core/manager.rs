//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zinorm.
//! The Zinorm project belongs to the Dunimd Team.

use proptest::prelude::*;
use serde_json::{json, Value};
use zinorm::errors::Result;
use zinorm::{
    ZiError, ZiEvent, ZiFunction, ZiFunctionContext, ZiParserConfig, ZiParserManager,
    ZiRunOptions,
};

fn event(value: Value) -> ZiEvent {
    value.as_object().cloned().unwrap()
}

fn config(value: Value) -> ZiParserConfig {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_configured_parser_runs_steps_in_order() {
    let manager = ZiParserManager::new();
    let cfg = config(json!({
        "steps": ["parse_json", "extract", "rename", "drop"],
        "args": {
            "parse_json": {"field": "raw"},
            "extract": {"field": "user"},
            "rename": {"from_field": "name", "to_field": "user.name"},
            "drop": {"fields": "debug"}
        }
    }));
    let input = event(json!({"raw": "{\"user\": {\"name\": \"J\"}, \"debug\": 1, \"x\": 1}"}));
    let out = manager
        .configured_parser(&input, &cfg, &ZiRunOptions::default())
        .unwrap();
    assert_eq!(out, event(json!({"user": {"name": "J"}, "x": 1})));
}

#[test]
fn test_input_is_never_mutated() {
    let manager = ZiParserManager::new();
    let input = event(json!({"a": {"b": 1}, "c": "x"}));
    let before = input.clone();

    let cfg = config(json!({
        "steps": ["set", "drop"],
        "args": {"set": {"field": "a.b", "value": 2}, "drop": {"fields": "c"}}
    }));
    let out = manager
        .configured_parser(&input, &cfg, &ZiRunOptions::default())
        .unwrap();
    assert_eq!(out, event(json!({"a": {"b": 2}})));
    assert_eq!(input, before);

    let failing = config(json!({
        "steps": ["drop", "extract"],
        "args": {"drop": {"fields": "a"}, "extract": {"field": "c"}}
    }));
    assert!(manager
        .configured_parser(&input, &failing, &ZiRunOptions::default())
        .is_err());
    assert_eq!(input, before);
}

#[test]
fn test_suppressed_failure_returns_original() {
    let manager = ZiParserManager::new();
    let input = event(json!({"a": {"b": 1}, "log": "nomatch"}));
    let cfg = config(json!({
        "steps": ["drop", "regex"],
        "args": {
            "drop": {"fields": "a"},
            "regex": {"pattern": r"^(?P<ip>\d+\.\d+\.\d+\.\d+) ", "field": "log"}
        }
    }));

    let err = manager
        .configured_parser(&input, &cfg, &ZiRunOptions::default())
        .unwrap_err();
    assert!(matches!(err, ZiError::NoMatch { .. }));

    let options = ZiRunOptions::new()
        .suppress_errors(true)
        .log_errors(true)
        .flatten(true);
    let out = manager.configured_parser(&input, &cfg, &options).unwrap();
    assert_eq!(out, input);
}

#[test]
fn test_unknown_step_fails_unless_suppressed() {
    let manager = ZiParserManager::new();
    let input = event(json!({"x": 1}));
    let cfg = config(json!({"steps": ["set", "explode"], "args": {"set": {"field": "y", "value": 2}}}));

    assert_eq!(
        manager
            .configured_parser(&input, &cfg, &ZiRunOptions::default())
            .unwrap_err(),
        ZiError::unknown_step("explode")
    );
    let options = ZiRunOptions::new().suppress_errors(true);
    assert_eq!(manager.configured_parser(&input, &cfg, &options).unwrap(), input);
}

#[test]
fn test_flatten_output() {
    let manager = ZiParserManager::new();
    let cfg = config(json!({"steps": ["parse_json"], "args": {"parse_json": {"field": "raw"}}}));
    let input = event(json!({"raw": "{\"user\": {\"name\": \"J\", \"tags\": [\"a\"]}, \"x\": 1}"}));
    let out = manager
        .configured_parser(&input, &cfg, &ZiRunOptions::new().flatten(true))
        .unwrap();
    assert_eq!(out, event(json!({"user.name": "J", "user.tags": ["a"], "x": 1})));
}

#[test]
fn test_flatten_drops_empty_maps() {
    let manager = ZiParserManager::new();
    let input = event(json!({"user": {}, "meta": {"empty": {}}, "x": 1}));
    let out = manager
        .configured_parser(&input, &ZiParserConfig::default(), &ZiRunOptions::new().flatten(true))
        .unwrap();
    assert_eq!(out, event(json!({"x": 1})));
}

#[test]
fn test_flatten_collision_is_a_failure() {
    let manager = ZiParserManager::new();
    let input = event(json!({"a.b": 1, "a": {"b": 2}}));
    let options = ZiRunOptions::new().flatten(true);
    let err = manager
        .configured_parser(&input, &ZiParserConfig::default(), &options)
        .unwrap_err();
    assert!(matches!(err, ZiError::FlattenCollision { .. }));

    let options = options.suppress_errors(true);
    assert_eq!(
        manager
            .configured_parser(&input, &ZiParserConfig::default(), &options)
            .unwrap(),
        input
    );
}

#[test]
fn test_missing_args_entry_is_empty_object() {
    let manager = ZiParserManager::new();
    let cfg = config(json!({"steps": ["drop"]}));
    let err = manager
        .configured_parser(&event(json!({})), &cfg, &ZiRunOptions::default())
        .unwrap_err();
    assert!(matches!(err, ZiError::InvalidArgument { .. }));
}

#[test]
fn test_query_parser_and_run_query() {
    let manager = ZiParserManager::new();
    let query = r#"parse_json(field="raw") | extract(field="user")"#;
    assert_eq!(manager.query_parser(query).steps, vec!["parse_json", "extract"]);

    let input = event(json!({"raw": "{\"user\": {\"name\": \"J\"}, \"x\": 1}"}));
    let out = manager
        .run_query(&input, query, &ZiRunOptions::default())
        .unwrap();
    assert_eq!(out, event(json!({"name": "J", "x": 1})));
}

#[test]
fn test_duplicate_set_uses_last_arguments() {
    let manager = ZiParserManager::new();
    let out = manager
        .run_query(
            &ZiEvent::new(),
            r#"set(field="a", value="1") | set(field="b", value="2")"#,
            &ZiRunOptions::default(),
        )
        .unwrap();
    assert_eq!(out, event(json!({"b": "2"})));
}

#[test]
fn test_register_predefined_parser() {
    let mut manager = ZiParserManager::new();
    manager.register_predefined(
        "tagger",
        ZiParserConfig::new().with_step("set", json!({"field": "tag", "value": "seen"})),
    );
    assert_eq!(manager.predefined_names(), vec!["tagger", "windows_event"]);

    let out = manager.predefined_parser(&event(json!({"x": 1})), "tagger").unwrap();
    assert_eq!(out, event(json!({"x": 1, "tag": "seen"})));

    assert_eq!(
        manager.predefined_parser(&ZiEvent::new(), "nope").unwrap_err(),
        ZiError::UnknownParser { name: "nope".into() }
    );
}

#[derive(Debug)]
struct ZiUppercase(String);

impl ZiFunction for ZiUppercase {
    fn name(&self) -> &'static str {
        "uppercase"
    }

    fn apply(&self, mut event: ZiEvent) -> Result<ZiEvent> {
        if let Some(Value::String(text)) = event.get_mut(&self.0) {
            *text = text.to_uppercase();
        }
        Ok(event)
    }
}

fn uppercase_factory(
    args: &Value,
    _context: &ZiFunctionContext,
) -> Result<Box<dyn ZiFunction + Send + Sync>> {
    let field = args
        .get("field")
        .and_then(Value::as_str)
        .ok_or_else(|| ZiError::invalid_argument("uppercase", "requires string 'field'"))?;
    Ok(Box::new(ZiUppercase(field.to_string())))
}

#[test]
fn test_register_custom_function() {
    let mut manager = ZiParserManager::new();
    manager.register_function("uppercase", uppercase_factory);
    assert!(manager.registry().contains("uppercase"));

    let cfg = config(json!({"steps": ["uppercase"], "args": {"uppercase": {"field": "m"}}}));
    let out = manager
        .configured_parser(&event(json!({"m": "hi"})), &cfg, &ZiRunOptions::default())
        .unwrap();
    assert_eq!(out, event(json!({"m": "HI"})));
}

#[test]
fn test_run_batch_keeps_order() {
    let manager = ZiParserManager::new();
    let cfg = config(json!({"steps": ["parse_json"], "args": {"parse_json": {"field": "raw"}}}));
    let events: Vec<ZiEvent> = vec![
        event(json!({"raw": "{\"n\": 1}"})),
        event(json!({"raw": "not json"})),
        event(json!({"raw": "{\"n\": 3}"})),
    ];

    let results = manager.run_batch(&events, &cfg, &ZiRunOptions::default());
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap(), &event(json!({"n": 1})));
    assert!(matches!(results[1], Err(ZiError::Parse { .. })));
    assert_eq!(results[2].as_ref().unwrap(), &event(json!({"n": 3})));

    let suppressed = manager.run_batch(&events, &cfg, &ZiRunOptions::new().suppress_errors(true));
    assert_eq!(suppressed[1].as_ref().unwrap(), &events[1]);
}

#[test]
fn test_run_batch_bad_pattern_reverts_each_event() {
    let manager = ZiParserManager::new();
    let cfg = config(json!({
        "steps": ["set", "regex"],
        "args": {
            "set": {"field": "seen", "value": true},
            "regex": {"field": "log", "pattern": "("}
        }
    }));
    let events: Vec<ZiEvent> = vec![
        event(json!({"log": "a=1"})),
        event(json!({"log": "b=2", "n": 2})),
        event(json!({})),
    ];

    let results = manager.run_batch(&events, &cfg, &ZiRunOptions::default());
    assert_eq!(results.len(), 3);
    for result in &results {
        assert!(matches!(result, Err(ZiError::InvalidPattern { .. })));
    }

    let options = ZiRunOptions::new().suppress_errors(true);
    let suppressed = manager.run_batch(&events, &cfg, &options);
    assert_eq!(suppressed.len(), 3);
    for (result, original) in suppressed.iter().zip(&events) {
        assert_eq!(result.as_ref().unwrap(), original);
    }
}

#[test]
fn test_run_options_serde() {
    let options: ZiRunOptions = serde_json::from_value(json!({"flatten": true})).unwrap();
    assert_eq!(options, ZiRunOptions::new().flatten(true));
}

proptest! {
    #[test]
    fn prop_run_never_mutates_input(
        key in "[a-z]{1,6}",
        value in "[ -~]{0,16}",
        suppress in any::<bool>(),
    ) {
        let manager = ZiParserManager::new();
        let mut input = ZiEvent::new();
        input.insert("raw".to_string(), json!(value));
        input.insert(key.clone(), json!(value));
        let before = input.clone();
        let cfg = config(json!({
            "steps": ["parse_json", "rename", "set"],
            "args": {
                "parse_json": {"field": "raw", "in_place": true},
                "rename": {"from_field": key, "to_field": "moved.key"},
                "set": {"field": "raw", "value": null}
            }
        }));
        let options = ZiRunOptions::new().suppress_errors(suppress);
        let _ = manager.configured_parser(&input, &cfg, &options);
        prop_assert_eq!(input, before);
    }
}
