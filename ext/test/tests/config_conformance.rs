//! Conformance tests for config-driven reducer construction.
//!
//! A reducer loaded from configuration must behave identically to the
//! hand-built equivalent, and load failures must be precise.

#![cfg(feature = "config")]

use remat::prelude::*;
use remat::{Registry, ReducerConfig};
use remat_test::{act, standard_registry};
use serde_json::json;

fn load(registry: &Registry, config: serde_json::Value) -> WithDefault {
    let config: ReducerConfig = serde_json::from_value(config).unwrap();
    registry.load_reducer(&config).unwrap()
}

#[test]
fn loaded_reducer_matches_the_hand_built_equivalent() {
    let loaded = load(
        &standard_registry(),
        json!({
            "default": 0,
            "matchers": [
                {"when": {"type": "action", "shape": {"type": "ADD"}}, "then": {"name": "bump"}},
                {"when": {"type": "action", "shape": {"type": "SET"}},
                 "then": {"name": "set", "config": {"value": 100}}},
            ]
        }),
    );

    let hand_built = first([
        on_action(json!({"type": "ADD"}))
            .with(|s: &Value, _: &Value, _: &[Value]| json!(s.as_i64().unwrap_or(0) + 1)),
        on_action(json!({"type": "SET"})).with(|_: &Value, _: &Value, _: &[Value]| json!(100)),
    ])
    .unwrap()
    .with_default(json!(0));

    let calls = [
        (None, act("INIT").build()),
        (Some(json!(3)), act("ADD").build()),
        (Some(json!(3)), act("SET").build()),
        (Some(json!(3)), act("NOPE").build()),
        (Some(json!(3)), act("ADD").with("noise", true).build()),
    ];

    for (state, action) in calls {
        assert_eq!(
            loaded.reduce(state.as_ref(), &action, &[]),
            hand_built.reduce(state.as_ref(), &action, &[]),
            "diverged on action {action}"
        );
    }
}

#[test]
fn shape_strategies_work_from_config() {
    let loaded = load(
        &standard_registry(),
        json!({
            "default": [],
            "matchers": [{
                "when": {"type": "all", "conditions": [
                    {"type": "action", "shape": {"type": {"prefix": "todo/"}}},
                    {"type": "action", "shape": {"payload": "defined"}},
                ]},
                "then": {"name": "push_payload"}
            }]
        }),
    );

    let state = json!([1]);
    assert_eq!(
        loaded.reduce(Some(&state), &json!({"type": "todo/add", "payload": 2}), &[]),
        json!([1, 2])
    );
    // Guard on payload presence.
    assert_eq!(
        loaded.reduce(Some(&state), &json!({"type": "todo/add"}), &[]),
        json!([1])
    );
    // Prefix mismatch.
    assert_eq!(
        loaded.reduce(Some(&state), &json!({"type": "user/add", "payload": 2}), &[]),
        json!([1])
    );
}

#[test]
fn unknown_transform_reports_registered_names() {
    let registry = standard_registry();
    let config: ReducerConfig = serde_json::from_value(json!({
        "default": 0,
        "matchers": [{"when": {"type": "always"}, "then": {"name": "no-such"}}]
    }))
    .unwrap();

    let err = registry.load_reducer(&config).unwrap_err();
    let ReducerError::UnknownTransform { name, available } = err else {
        panic!("expected UnknownTransform, got {err:?}");
    };
    assert_eq!(name, "no-such");
    assert!(available.contains(&"bump".to_string()));
    assert!(available.contains(&"push_payload".to_string()));
}

#[test]
fn invalid_patterns_fail_the_load_not_the_call() {
    let registry = standard_registry();
    let config: ReducerConfig = serde_json::from_value(json!({
        "default": 0,
        "matchers": [{
            "when": {"type": "action", "shape": {"type": {"regex": "[unclosed"}}},
            "then": {"name": "identity"}
        }]
    }))
    .unwrap();

    let err = registry.load_reducer(&config).unwrap_err();
    assert!(matches!(err, ReducerError::InvalidPattern { .. }));
}

#[test]
fn empty_matcher_list_is_invalid() {
    let registry = standard_registry();
    let config: ReducerConfig =
        serde_json::from_value(json!({"default": 0, "matchers": []})).unwrap();

    let err = registry.load_reducer(&config).unwrap_err();
    assert!(matches!(err, ReducerError::InvalidArgument { .. }));
}
