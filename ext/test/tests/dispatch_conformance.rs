//! Conformance tests for the dispatch tree and reducer composition.
//!
//! Exercises tree lookup (including the strict ambiguity rule), registry
//! merging, slice combination with the whole-state extra argument, and
//! sequential composition.

use remat::prelude::*;
use remat_test::act;
use serde_json::json;
use std::sync::Arc;

fn leaf(label: &'static str) -> DispatchNode {
    DispatchNode::leaf(move |_: &Value, _: &Value, _: &[Value]| json!(label))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tree lookup
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn single_leaf_matches_through_unrelated_siblings() {
    // {type: {A: fnA}, other: {C: {type: {B: fnB}}}}
    let tree = DispatchNode::branch()
        .on("type", "A", leaf("fnA"))
        .on("other", "C", DispatchNode::branch().on("type", "B", leaf("fnB")));

    // The "other" branch is entered, but its nested type requirement fails,
    // leaving exactly one match.
    let action = json!({"type": "A", "other": "C"});
    let found = tree.find(&action).unwrap().unwrap();
    assert_eq!(found.apply(&json!(null), &action, &[]), json!("fnA"));
}

#[test]
fn two_simultaneous_branches_are_an_authoring_error() {
    let tree = DispatchNode::branch()
        .on("type", "A", leaf("fnA"))
        .on("other", "C", leaf("fnC"));

    let err = tree.find(&json!({"type": "A", "other": "C"})).unwrap_err();
    assert_eq!(err, ReducerError::AmbiguousDispatch { matches: 2 });
}

#[test]
fn independent_properties_keep_the_strict_rule() {
    // Four disjoint single-letter discriminators. An action touching two of
    // them is "well-specified" to a reader but still ambiguous to the rule,
    // which counts reachable leaves.
    let tree = DispatchNode::branch()
        .on("a", "1", leaf("a"))
        .on("b", "1", leaf("b"))
        .on("c", "1", leaf("c"))
        .on("d", "1", leaf("d"));

    for (action, expected) in [
        (json!({"a": "1"}), "a"),
        (json!({"b": "1", "x": "9"}), "b"),
        (json!({"d": "1"}), "d"),
    ] {
        let found = tree.find(&action).unwrap().unwrap();
        assert_eq!(found.apply(&json!(null), &action, &[]), json!(expected));
    }

    assert!(matches!(
        tree.find(&json!({"b": "1", "c": "1"})),
        Err(ReducerError::AmbiguousDispatch { matches: 2 })
    ));
}

#[test]
fn no_match_is_a_distinguished_absence() {
    let tree = DispatchNode::branch().on("type", "A", leaf("fnA"));
    assert!(tree.find(&json!({"type": "B"})).unwrap().is_none());
    assert!(tree.find(&json!({"unrelated": "A"})).unwrap().is_none());
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tree reducer registry
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn registry_merges_partial_trees_and_dispatches() {
    let mut reducer = DispatchReducer::new(json!({"count": 0}));
    reducer
        .add(DispatchNode::path(
            "type",
            "INC",
            DispatchNode::leaf(|s: &Value, _: &Value, _: &[Value]| {
                json!({"count": s["count"].as_i64().unwrap() + 1})
            }),
        ))
        .add(DispatchNode::path(
            "type",
            "ZERO",
            DispatchNode::leaf(|_: &Value, _: &Value, _: &[Value]| json!({"count": 0})),
        ));

    // Uninitialized store substitutes the default before dispatch.
    assert_eq!(
        reducer.reduce(None, &act("INC").build(), &[]).unwrap(),
        json!({"count": 1})
    );
    assert_eq!(
        reducer
            .reduce(Some(&json!({"count": 9})), &act("ZERO").build(), &[])
            .unwrap(),
        json!({"count": 0})
    );
    // No match: state unchanged.
    assert_eq!(
        reducer
            .reduce(Some(&json!({"count": 9})), &act("NOPE").build(), &[])
            .unwrap(),
        json!({"count": 9})
    );
}

#[test]
fn re_registering_a_path_replaces_the_handler() {
    let mut reducer = DispatchReducer::new(json!(null));
    reducer.add(DispatchNode::path("type", "T", leaf("old")));
    reducer.add(DispatchNode::path("type", "T", leaf("new")));

    assert_eq!(
        reducer.reduce(Some(&json!(0)), &act("T").build(), &[]).unwrap(),
        json!("new")
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// combine_reducers
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn slices_receive_their_slice_and_the_whole_state() {
    let surface = |slice: Option<&Value>, _: &Value, extra: &[Value]| -> Result<Value, ReducerError> {
        Ok(json!({
            "slice": slice.cloned().unwrap_or(Value::Null),
            "whole": extra.first().cloned().unwrap_or(Value::Null),
        }))
    };
    let combined = combine_reducers([("a", Arc::new(surface) as Arc<dyn Reduce>)]).unwrap();

    let state = json!({"a": 1, "b": 2});
    let next = combined.reduce(Some(&state), &json!("act"), &[]).unwrap();

    assert_eq!(next["a"]["slice"], json!(1));
    // The entire top-level state, not just the slice.
    assert_eq!(next["a"]["whole"], json!({"a": 1, "b": 2}));
}

#[test]
fn combined_output_carries_mapping_keys_only() {
    let keep = |slice: Option<&Value>, _: &Value, _: &[Value]| -> Result<Value, ReducerError> {
        Ok(slice.cloned().unwrap_or(Value::Null))
    };
    let combined = combine_reducers([
        ("a", Arc::new(keep) as Arc<dyn Reduce>),
        ("b", Arc::new(keep) as Arc<dyn Reduce>),
    ])
    .unwrap();

    let next = combined
        .reduce(Some(&json!({"a": 1, "b": 2, "stray": 3})), &json!(null), &[])
        .unwrap();
    assert_eq!(next, json!({"a": 1, "b": 2}));
}

#[test]
fn empty_mapping_is_rejected() {
    let err = combine_reducers(Vec::<(String, Arc<dyn Reduce>)>::new()).unwrap_err();
    assert_eq!(err, ReducerError::MissingReducers);
}

#[test]
fn matcher_reducers_nest_as_slices() {
    let counter = on_action(act("ADD").build())
        .with(|s: &Value, _: &Value, _: &[Value]| json!(s.as_i64().unwrap_or(0) + 1))
        .with_default(json!(0));
    let combined = combine_reducers([("count", Arc::new(counter) as Arc<dyn Reduce>)]).unwrap();

    let initialized = combined.reduce(None, &act("INIT").build(), &[]).unwrap();
    assert_eq!(initialized, json!({"count": 0}));

    let next = combined
        .reduce(Some(&initialized), &act("ADD").build(), &[])
        .unwrap();
    assert_eq!(next, json!({"count": 1}));
}

// ═══════════════════════════════════════════════════════════════════════════════
// compose
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn compose_is_sequential_threading() {
    let r1 = |s: &Value, a: &Value, _: &[Value]| json!([s, a]);
    let r2 = |s: &Value, a: &Value, _: &[Value]| json!({"wrapped": s, "saw": a});

    let pipeline = compose(vec![]).then(r1).then(r2);
    let state = json!(0);
    let action = act("GO").build();

    // compose(r1, r2)(state, action) == r2(r1(state, action), action)
    let expected = r2.apply(&r1.apply(&state, &action, &[]), &action, &[]);
    assert_eq!(pipeline.apply(&state, &action, &[]), expected);
}

#[test]
fn compose_threads_through_matchers_too() {
    let bump = on_action(act("ADD").build())
        .with(|s: &Value, _: &Value, _: &[Value]| json!(s.as_i64().unwrap() + 1));
    // A matcher is a transform: unmatched steps pass the state through.
    let pipeline = compose(vec![]).then(bump.clone()).then(bump);

    assert_eq!(pipeline.apply(&json!(0), &act("ADD").build(), &[]), json!(2));
    assert_eq!(pipeline.apply(&json!(0), &act("X").build(), &[]), json!(0));
}
