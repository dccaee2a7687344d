//! Conformance tests for the matcher algebra.
//!
//! Exercises the public combinator surface end to end: the
//! condition-or-identity contract, first-match-wins precedence with
//! short-circuit evaluation, default substitution, and grouped dispatch.

use remat::prelude::*;
use remat_test::act;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn counting_condition(calls: &Arc<AtomicUsize>, result: bool) -> Condition {
    let calls = Arc::clone(calls);
    Condition::test(move |_, _, _| {
        calls.fetch_add(1, Ordering::SeqCst);
        result
    })
}

fn label(value: &'static str) -> impl Transform {
    move |_: &Value, _: &Value, _: &[Value]| json!(value)
}

#[test]
fn matcher_is_condition_choice_over_transform_or_state() {
    // For all args: M(args) == c(args) ? t(args) : args[0].
    let stamp = |state: &Value, action: &Value, extra: &[Value]| {
        json!({"state": state, "action": action, "extras": extra.len()})
    };
    let m = on_action(act("HIT").build()).with(stamp);

    let table = [
        (json!(1), act("HIT").build(), vec![json!("x")], true),
        (json!(1), act("MISS").build(), vec![], false),
        (json!({"deep": [1, 2]}), act("HIT").with("k", 3).build(), vec![], true),
        (json!(null), act("other").build(), vec![json!(1), json!(2)], false),
    ];

    for (state, action, extras, hits) in table {
        let got = m.reduce(&state, &action, &extras);
        let want = if hits {
            stamp(&state, &action, &extras)
        } else {
            state.clone()
        };
        assert_eq!(got, want);
    }
}

#[test]
fn first_applies_the_lowest_matching_index() {
    let combined = first([
        on_action(act("A").build()).with(label("m0")),
        on_action(act("B").build()).with(label("m1")),
        on_action(act("B").build()).with(label("m2")), // shadowed by m1
        when(Condition::Always).with(label("m3")),
    ])
    .unwrap();

    assert_eq!(combined.reduce(&json!(0), &act("A").build(), &[]), json!("m0"));
    assert_eq!(combined.reduce(&json!(0), &act("B").build(), &[]), json!("m1"));
    assert_eq!(combined.reduce(&json!(0), &act("Z").build(), &[]), json!("m3"));
}

#[test]
fn first_stops_evaluating_conditions_after_a_match() {
    let beyond = Arc::new(AtomicUsize::new(0));
    let combined = first([
        when(counting_condition(&Arc::new(AtomicUsize::new(0)), true)).with(label("win")),
        when(counting_condition(&beyond, true)).with(label("never")),
    ])
    .unwrap();

    for _ in 0..3 {
        assert_eq!(combined.reduce(&json!(0), &json!({}), &[]), json!("win"));
    }
    assert_eq!(beyond.load(Ordering::SeqCst), 0);
}

#[test]
fn first_without_matches_returns_the_state() {
    let combined = first([on_action(act("X").build()).with(label("x"))]).unwrap();
    let state = json!({"untouched": true});
    assert_eq!(combined.reduce(&state, &act("Y").build(), &[]), state);
}

#[test]
fn with_default_returns_default_without_touching_the_matcher() {
    let calls = Arc::new(AtomicUsize::new(0));
    let reducer = when(counting_condition(&calls, true))
        .with(label("ran"))
        .with_default(json!({"initial": true}));

    assert_eq!(reducer.reduce(None, &act("ANY").build(), &[]), json!({"initial": true}));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(reducer.reduce(Some(&json!(0)), &act("ANY").build(), &[]), json!("ran"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn action_shape_matching_is_partial() {
    let m = on_action(json!({"a": 1, "b": 2})).with(label("hit"));

    // Exact and superset match; missing or wrong-valued fields do not.
    assert_eq!(m.reduce(&json!(0), &json!({"a": 1, "b": 2}), &[]), json!("hit"));
    assert_eq!(m.reduce(&json!(0), &json!({"a": 1, "b": 2, "c": 3}), &[]), json!("hit"));
    assert_eq!(m.reduce(&json!(0), &json!({"a": 1}), &[]), json!(0));
    assert_eq!(m.reduce(&json!(0), &json!({"a": 1, "b": 3}), &[]), json!(0));
}

#[test]
fn group_gates_entry_and_arms_discriminate() {
    let grouped = group(Shape::fields([("slice", Shape::matching(&ValueMatchSpec::Defined).unwrap())]))
        .with([
            Arm::matcher(on_action(json!({"slice": "inc"})).with(
                |s: &Value, _: &Value, _: &[Value]| json!(s.as_i64().unwrap() + 1),
            )),
            Arm::transform(label("fallthrough")),
        ])
        .unwrap();

    // Outer guard: the action must carry the slice field at all.
    assert_eq!(grouped.reduce(&json!(1), &json!({"other": 1}), &[]), json!(1));
    // Inner arms: first match wins, plain transform is the tail case.
    assert_eq!(grouped.reduce(&json!(1), &json!({"slice": "inc"}), &[]), json!(2));
    assert_eq!(grouped.reduce(&json!(1), &json!({"slice": "other"}), &[]), json!("fallthrough"));
}

#[test]
fn rebinding_never_mutates_the_original() {
    let base = on_action(act("T").build());
    let one = base.with(label("one"));
    let two = base.with(label("two"));

    let action = act("T").build();
    assert_eq!(one.reduce(&json!(0), &action, &[]), json!("one"));
    assert_eq!(two.reduce(&json!(0), &action, &[]), json!("two"));
    // The base still carries the identity transform.
    assert_eq!(base.reduce(&json!(0), &action, &[]), json!(0));
}

#[test]
fn reducers_are_idempotent_on_identical_calls() {
    let reducer = first([
        on_action(act("PUSH").build()).with(|s: &Value, a: &Value, _: &[Value]| {
            let mut items = s.as_array().cloned().unwrap_or_default();
            items.push(a["item"].clone());
            Value::Array(items)
        }),
    ])
    .unwrap()
    .with_default(json!([]));

    let state = json!([1]);
    let action = act("PUSH").with("item", 2).build();

    let once = reducer.reduce(Some(&state), &action, &[]);
    let twice = reducer.reduce(Some(&state), &action, &[]);
    assert_eq!(once, twice);
    assert_eq!(once, json!([1, 2]));
    // The input state value is untouched.
    assert_eq!(state, json!([1]));
}

#[test]
fn trace_agrees_with_evaluation_across_the_surface() {
    let condition = Condition::All(vec![
        Condition::Action(Shape::partial(&json!({"type": "ADD"}))),
        Condition::Not(Box::new(Condition::State(Shape::partial(&json!({"locked": true}))))),
    ]);

    let cases = [
        (json!({"locked": false}), act("ADD").build()),
        (json!({"locked": true}), act("ADD").build()),
        (json!({"locked": false}), act("DEL").build()),
    ];
    for (state, action) in cases {
        assert_eq!(
            condition.evaluate(&state, &action, &[]),
            condition.evaluate_with_trace(&state, &action, &[]).matched()
        );
    }
}
