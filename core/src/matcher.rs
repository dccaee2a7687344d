//! `Matcher` — Condition/transform pairs with first-match-wins combination
//!
//! A `Matcher` pairs one [`Condition`] with one [`Transform`]. Invoked as a
//! reducer it applies the transform when the condition holds and returns the
//! state unchanged otherwise. [`first`] combines many matchers into one with
//! strict left-to-right precedence; [`with_default`] supplies the initial
//! state for an uninitialized store.

use crate::{Condition, Identity, ReducerError, Transform, MAX_DEPTH};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// An immutable condition/transform pair, callable as a transition function.
///
/// # INV: Identity fallback
///
/// `reduce(state, action, extras)` returns `transform(state, action,
/// extras)` when the condition holds, and `state` unchanged when it does
/// not. Combinators that already checked the condition apply the transform
/// directly so the fallback is never applied twice.
///
/// # Functional update
///
/// [`with`](Self::with) returns a **new** Matcher sharing the same condition
/// with a different transform; the original Matcher and its condition are
/// never mutated. A freshly constructed Matcher carries the [`Identity`]
/// transform.
///
/// # Example
///
/// ```
/// use remat::prelude::*;
/// use serde_json::json;
///
/// let add = when(Condition::Action(Shape::partial(&json!({"type": "ADD"}))))
///     .with(|state: &Value, _: &Value, _: &[Value]| json!(state.as_i64().unwrap_or(0) + 1));
///
/// assert_eq!(add.reduce(&json!(1), &json!({"type": "ADD"}), &[]), json!(2));
/// assert_eq!(add.reduce(&json!(1), &json!({"type": "DEL"}), &[]), json!(1));
/// ```
#[derive(Clone)]
pub struct Matcher {
    condition: Condition,
    transform: Arc<dyn Transform>,
}

impl Matcher {
    /// Create a matcher with the identity transform.
    pub fn new(condition: impl Into<Condition>) -> Self {
        Self {
            condition: condition.into(),
            transform: Arc::new(Identity),
        }
    }

    /// Return a new matcher sharing this matcher's condition with a
    /// different transform. `self` is unchanged.
    #[must_use]
    pub fn with(&self, transform: impl Transform + 'static) -> Self {
        self.with_shared(Arc::new(transform))
    }

    /// [`with`](Self::with) for an already-shared transform.
    #[must_use]
    pub fn with_shared(&self, transform: Arc<dyn Transform>) -> Self {
        Self {
            condition: self.condition.clone(),
            transform,
        }
    }

    /// The condition gating this matcher.
    ///
    /// Reading the condition never invokes the transform — this is how
    /// [`first`] scans matchers without applying identity fallbacks.
    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// The transform this matcher applies on a match.
    #[must_use]
    pub fn transform(&self) -> &Arc<dyn Transform> {
        &self.transform
    }

    /// Reduce one call: apply the transform if the condition holds, return
    /// the state unchanged otherwise.
    pub fn reduce(&self, state: &Value, action: &Value, extra: &[Value]) -> Value {
        if self.condition.evaluate(state, action, extra) {
            self.transform.apply(state, action, extra)
        } else {
            state.clone()
        }
    }

    /// Wrap this matcher with an initial-state default.
    ///
    /// See [`with_default`].
    #[must_use]
    pub fn with_default(self, default: Value) -> WithDefault {
        with_default(default, self)
    }

    /// Calculate the depth of this matcher's condition tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.condition.depth()
    }

    /// Validate this matcher against safety constraints.
    ///
    /// Checks that condition nesting does not exceed [`MAX_DEPTH`]. Config
    /// loading performs this automatically; call it directly when building
    /// deeply nested conditions by hand.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::DepthExceeded`] if nesting is too deep.
    pub fn validate(&self) -> Result<(), ReducerError> {
        let depth = self.depth();
        if depth > MAX_DEPTH {
            return Err(ReducerError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }
}

/// A matcher is itself a transform: applying it reduces the call with the
/// matcher's own condition and identity fallback. This is what lets whole
/// matchers be promoted with [`always`] or sequenced with
/// [`compose`](crate::compose).
impl Transform for Matcher {
    fn apply(&self, state: &Value, action: &Value, extra: &[Value]) -> Value {
        self.reduce(state, action, extra)
    }
}

impl Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("condition", &self.condition)
            .finish()
    }
}

/// Entry point: create a [`Matcher`] (identity transform) from a condition.
///
/// ```
/// use remat::prelude::*;
/// use serde_json::json;
///
/// let noop = when(Condition::Always);
/// assert_eq!(noop.reduce(&json!(5), &json!(null), &[]), json!(5));
/// ```
pub fn when(condition: impl Into<Condition>) -> Matcher {
    Matcher::new(condition)
}

/// Fallible entry point for dynamically supplied conditions.
///
/// A plain object becomes a partial-equality shape over the state.
///
/// # Errors
///
/// Returns [`ReducerError::InvalidCondition`] if the value is neither
/// predicate-like nor a plain structural object.
pub fn when_value(value: &Value) -> Result<Matcher, ReducerError> {
    Ok(Matcher::new(Condition::try_from_value(value)?))
}

/// Promote a transform (or a whole matcher) into an unconditional matcher.
///
/// The result's condition is constant-true, so the transform always runs.
pub fn always(transform: impl Transform + 'static) -> Matcher {
    Matcher {
        condition: Condition::Always,
        transform: Arc::new(transform),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// first — left-to-right precedence
// ═══════════════════════════════════════════════════════════════════════════════

/// First-match-wins transform over a list of matchers.
struct First {
    branches: Vec<Matcher>,
}

impl Transform for First {
    fn apply(&self, state: &Value, action: &Value, extra: &[Value]) -> Value {
        // Scan conditions in order; the first hit's transform is applied
        // directly (never the matcher itself, which would re-check the
        // condition and re-apply the identity fallback).
        for branch in &self.branches {
            if branch.condition.evaluate(state, action, extra) {
                return branch.transform.apply(state, action, extra);
            }
        }
        state.clone()
    }
}

/// Combine matchers with strict left-to-right precedence.
///
/// The result is an unconditional [`Matcher`] whose transform:
///
/// 1. Scans the given matchers **in the order supplied**.
/// 2. Evaluates each matcher's *condition* against the call.
/// 3. On the first condition that holds, applies **that matcher's
///    transform** and returns the result. Later matchers are never
///    evaluated (short-circuit).
/// 4. If none match, returns the state unchanged.
///
/// # Errors
///
/// Returns [`ReducerError::InvalidArgument`] when called with zero matchers.
///
/// # Example
///
/// ```
/// use remat::prelude::*;
/// use serde_json::json;
///
/// let router = first([
///     on_action(json!({"type": "SET"}))
///         .with(|_: &Value, action: &Value, _: &[Value]| action["value"].clone()),
///     on_action(json!({"type": "CLEAR"})).with(|_: &Value, _: &Value, _: &[Value]| json!(null)),
/// ])
/// .unwrap();
///
/// assert_eq!(router.reduce(&json!(0), &json!({"type": "SET", "value": 9}), &[]), json!(9));
/// assert_eq!(router.reduce(&json!(9), &json!({"type": "OTHER"}), &[]), json!(9));
/// ```
pub fn first<I>(matchers: I) -> Result<Matcher, ReducerError>
where
    I: IntoIterator<Item = Matcher>,
{
    let branches: Vec<Matcher> = matchers.into_iter().collect();
    if branches.is_empty() {
        return Err(ReducerError::InvalidArgument {
            reason: "first requires at least one matcher".to_string(),
        });
    }
    Ok(Matcher {
        condition: Condition::Always,
        transform: Arc::new(First { branches }),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// with_default — initial state
// ═══════════════════════════════════════════════════════════════════════════════

/// A matcher wrapped with an initial-state value.
///
/// Reducing with `None` state (an uninitialized store) returns the default
/// **without evaluating the matcher's condition or transform**; any defined
/// state delegates entirely to the matcher. This mirrors the reducer
/// initial-state convention of host state containers.
#[derive(Clone, Debug)]
pub struct WithDefault {
    default: Value,
    matcher: Matcher,
}

impl WithDefault {
    /// Reduce one call, substituting the default for `None` state.
    pub fn reduce(&self, state: Option<&Value>, action: &Value, extra: &[Value]) -> Value {
        match state {
            None => self.default.clone(),
            Some(state) => self.matcher.reduce(state, action, extra),
        }
    }

    /// The initial-state value.
    #[must_use]
    pub fn default_state(&self) -> &Value {
        &self.default
    }

    /// The wrapped matcher.
    #[must_use]
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

/// Give a composed matcher an initial-state value.
///
/// See [`WithDefault`].
#[must_use]
pub fn with_default(default: Value, matcher: Matcher) -> WithDefault {
    WithDefault { default, matcher }
}
