//! `Transform` — State computation from a reducer call
//!
//! A `Transform` computes the next state from `(state, action, extras)`.
//! Plain closures implement it directly; [`Identity`] returns the state
//! unchanged; [`compose`] threads a state through a transform pipeline.

use serde_json::Value;
use std::sync::Arc;

/// Computes a new state from a reducer call.
///
/// Implemented by any `Fn(&Value, &Value, &[Value]) -> Value + Send + Sync`
/// closure, so most transforms are written inline:
///
/// ```
/// use remat::Transform;
/// use serde_json::{json, Value};
///
/// let bump = |state: &Value, _: &Value, _: &[Value]| json!(state.as_i64().unwrap_or(0) + 1);
/// assert_eq!(bump.apply(&json!(1), &json!(null), &[]), json!(2));
/// ```
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so composed reducers can be
/// shared across threads after construction.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Transform`",
    label = "this type cannot compute a new state",
    note = "Transform is implemented by `Fn(&Value, &Value, &[Value]) -> Value + Send + Sync` closures, by `Identity`, and by `Matcher`"
)]
pub trait Transform: Send + Sync {
    /// Compute the next state for the given call.
    fn apply(&self, state: &Value, action: &Value, extra: &[Value]) -> Value;
}

impl<F> Transform for F
where
    F: Fn(&Value, &Value, &[Value]) -> Value + Send + Sync,
{
    fn apply(&self, state: &Value, action: &Value, extra: &[Value]) -> Value {
        self(state, action, extra)
    }
}

// Blanket implementations for boxed/shared transforms
#[diagnostic::do_not_recommend]
impl Transform for Box<dyn Transform> {
    fn apply(&self, state: &Value, action: &Value, extra: &[Value]) -> Value {
        (**self).apply(state, action, extra)
    }
}

#[diagnostic::do_not_recommend]
impl Transform for Arc<dyn Transform> {
    fn apply(&self, state: &Value, action: &Value, extra: &[Value]) -> Value {
        (**self).apply(state, action, extra)
    }
}

impl std::fmt::Debug for dyn Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<transform>")
    }
}

/// The identity transform: returns the first argument (the state) unchanged.
///
/// This is the default transform of a freshly constructed
/// [`Matcher`](crate::Matcher) and the no-match fallback everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transform for Identity {
    fn apply(&self, state: &Value, _action: &Value, _extra: &[Value]) -> Value {
        state.clone()
    }
}

/// Sequential composition of transforms.
///
/// Threads an evolving state through each step in the order supplied: every
/// step receives the *current* accumulated state as its first argument and
/// the original action/extras unchanged. An empty composition is the
/// identity.
///
/// # Example
///
/// ```
/// use remat::{compose, Transform};
/// use serde_json::{json, Value};
///
/// let inc = |state: &Value, _: &Value, _: &[Value]| json!(state.as_i64().unwrap() + 1);
/// let double = |state: &Value, _: &Value, _: &[Value]| json!(state.as_i64().unwrap() * 2);
///
/// let pipeline = compose(vec![]).then(inc).then(double);
/// assert_eq!(pipeline.apply(&json!(3), &json!(null), &[]), json!(8));
/// ```
pub struct Composed {
    steps: Vec<Arc<dyn Transform>>,
}

impl Composed {
    /// Append a step to the pipeline (builder pattern).
    #[must_use]
    pub fn then(mut self, step: impl Transform + 'static) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the pipeline has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transform for Composed {
    fn apply(&self, state: &Value, action: &Value, extra: &[Value]) -> Value {
        let mut state = state.clone();
        for step in &self.steps {
            state = step.apply(&state, action, extra);
        }
        state
    }
}

impl std::fmt::Debug for Composed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composed").field("steps", &self.steps.len()).finish()
    }
}

/// Build a sequential transform pipeline from already-shared steps.
///
/// Prefer the [`Composed::then`] builder when composing closures of
/// different types:
///
/// ```
/// # use remat::compose;
/// # use serde_json::{json, Value};
/// let pipeline = compose(vec![])
///     .then(|s: &Value, _: &Value, _: &[Value]| json!(s.as_i64().unwrap() + 1));
/// ```
#[must_use]
pub fn compose(steps: Vec<Arc<dyn Transform>>) -> Composed {
    Composed { steps }
}
