//! Action adapters — conditions over the action argument and grouped dispatch
//!
//! Reducer authors mostly discriminate on the *action* (the second call
//! argument), not the state. These adapters narrow structural conditions to
//! the action, and [`group`] builds one reducer from many action-type
//! branches behind a single outer guard.

use crate::{always, first, when, Condition, Matcher, ReducerError, Shape, Transform};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// Narrow a structural shape to the action: the resulting condition ignores
/// the state entirely and applies the shape to the second call argument.
#[must_use]
pub fn action_shape(shape: Shape) -> Condition {
    Condition::Action(shape)
}

/// Partial-equality condition on the action.
///
/// Every field of `value` must be present on the action with an equal value
/// (deep equality, recursively partial); extra action fields are ignored.
#[must_use]
pub fn action_equals(value: Value) -> Condition {
    Condition::Action(Shape::partial(&value))
}

/// Matcher whose condition exact-matches the given action shape, ready for
/// [`with`](Matcher::with).
///
/// ```
/// use remat::prelude::*;
/// use serde_json::json;
///
/// let m = on_action(json!({"type": "ADD", "kind": "todo"}))
///     .with(|_: &Value, _: &Value, _: &[Value]| json!("matched"));
///
/// assert_eq!(
///     m.reduce(&json!(0), &json!({"type": "ADD", "kind": "todo", "id": 7}), &[]),
///     json!("matched")
/// );
/// assert_eq!(m.reduce(&json!(0), &json!({"type": "ADD"}), &[]), json!(0));
/// ```
#[must_use]
pub fn on_action(value: Value) -> Matcher {
    when(action_equals(value))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Arm — the plain-transform vs. matcher sum type
// ═══════════════════════════════════════════════════════════════════════════════

/// One branch of a [`Group`]: either a plain transform or a full matcher.
///
/// Plain transforms are promoted to unconditional matchers via [`always`]
/// when the group is combined; matchers keep their own conditions and
/// discriminate among themselves. Combinators pattern-match on this tag —
/// there is no runtime probing for "is this already a matcher".
pub enum Arm {
    /// A plain transform, promoted unconditionally.
    Transform(Arc<dyn Transform>),
    /// A matcher kept as-is, its condition intact.
    Matcher(Matcher),
}

impl Arm {
    /// Wrap a plain transform.
    pub fn transform(transform: impl Transform + 'static) -> Self {
        Self::Transform(Arc::new(transform))
    }

    /// Wrap a matcher.
    #[must_use]
    pub fn matcher(matcher: Matcher) -> Self {
        Self::Matcher(matcher)
    }

    /// Promote to a matcher: transforms become unconditional.
    fn promote(self) -> Matcher {
        match self {
            Self::Matcher(matcher) => matcher,
            Self::Transform(transform) => always(transform),
        }
    }
}

impl From<Matcher> for Arm {
    fn from(matcher: Matcher) -> Self {
        Self::Matcher(matcher)
    }
}

impl Debug for Arm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transform(_) => f.debug_tuple("Transform").finish(),
            Self::Matcher(m) => f.debug_tuple("Matcher").field(m).finish(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Group — two-level gated dispatch
// ═══════════════════════════════════════════════════════════════════════════════

/// A pending group of action branches behind one outer guard.
///
/// Built by [`group`]; consumed by [`with`](Self::with).
#[derive(Debug)]
pub struct Group {
    condition: Condition,
}

impl Group {
    /// The outer action condition gating the whole group.
    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Combine the arms with [`first`] and gate the result behind the
    /// group's outer action condition.
    ///
    /// Two-level gating: the outer condition guards entry to the whole
    /// group (no match → state unchanged, no arm evaluated); the arms' own
    /// conditions then discriminate among themselves with first-match-wins
    /// precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::InvalidArgument`] when called with zero arms.
    pub fn with<I>(self, arms: I) -> Result<Matcher, ReducerError>
    where
        I: IntoIterator<Item = Arm>,
    {
        let inner = first(arms.into_iter().map(Arm::promote))?;
        Ok(when(self.condition).with_shared(Arc::clone(inner.transform())))
    }
}

/// Build one reducer from many action-type branches behind an overall guard.
///
/// The shape is applied to the action only (via [`action_shape`]). The
/// usual idiom pairs a [`Defined`](crate::ValueMatchSpec::Defined)-style
/// guard ("only react if this slice of the action exists at all") with
/// per-case arms:
///
/// ```
/// use remat::prelude::*;
/// use serde_json::json;
///
/// let todos = group(Shape::fields([("scope", Shape::equals(json!("todos")))])).with([
///     Arm::matcher(on_action(json!({"type": "CLEAR"})).with(
///         |_: &Value, _: &Value, _: &[Value]| json!([]),
///     )),
///     // Plain transforms become the unconditional tail case.
///     Arm::transform(|state: &Value, _: &Value, _: &[Value]| state.clone()),
/// ])
/// .unwrap();
///
/// assert_eq!(
///     todos.reduce(&json!([1, 2]), &json!({"scope": "todos", "type": "CLEAR"}), &[]),
///     json!([])
/// );
/// // Outer guard fails: untouched, no arm consulted.
/// assert_eq!(
///     todos.reduce(&json!([1, 2]), &json!({"type": "CLEAR"}), &[]),
///     json!([1, 2])
/// );
/// ```
#[must_use]
pub fn group(shape: Shape) -> Group {
    Group {
        condition: action_shape(shape),
    }
}
