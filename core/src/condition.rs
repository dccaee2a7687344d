//! `Condition` — Predicates over a full reducer call
//!
//! A `Condition` gates a transform. It sees the entire call — state, action,
//! and any extra arguments — and can be composed with ALL/ANY/NOT.

use crate::trace::ConditionTrace;
use crate::{ReducerError, Shape};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A predicate over a reducer call `(state, action, extras)`.
///
/// # Variants
///
/// - `Always` — The constant-true predicate
/// - `Test` — An arbitrary predicate over the whole call
/// - `State` — A [`Shape`] applied to the first argument only
/// - `Action` — A [`Shape`] applied to the second argument only
/// - `All` — Every child must hold (short-circuits on the first `false`)
/// - `Any` — Some child must hold (short-circuits on the first `true`)
/// - `Not` — Inverts the inner condition
///
/// # Example
///
/// ```
/// use remat::{Condition, Shape};
/// use serde_json::json;
///
/// // Hold only for ADD actions on a non-empty state.
/// let condition = Condition::All(vec![
///     Condition::Action(Shape::partial(&json!({"type": "ADD"}))),
///     Condition::test(|state, _, _| !state.is_null()),
/// ]);
///
/// assert!(condition.evaluate(&json!(1), &json!({"type": "ADD"}), &[]));
/// assert!(!condition.evaluate(&json!(null), &json!({"type": "ADD"}), &[]));
/// ```
#[derive(Clone)]
pub enum Condition {
    /// The constant-true predicate.
    Always,

    /// An arbitrary predicate over the whole call.
    Test(Arc<dyn Fn(&Value, &Value, &[Value]) -> bool + Send + Sync>),

    /// Structural match on the first argument (the state).
    State(Shape),

    /// Structural match on the second argument (the action).
    Action(Shape),

    /// All conditions must hold (logical AND).
    /// Short-circuits on the first `false`.
    All(Vec<Condition>),

    /// Any condition must hold (logical OR).
    /// Short-circuits on the first `true`.
    Any(Vec<Condition>),

    /// Inverts the inner condition (logical NOT).
    Not(Box<Condition>),
}

impl Condition {
    /// Create a condition from a call predicate.
    pub fn test<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &Value, &[Value]) -> bool + Send + Sync + 'static,
    {
        Self::Test(Arc::new(predicate))
    }

    /// Build a condition from a dynamic value: a plain object becomes a
    /// partial-equality [`State`](Self::State) shape.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::InvalidCondition`] for anything that is not a
    /// plain object — scalars and arrays cannot describe a condition.
    pub fn try_from_value(value: &Value) -> Result<Self, ReducerError> {
        match value {
            Value::Object(_) => Ok(Self::State(Shape::partial(value))),
            other => Err(ReducerError::InvalidCondition {
                found: json_type_name(other).to_string(),
            }),
        }
    }

    /// Evaluate this condition against the given call.
    pub fn evaluate(&self, state: &Value, action: &Value, extra: &[Value]) -> bool {
        match self {
            Self::Always => true,
            Self::Test(predicate) => predicate(state, action, extra),
            Self::State(shape) => shape.matches(state),
            Self::Action(shape) => shape.matches(action),
            Self::All(conditions) => conditions.iter().all(|c| c.evaluate(state, action, extra)),
            Self::Any(conditions) => conditions.iter().any(|c| c.evaluate(state, action, extra)),
            Self::Not(condition) => !condition.evaluate(state, action, extra),
        }
    }

    /// Evaluate with full trace for debugging.
    ///
    /// Unlike [`evaluate()`](Self::evaluate), this does NOT short-circuit
    /// All/Any — all children are evaluated for maximum debugging
    /// visibility. The `matched` result is still correct.
    #[must_use]
    pub fn evaluate_with_trace(&self, state: &Value, action: &Value, extra: &[Value]) -> ConditionTrace {
        match self {
            Self::Always => ConditionTrace::Always,
            Self::Test(predicate) => ConditionTrace::Test {
                matched: predicate(state, action, extra),
            },
            Self::State(shape) => {
                let shape = shape.matches_with_trace(state);
                ConditionTrace::State {
                    matched: shape.matched(),
                    shape,
                }
            }
            Self::Action(shape) => {
                let shape = shape.matches_with_trace(action);
                ConditionTrace::Action {
                    matched: shape.matched(),
                    shape,
                }
            }
            Self::All(conditions) => {
                let children: Vec<ConditionTrace> = conditions
                    .iter()
                    .map(|c| c.evaluate_with_trace(state, action, extra))
                    .collect();
                let matched = children.iter().all(ConditionTrace::matched);
                ConditionTrace::All { matched, children }
            }
            Self::Any(conditions) => {
                let children: Vec<ConditionTrace> = conditions
                    .iter()
                    .map(|c| c.evaluate_with_trace(state, action, extra))
                    .collect();
                let matched = children.iter().any(ConditionTrace::matched);
                ConditionTrace::Any { matched, children }
            }
            Self::Not(condition) => {
                let inner = condition.evaluate_with_trace(state, action, extra);
                ConditionTrace::Not {
                    matched: !inner.matched(),
                    inner: Box::new(inner),
                }
            }
        }
    }

    /// Compose conditions with AND semantics, optimizing for common cases.
    ///
    /// - Empty → `Always` (no conditions = match everything)
    /// - Single → unwrapped (no wrapping overhead)
    /// - Multiple → `All(conditions)`
    #[must_use]
    #[allow(clippy::missing_panics_doc)] // unwrap guarded by len() == 1
    pub fn from_all(conditions: Vec<Self>) -> Self {
        match conditions.len() {
            0 => Self::Always,
            1 => conditions.into_iter().next().unwrap(),
            _ => Self::All(conditions),
        }
    }

    /// Compose conditions with OR semantics, optimizing for common cases.
    ///
    /// Symmetric with [`from_all`](Self::from_all).
    #[must_use]
    #[allow(clippy::missing_panics_doc)] // unwrap guarded by len() == 1
    pub fn from_any(conditions: Vec<Self>) -> Self {
        match conditions.len() {
            0 => Self::Always,
            1 => conditions.into_iter().next().unwrap(),
            _ => Self::Any(conditions),
        }
    }

    /// Returns `true` if this is the `Always` condition.
    #[must_use]
    pub fn is_always(&self) -> bool {
        matches!(self, Self::Always)
    }

    /// Returns `true` if this is an `All` condition.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All(_))
    }

    /// Returns `true` if this is an `Any` condition.
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any(_))
    }

    /// Calculate the depth of this condition tree.
    ///
    /// Shape depth counts toward condition depth. Used for depth limit
    /// validation at config time.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Always | Self::Test(_) => 1,
            Self::State(shape) | Self::Action(shape) => 1 + shape.depth(),
            Self::All(cs) | Self::Any(cs) => 1 + cs.iter().map(Condition::depth).max().unwrap_or(0),
            Self::Not(c) => 1 + c.depth(),
        }
    }
}

impl From<Shape> for Condition {
    /// A bare shape is a structural condition on the state (the first call
    /// argument), matching the entry-point convention.
    fn from(shape: Shape) -> Self {
        Self::State(shape)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.debug_tuple("Always").finish(),
            Self::Test(_) => f.debug_tuple("Test").finish(),
            Self::State(shape) => f.debug_tuple("State").field(shape).finish(),
            Self::Action(shape) => f.debug_tuple("Action").field(shape).finish(),
            Self::All(cs) => f.debug_tuple("All").field(&cs.len()).finish(),
            Self::Any(cs) => f.debug_tuple("Any").field(&cs.len()).finish(),
            Self::Not(_) => f.debug_tuple("Not").finish(),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
