//! `Shape` — Structural conditions over a single value
//!
//! A `Shape` describes what one value must look like: a tree whose interior
//! nodes name fields and whose leaves test the value found there. Matching is
//! always partial — fields not named by the shape are ignored.
//!
//! # INV: Missing data never matches
//!
//! A field absent from the tested value (or any field of a non-object) is
//! surfaced to the leaf as `Null`. A leaf therefore only matches an absent
//! field if it explicitly accepts null (`Equals(Null)` or a null-accepting
//! predicate). This keeps "the action has no such field" firmly on the
//! no-match side without a special case in every leaf.

use crate::trace::ShapeTrace;
use crate::{ReducerError, ValueMatchSpec, ValueMatcher};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A structural condition over one value.
///
/// Two interpretations of structural matching share this one sum type,
/// distinguished by leaf tag instead of by parallel interpreters:
///
/// - *shape* matching — [`Test`](Self::Test) leaves hold predicates applied
///   to the corresponding field
/// - *equality* matching — [`Equals`](Self::Equals) leaves hold literals
///   compared by deep equality; built en masse by [`partial()`](Self::partial)
///
/// # Example
///
/// ```
/// use remat::Shape;
/// use serde_json::json;
///
/// let shape = Shape::fields([
///     ("type", Shape::equals(json!("ADD"))),
///     ("amount", Shape::test(|v| v.as_i64().is_some_and(|n| n > 0))),
/// ]);
///
/// assert!(shape.matches(&json!({"type": "ADD", "amount": 2, "extra": true})));
/// assert!(!shape.matches(&json!({"type": "ADD", "amount": -1})));
/// assert!(!shape.matches(&json!({"type": "ADD"}))); // missing field
/// ```
#[derive(Clone)]
pub enum Shape {
    /// Leaf predicate applied to the value at this position.
    Test(Arc<dyn Fn(&Value) -> bool + Send + Sync>),

    /// Leaf literal compared by deep equality.
    Equals(Value),

    /// Compiled leaf matcher (prefix/suffix/contains/regex/defined).
    Match(ValueMatcher),

    /// Every listed field must match; unlisted fields are ignored.
    Fields(BTreeMap<String, Shape>),
}

impl Shape {
    /// Leaf predicate shape.
    pub fn test<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Test(Arc::new(predicate))
    }

    /// Leaf deep-equality shape.
    pub fn equals(expected: impl Into<Value>) -> Self {
        Self::Equals(expected.into())
    }

    /// Compile a [`ValueMatchSpec`] into a leaf shape.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::InvalidPattern`] or
    /// [`ReducerError::PatternTooLong`] from spec compilation.
    pub fn matching(spec: &ValueMatchSpec) -> Result<Self, ReducerError> {
        Ok(Self::Match(spec.compile()?))
    }

    /// Structural shape requiring every listed field to match.
    pub fn fields<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Shape)>,
    {
        Self::Fields(entries.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }

    /// Build an equality shape from a literal value: objects become
    /// [`Fields`](Self::Fields) recursively, everything else an
    /// [`Equals`](Self::Equals) leaf.
    ///
    /// The result matches any value carrying at least the given structure —
    /// a subset/partial match at every level, never a full equality check.
    #[must_use]
    pub fn partial(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Fields(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::partial(v)))
                    .collect(),
            ),
            other => Self::Equals(other.clone()),
        }
    }

    /// Evaluate this shape against the given value.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Test(predicate) => predicate(value),
            Self::Equals(expected) => value == expected,
            Self::Match(matcher) => matcher.matches(value),
            Self::Fields(fields) => fields
                .iter()
                .all(|(key, shape)| shape.matches(value.get(key).unwrap_or(&Value::Null))),
        }
    }

    /// Evaluate with full trace for debugging.
    ///
    /// Unlike [`matches()`](Self::matches), every field of a `Fields` shape
    /// is evaluated — no short-circuit — for maximum debugging visibility.
    /// The `matched` result is still correct.
    #[must_use]
    pub fn matches_with_trace(&self, value: &Value) -> ShapeTrace {
        match self {
            Self::Test(predicate) => ShapeTrace::Leaf {
                matched: predicate(value),
                detail: "Test".to_string(),
            },
            Self::Equals(expected) => ShapeTrace::Leaf {
                matched: value == expected,
                detail: format!("Equals({expected})"),
            },
            Self::Match(matcher) => ShapeTrace::Leaf {
                matched: matcher.matches(value),
                detail: matcher.to_string(),
            },
            Self::Fields(fields) => {
                let children: Vec<(String, ShapeTrace)> = fields
                    .iter()
                    .map(|(key, shape)| {
                        let field = value.get(key).unwrap_or(&Value::Null);
                        (key.clone(), shape.matches_with_trace(field))
                    })
                    .collect();
                let matched = children.iter().all(|(_, t)| t.matched());
                ShapeTrace::Fields { matched, children }
            }
        }
    }

    /// Calculate the depth of this shape tree.
    ///
    /// Used for depth limit validation at config time.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Test(_) | Self::Equals(_) | Self::Match(_) => 1,
            Self::Fields(fields) => 1 + fields.values().map(Shape::depth).max().unwrap_or(0),
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Test(_) => f.debug_tuple("Test").finish(),
            Self::Equals(v) => f.debug_tuple("Equals").field(v).finish(),
            Self::Match(m) => f.debug_tuple("Match").field(m).finish(),
            Self::Fields(fields) => f
                .debug_map()
                .entries(fields.iter().map(|(k, v)| (k.as_str(), v)))
                .finish(),
        }
    }
}
