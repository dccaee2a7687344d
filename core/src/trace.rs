//! Evaluation trace types for debugging condition behavior.
//!
//! Trace types mirror the runtime types ([`Shape`](crate::Shape),
//! [`Condition`](crate::Condition)) but capture evaluation results instead
//! of inputs. Use `matches_with_trace()` / `evaluate_with_trace()` to get
//! full visibility into why a reducer did or did not fire.
//!
//! # INV: trace result == plain result
//!
//! A trace's `matched()` always equals what the plain evaluation would
//! return for the same input. In All/Any/Fields, ALL children are evaluated
//! (no short-circuit) for maximum debugging value.

use std::fmt;

/// Trace of a [`Shape`](crate::Shape) evaluation.
pub enum ShapeTrace {
    /// A leaf evaluation (predicate, equality, or value matcher).
    Leaf {
        /// Whether this leaf matched.
        matched: bool,
        /// Human-readable description of the leaf (e.g. `Equals("ADD")`).
        detail: String,
    },
    /// A fields node: every listed field evaluated against its value.
    Fields {
        /// Whether all fields matched.
        matched: bool,
        /// Per-field traces, in field order (all evaluated, no
        /// short-circuit).
        children: Vec<(String, ShapeTrace)>,
    },
}

impl ShapeTrace {
    /// Get the overall match result of this shape.
    #[must_use]
    pub fn matched(&self) -> bool {
        match self {
            Self::Leaf { matched, .. } | Self::Fields { matched, .. } => *matched,
        }
    }
}

impl fmt::Debug for ShapeTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf { matched, detail } => f
                .debug_struct("Leaf")
                .field("matched", matched)
                .field("detail", detail)
                .finish(),
            Self::Fields { matched, children } => f
                .debug_struct("Fields")
                .field("matched", matched)
                .field("children", children)
                .finish(),
        }
    }
}

/// Trace of a [`Condition`](crate::Condition) evaluation.
pub enum ConditionTrace {
    /// The constant-true condition (always matched).
    Always,
    /// An opaque call predicate.
    Test {
        /// Whether the predicate held.
        matched: bool,
    },
    /// A structural match on the state.
    State {
        /// Whether the shape matched.
        matched: bool,
        /// The shape's own trace.
        shape: ShapeTrace,
    },
    /// A structural match on the action.
    Action {
        /// Whether the shape matched.
        matched: bool,
        /// The shape's own trace.
        shape: ShapeTrace,
    },
    /// ALL: every child must match.
    All {
        /// Whether all children matched.
        matched: bool,
        /// Trace of each child (all evaluated, no short-circuit).
        children: Vec<ConditionTrace>,
    },
    /// ANY: some child must match.
    Any {
        /// Whether any child matched.
        matched: bool,
        /// Trace of each child (all evaluated, no short-circuit).
        children: Vec<ConditionTrace>,
    },
    /// NOT: inverts the inner result.
    Not {
        /// Whether the NOT condition matched (i.e., inner did NOT match).
        matched: bool,
        /// Trace of the inner condition.
        inner: Box<ConditionTrace>,
    },
}

impl ConditionTrace {
    /// Get the overall match result of this condition.
    #[must_use]
    pub fn matched(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Test { matched }
            | Self::State { matched, .. }
            | Self::Action { matched, .. }
            | Self::All { matched, .. }
            | Self::Any { matched, .. }
            | Self::Not { matched, .. } => *matched,
        }
    }
}

impl fmt::Debug for ConditionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.debug_tuple("Always").finish(),
            Self::Test { matched } => f.debug_struct("Test").field("matched", matched).finish(),
            Self::State { matched, shape } => f
                .debug_struct("State")
                .field("matched", matched)
                .field("shape", shape)
                .finish(),
            Self::Action { matched, shape } => f
                .debug_struct("Action")
                .field("matched", matched)
                .field("shape", shape)
                .finish(),
            Self::All { matched, children } => f
                .debug_struct("All")
                .field("matched", matched)
                .field("children", children)
                .finish(),
            Self::Any { matched, children } => f
                .debug_struct("Any")
                .field("matched", matched)
                .field("children", children)
                .finish(),
            Self::Not { matched, inner } => f
                .debug_struct("Not")
                .field("matched", matched)
                .field("inner", inner)
                .finish(),
        }
    }
}
