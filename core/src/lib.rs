//! remat - Matcher-combinator engine for composable state-transition reducers
//!
//! remat replaces deeply nested conditional dispatch in state-management code
//! with a small algebra of composable condition/transform pairs.
//!
//! # Architecture
//!
//! The engine is built from small values that compose:
//!
//! - [`Shape`] — Structural condition over one value (partial match, extra
//!   fields ignored)
//! - [`Condition`] — Predicate over a full reducer call `(state, action,
//!   extras)`, with boolean composition (All, Any, Not)
//! - [`Transform`] — Computes a new state from a call; implemented by plain
//!   closures
//! - [`Matcher`] — One condition paired with one transform; applies the
//!   transform when the condition holds, returns the state unchanged
//!   otherwise
//! - [`first`] — Combines matchers with first-match-wins precedence
//! - [`DispatchNode`] — Map-based dispatch on action properties (the
//!   parallel design; at most one leaf may match)
//!
//! # Key Design Insights
//!
//! 1. **Identity fallback**: a Matcher that does not match returns its first
//!    argument (the state) unchanged. Combinators read a Matcher's condition
//!    directly so the fallback is never applied twice.
//!
//! 2. **Missing data never matches**: a field absent from the tested value is
//!    surfaced to shape leaves as `Null`. Only an explicit `Equals(Null)`
//!    leaf (or a null-accepting predicate) matches it.
//!
//! 3. **Explicit sum types**: "plain transform vs. Matcher" is the [`Arm`]
//!    enum, and the dispatch tree is `Leaf | Branch` — combinators pattern
//!    match on tags instead of probing for callables.
//!
//! # Example
//!
//! ```
//! use remat::prelude::*;
//! use serde_json::json;
//!
//! // One reducer from many action-type branches, with an initial state.
//! let counter = first([
//!     on_action(json!({"type": "ADD"})).with(|state: &Value, action: &Value, _: &[Value]| {
//!         json!(state.as_i64().unwrap_or(0) + action["amount"].as_i64().unwrap_or(1))
//!     }),
//!     on_action(json!({"type": "RESET"})).with(|_: &Value, _: &Value, _: &[Value]| json!(0)),
//! ])
//! .unwrap()
//! .with_default(json!(0));
//!
//! // Uninitialized state takes the default without evaluating conditions.
//! assert_eq!(counter.reduce(None, &json!({"type": "INIT"}), &[]), json!(0));
//! assert_eq!(
//!     counter.reduce(Some(&json!(1)), &json!({"type": "ADD", "amount": 2}), &[]),
//!     json!(3)
//! );
//! // Unmatched actions leave the state unchanged.
//! assert_eq!(counter.reduce(Some(&json!(5)), &json!({"type": "NOOP"}), &[]), json!(5));
//! ```
//!
//! # Config loading
//!
//! With the `config` feature, whole reducers deserialize from JSON/YAML:
//! conditions are expressed as shapes, transforms are referenced by name and
//! resolved through a [`Registry`](crate::Registry).

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod action;
mod combine;
mod condition;
mod matcher;
mod shape;
mod trace;
mod transform;
mod tree;
mod value_match;

#[cfg(feature = "config")]
mod config;
#[cfg(feature = "config")]
mod registry;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use condition::Condition;
pub use matcher::{always, first, when, when_value, with_default, Matcher, WithDefault};
pub use shape::Shape;
pub use transform::{compose, Composed, Identity, Transform};
pub use value_match::{ValueMatchSpec, ValueMatcher};

// Action adapters
pub use action::{action_equals, action_shape, group, on_action, Arm, Group};

// Dispatch tree (parallel design)
pub use tree::{DispatchNode, DispatchReducer};

// Top-level reducer composition
pub use combine::{combine_reducers, Combined, Reduce};

// Trace types
pub use trace::{ConditionTrace, ShapeTrace};

// Config (feature-gated)
#[cfg(feature = "config")]
pub use config::{ConditionConfig, MatcherConfig, ReducerConfig, ShapeConfig, TransformRef};
#[cfg(feature = "config")]
pub use registry::{IntoTransform, Registry, RegistryBuilder};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use remat::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        action_equals,
        action_shape,
        always,
        combine_reducers,
        compose,
        first,
        group,
        on_action,
        when,
        when_value,
        with_default,
        Arm,
        Combined,
        Condition,
        // Trace types
        ConditionTrace,
        DispatchNode,
        DispatchReducer,
        Group,
        Identity,
        Matcher,
        Reduce,
        // Errors
        ReducerError,
        Shape,
        ShapeTrace,
        Transform,
        ValueMatchSpec,
        ValueMatcher,
        WithDefault,
    };

    // The value model the whole engine operates on.
    pub use serde_json::Value;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed nesting depth for conditions and shapes.
///
/// Protects against stack overflow from deeply nested structural conditions.
/// Enforced at config load time; available at runtime via
/// [`Matcher::validate`].
pub const MAX_DEPTH: usize = 32;

/// Maximum number of matchers combined by a single [`first`] group loaded
/// from configuration.
///
/// Prevents width-based resource exhaustion: a config with millions of
/// branches at depth 1 bypasses [`MAX_DEPTH`] but still scans linearly on
/// every call.
pub const MAX_BRANCHES: usize = 256;

/// Maximum length for non-regex string match patterns (prefix, suffix,
/// contains).
pub const MAX_PATTERN_LENGTH: usize = 8192;

/// Maximum length for regex patterns.
///
/// Regex compilation is expensive even with the linear-time Rust `regex`
/// crate, so the limit is shorter than [`MAX_PATTERN_LENGTH`].
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from reducer construction, combination, and dispatch.
///
/// All variants are programming-contract violations surfaced eagerly at
/// construction/call boundaries — fix the composition and rebuild. No
/// variant is a transient fault, and no partial result is ever produced
/// alongside one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReducerError {
    /// A dynamically supplied condition is neither predicate-like nor a
    /// plain structural object.
    InvalidCondition {
        /// What was found instead (JSON type name).
        found: String,
    },
    /// Wrong arity or wrong type passed to a combinator.
    InvalidArgument {
        /// What the combinator expected and what it got.
        reason: String,
    },
    /// The dispatch tree found more than one matching leaf for one action.
    ///
    /// Two or more independent branches matched simultaneously. This is a
    /// tree-authoring bug, not a runtime condition to recover from.
    AmbiguousDispatch {
        /// How many leaves matched.
        matches: usize,
    },
    /// `combine_reducers` was called with an empty mapping.
    MissingReducers,
    /// A regex pattern failed to compile.
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying error message.
        source: String,
    },
    /// Configuration deserialization or construction failed.
    InvalidConfig {
        /// The underlying error message.
        source: String,
    },
    /// A transform name was not found in the registry.
    UnknownTransform {
        /// The unregistered name.
        name: String,
        /// Names that ARE registered (for self-correcting error messages).
        available: Vec<String>,
    },
    /// Condition or shape nesting exceeds [`MAX_DEPTH`].
    DepthExceeded {
        /// Actual nesting depth.
        depth: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// Too many matchers in one configured `first` group.
    TooManyBranches {
        /// Actual count of branches.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// A string match pattern exceeds the maximum allowed length.
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
}

impl std::fmt::Display for ReducerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCondition { found } => {
                write!(
                    f,
                    "condition must be a predicate or a plain structural object, got {found}"
                )
            }
            Self::InvalidArgument { reason } => {
                write!(f, "invalid argument: {reason}")
            }
            Self::AmbiguousDispatch { matches } => {
                write!(
                    f,
                    "ambiguous dispatch: {matches} tree branches matched the same action \
                     — restructure the tree so at most one leaf can match"
                )
            }
            Self::MissingReducers => {
                write!(f, "combine_reducers requires a non-empty reducer mapping")
            }
            Self::InvalidPattern { pattern, source } => {
                write!(f, "invalid pattern \"{pattern}\": {source}")
            }
            Self::InvalidConfig { source } => {
                write!(f, "invalid config: {source}")
            }
            Self::UnknownTransform { name, available } => {
                write!(f, "unknown transform \"{name}\"")?;
                if available.is_empty() {
                    write!(f, " — no transforms are registered")
                } else {
                    write!(f, " — registered: {}", available.join(", "))
                }
            }
            Self::DepthExceeded { depth, max } => {
                write!(
                    f,
                    "condition nesting depth is {depth}, but maximum allowed is {max} \
                     — flatten your condition tree"
                )
            }
            Self::TooManyBranches { count, max } => {
                write!(f, "group has {count} branches, but maximum allowed is {max}")
            }
            Self::PatternTooLong { len, max } => {
                write!(f, "pattern length is {len}, but maximum allowed is {max}")
            }
        }
    }
}

impl std::error::Error for ReducerError {}
