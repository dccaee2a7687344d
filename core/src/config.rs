//! Config types for config-driven reducer construction.
//!
//! These types mirror the runtime types but are serde-deserializable,
//! enabling reducers to be loaded from JSON/YAML via
//! [`Registry::load_reducer()`](crate::Registry::load_reducer).
//!
//! # Relationship to runtime types
//!
//! | Config type | Runtime type | Loader |
//! |-------------|--------------|--------|
//! | [`ReducerConfig`] | [`WithDefault`](crate::WithDefault) | `Registry::load_reducer()` |
//! | [`MatcherConfig`] | [`Matcher`](crate::Matcher) | `Registry::load_matcher()` |
//! | [`ConditionConfig`] | [`Condition`](crate::Condition) | [`compile()`](ConditionConfig::compile) |
//! | [`ShapeConfig`] | [`Shape`](crate::Shape) | [`compile()`](ShapeConfig::compile) |
//! | [`TransformRef`] | `Arc<dyn Transform>` | via registry factory |
//!
//! Conditions expressible in config are shape-based; call predicates
//! (`Condition::Test`) have no config form. Transforms are referenced by
//! registered name.

use crate::{Condition, ReducerError, Shape, ValueMatchSpec};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Configuration for a whole reducer: initial state plus an ordered list of
/// matchers combined with first-match-wins precedence.
#[derive(Debug, Clone, Deserialize)]
pub struct ReducerConfig {
    /// The initial state substituted for an uninitialized store.
    pub default: Value,

    /// Matchers to evaluate in order (first-match-wins).
    pub matchers: Vec<MatcherConfig>,
}

/// Configuration for a single [`Matcher`](crate::Matcher).
#[derive(Debug, Clone, Deserialize)]
pub struct MatcherConfig {
    /// The condition gating this matcher.
    pub when: ConditionConfig,

    /// The transform applied on a match, resolved by name through the
    /// registry. Omitted means the identity transform.
    #[serde(default)]
    pub then: Option<TransformRef>,
}

/// Reference to a registered transform with its configuration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TransformRef {
    /// The name the transform was registered under.
    pub name: String,

    /// Transform-specific configuration payload.
    /// Deserialized as the `Config` associated type of the registered
    /// [`IntoTransform`](crate::IntoTransform).
    #[serde(default = "default_config")]
    pub config: Value,
}

fn default_config() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Configuration for a [`Condition`](crate::Condition).
///
/// Uses `#[serde(tag = "type")]` for discriminated union deserialization:
///
/// ```json
/// { "type": "always" }
/// { "type": "action", "shape": { "kind": "ADD" } }
/// { "type": "all", "conditions": [...] }
/// { "type": "any", "conditions": [...] }
/// { "type": "not", "condition": { ... } }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ConditionConfig {
    /// The constant-true condition.
    #[serde(rename = "always")]
    Always,

    /// A shape applied to the state (first argument).
    #[serde(rename = "state")]
    State {
        /// The structural condition.
        shape: ShapeConfig,
    },

    /// A shape applied to the action (second argument).
    #[serde(rename = "action")]
    Action {
        /// The structural condition.
        shape: ShapeConfig,
    },

    /// All conditions must hold (logical AND).
    #[serde(rename = "all")]
    All {
        /// Child conditions (all must hold).
        conditions: Vec<ConditionConfig>,
    },

    /// Any condition must hold (logical OR).
    #[serde(rename = "any")]
    Any {
        /// Child conditions (any must hold).
        conditions: Vec<ConditionConfig>,
    },

    /// Inverts the inner condition (logical NOT).
    #[serde(rename = "not")]
    Not {
        /// The condition to negate.
        condition: Box<ConditionConfig>,
    },
}

impl ConditionConfig {
    /// Compile this config into a runtime [`Condition`].
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::InvalidPattern`] or
    /// [`ReducerError::PatternTooLong`] from leaf compilation.
    pub fn compile(&self) -> Result<Condition, ReducerError> {
        match self {
            Self::Always => Ok(Condition::Always),
            Self::State { shape } => Ok(Condition::State(shape.compile()?)),
            Self::Action { shape } => Ok(Condition::Action(shape.compile()?)),
            Self::All { conditions } => Ok(Condition::All(
                conditions.iter().map(Self::compile).collect::<Result<_, _>>()?,
            )),
            Self::Any { conditions } => Ok(Condition::Any(
                conditions.iter().map(Self::compile).collect::<Result<_, _>>()?,
            )),
            Self::Not { condition } => Ok(Condition::Not(Box::new(condition.compile()?))),
        }
    }
}

/// Configuration for a [`Shape`](crate::Shape).
///
/// Uses untagged deserialization — order matters!
///
/// 1. A [`ValueMatchSpec`] leaf first (objects with a known strategy key,
///    e.g. `{ "prefix": "todo/" }`, or the bare string `"defined"`).
/// 2. Then a field mapping, each value itself a `ShapeConfig`.
/// 3. Any other literal last, matched by deep equality.
///
/// A field literally named `prefix`/`equals`/... therefore cannot be
/// expressed as a bare mapping — wrap the value in `{ "equals": ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShapeConfig {
    // Try leaf specs first (they have specific keys)
    /// A leaf match spec, e.g. `{ "regex": "^todo/" }`.
    Match(ValueMatchSpec),

    /// Field mapping: every listed field must match.
    Fields(BTreeMap<String, ShapeConfig>),

    // Literal last (most general)
    /// A literal compared by deep equality.
    Equals(Value),
}

impl ShapeConfig {
    /// Compile this config into a runtime [`Shape`].
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::InvalidPattern`] or
    /// [`ReducerError::PatternTooLong`] from leaf compilation.
    pub fn compile(&self) -> Result<Shape, ReducerError> {
        match self {
            Self::Match(spec) => Shape::matching(spec),
            Self::Fields(fields) => Ok(Shape::Fields(
                fields
                    .iter()
                    .map(|(key, shape)| Ok((key.clone(), shape.compile()?)))
                    .collect::<Result<_, ReducerError>>()?,
            )),
            Self::Equals(value) => Ok(Shape::Equals(value.clone())),
        }
    }
}
