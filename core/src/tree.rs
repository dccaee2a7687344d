//! Dispatch tree — map-based dispatch on action properties
//!
//! The parallel (legacy) design: instead of scanning matcher conditions, a
//! nested mapping from property name to property value locates exactly one
//! leaf transform for an action. At most one leaf may match; several is an
//! authoring error, reported as [`ReducerError::AmbiguousDispatch`].

use crate::{ReducerError, Transform};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// One node of a dispatch tree.
///
/// A `Branch` maps property name → property value → child node; a `Leaf`
/// holds the transform to apply. Only string-valued action properties
/// participate in lookup — numeric or boolean properties simply do not
/// dispatch.
///
/// # Example
///
/// ```
/// use remat::{DispatchNode, Transform};
/// use serde_json::{json, Value};
///
/// let tree = DispatchNode::branch()
///     .on("type", "ADD", DispatchNode::leaf(|s: &Value, _: &Value, _: &[Value]| {
///         json!(s.as_i64().unwrap() + 1)
///     }))
///     .on("type", "SUB", DispatchNode::leaf(|s: &Value, _: &Value, _: &[Value]| {
///         json!(s.as_i64().unwrap() - 1)
///     }));
///
/// let found = tree.find(&json!({"type": "ADD"})).unwrap().unwrap();
/// assert_eq!(found.apply(&json!(1), &json!({"type": "ADD"}), &[]), json!(2));
/// ```
#[derive(Clone)]
pub enum DispatchNode {
    /// A transform to apply — the match, once reached.
    Leaf(Arc<dyn Transform>),

    /// Property name → property value → child node.
    Branch(BTreeMap<String, BTreeMap<String, DispatchNode>>),
}

impl DispatchNode {
    /// Create a leaf node holding a transform.
    pub fn leaf(transform: impl Transform + 'static) -> Self {
        Self::Leaf(Arc::new(transform))
    }

    /// Create an empty branch node.
    #[must_use]
    pub fn branch() -> Self {
        Self::Branch(BTreeMap::new())
    }

    /// Create a branch with a single `property == value → child` entry.
    pub fn path(property: impl Into<String>, value: impl Into<String>, child: Self) -> Self {
        let mut by_value = BTreeMap::new();
        by_value.insert(value.into(), child);
        let mut properties = BTreeMap::new();
        properties.insert(property.into(), by_value);
        Self::Branch(properties)
    }

    /// Register `property == value → child` on this node (builder pattern).
    ///
    /// Equivalent to merging a single-entry branch; existing siblings are
    /// kept, and a leaf already registered at the same path is silently
    /// replaced (see [`merge`](Self::merge)).
    #[must_use]
    pub fn on(self, property: impl Into<String>, value: impl Into<String>, child: Self) -> Self {
        self.merge(Self::path(property, value, child))
    }

    /// Deep-merge another (partial) tree into this one.
    ///
    /// Branches merge recursively per property and value. Wherever either
    /// side is a leaf, the incoming node wins: **re-registering a path
    /// silently replaces the old handler** (last-write-wins).
    #[must_use]
    pub fn merge(self, incoming: Self) -> Self {
        match (self, incoming) {
            (Self::Branch(mut properties), Self::Branch(incoming_properties)) => {
                for (property, incoming_by_value) in incoming_properties {
                    let by_value = properties.entry(property).or_default();
                    for (value, incoming_child) in incoming_by_value {
                        let merged = match by_value.remove(&value) {
                            Some(existing) => existing.merge(incoming_child),
                            None => incoming_child,
                        };
                        by_value.insert(value, merged);
                    }
                }
                Self::Branch(properties)
            }
            // A leaf on either side ends the recursion: incoming wins.
            (_, incoming) => incoming,
        }
    }

    /// Locate the single leaf matching the given action.
    ///
    /// Recurses into every `property == value` edge the action satisfies and
    /// collects the results:
    ///
    /// - zero leaves → `Ok(None)` (a distinguished no-match, not an error)
    /// - exactly one → `Ok(Some(transform))`
    /// - several → [`ReducerError::AmbiguousDispatch`]
    ///
    /// The ambiguity rule is strict by design: sibling branches that each
    /// reach a leaf trigger it even when a reader might consider the action
    /// well-specified (independent properties dispatching independently).
    /// Keep discriminating properties disjoint per subtree to avoid it.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::AmbiguousDispatch`] when more than one leaf
    /// matches, at any level of the recursion.
    pub fn find(&self, action: &Value) -> Result<Option<&Arc<dyn Transform>>, ReducerError> {
        match self {
            Self::Leaf(transform) => Ok(Some(transform)),
            Self::Branch(properties) => {
                let mut found = None;
                let mut matches = 0;
                for (property, by_value) in properties {
                    let Some(key) = action.get(property).and_then(Value::as_str) else {
                        continue;
                    };
                    let Some(child) = by_value.get(key) else {
                        continue;
                    };
                    if let Some(transform) = child.find(action)? {
                        matches += 1;
                        found = Some(transform);
                    }
                }
                match matches {
                    0 => Ok(None),
                    1 => Ok(found),
                    n => Err(ReducerError::AmbiguousDispatch { matches: n }),
                }
            }
        }
    }
}

impl Debug for DispatchNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leaf(_) => f.debug_tuple("Leaf").finish(),
            Self::Branch(properties) => f
                .debug_map()
                .entries(
                    properties
                        .iter()
                        .map(|(property, by_value)| (property.as_str(), by_value)),
                )
                .finish(),
        }
    }
}

/// A tree-dispatch reducer: registry, default state, and the reducing call.
///
/// Populate the registry with [`add`](Self::add) at startup; reduce
/// afterwards. Reducing with `None` state substitutes the default.
///
/// # Example
///
/// ```
/// use remat::DispatchReducer;
/// use remat::DispatchNode;
/// use serde_json::{json, Value};
///
/// let mut reducer = DispatchReducer::new(json!(0));
/// reducer.add(DispatchNode::path("type", "ADD", DispatchNode::leaf(
///     |s: &Value, _: &Value, _: &[Value]| json!(s.as_i64().unwrap() + 1),
/// )));
///
/// assert_eq!(reducer.reduce(None, &json!({"type": "ADD"}), &[]).unwrap(), json!(1));
/// assert_eq!(reducer.reduce(Some(&json!(4)), &json!({"type": "???"}), &[]).unwrap(), json!(4));
/// ```
#[derive(Clone, Debug)]
pub struct DispatchReducer {
    default: Value,
    root: DispatchNode,
}

impl DispatchReducer {
    /// Create a reducer with an empty registry and the given default state.
    #[must_use]
    pub fn new(default: Value) -> Self {
        Self {
            default,
            root: DispatchNode::branch(),
        }
    }

    /// Deep-merge a partial tree into the registry.
    ///
    /// Leaf collisions follow [`DispatchNode::merge`]: the newly added
    /// handler silently replaces any previously registered one at the same
    /// path.
    pub fn add(&mut self, partial: DispatchNode) -> &mut Self {
        let root = std::mem::replace(&mut self.root, DispatchNode::branch());
        self.root = root.merge(partial);
        self
    }

    /// The default (initial) state.
    #[must_use]
    pub fn default_state(&self) -> &Value {
        &self.default
    }

    /// Reduce one call: substitute the default for `None` state, look up the
    /// action, and apply the found transform — or return the state unchanged
    /// when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::AmbiguousDispatch`] when the registry matches
    /// more than one leaf for this action.
    pub fn reduce(
        &self,
        state: Option<&Value>,
        action: &Value,
        extra: &[Value],
    ) -> Result<Value, ReducerError> {
        let state = state.unwrap_or(&self.default);
        match self.root.find(action)? {
            None => Ok(state.clone()),
            Some(transform) => Ok(transform.apply(state, action, extra)),
        }
    }
}
