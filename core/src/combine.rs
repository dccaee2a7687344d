//! `Reduce` — the top-level reducer seam, and slice combination
//!
//! Everything a host store can call is a `Reduce`: state arrives as
//! `Option<&Value>` (`None` = uninitialized), and the result is a `Result`
//! so tree dispatch can report ambiguity. [`combine_reducers`] assembles one
//! reducer from a mapping of state slices.

use crate::{Matcher, ReducerError, WithDefault};
use crate::tree::DispatchReducer;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A complete state-transition function as seen by a host store.
///
/// Implemented by [`WithDefault`], [`DispatchReducer`],
/// [`Combined`], [`Matcher`] (a `None` state reads as `Null`), and by
/// closures of the matching signature.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so hosts can share reducers
/// across threads after construction.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Reduce`",
    label = "this type is not a top-level reducer",
    note = "Reduce is implemented by WithDefault, DispatchReducer, Combined, Matcher, and by `Fn(Option<&Value>, &Value, &[Value]) -> Result<Value, ReducerError>` closures"
)]
pub trait Reduce: Send + Sync {
    /// Reduce one call. `None` state means the store is uninitialized.
    ///
    /// # Errors
    ///
    /// Implementations built on tree dispatch surface
    /// [`ReducerError::AmbiguousDispatch`]; matcher-algebra reducers never
    /// fail.
    fn reduce(
        &self,
        state: Option<&Value>,
        action: &Value,
        extra: &[Value],
    ) -> Result<Value, ReducerError>;
}

impl<F> Reduce for F
where
    F: Fn(Option<&Value>, &Value, &[Value]) -> Result<Value, ReducerError> + Send + Sync,
{
    fn reduce(
        &self,
        state: Option<&Value>,
        action: &Value,
        extra: &[Value],
    ) -> Result<Value, ReducerError> {
        self(state, action, extra)
    }
}

impl Reduce for WithDefault {
    fn reduce(
        &self,
        state: Option<&Value>,
        action: &Value,
        extra: &[Value],
    ) -> Result<Value, ReducerError> {
        Ok(WithDefault::reduce(self, state, action, extra))
    }
}

impl Reduce for DispatchReducer {
    fn reduce(
        &self,
        state: Option<&Value>,
        action: &Value,
        extra: &[Value],
    ) -> Result<Value, ReducerError> {
        DispatchReducer::reduce(self, state, action, extra)
    }
}

/// A bare matcher reduces an uninitialized state as `Null` — wrap with
/// [`with_default`](crate::with_default) to supply a real initial state.
impl Reduce for Matcher {
    fn reduce(
        &self,
        state: Option<&Value>,
        action: &Value,
        extra: &[Value],
    ) -> Result<Value, ReducerError> {
        let null = Value::Null;
        Ok(Matcher::reduce(self, state.unwrap_or(&null), action, extra))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// combine_reducers
// ═══════════════════════════════════════════════════════════════════════════════

/// A reducer assembled from per-slice reducers.
///
/// Built by [`combine_reducers`]. For every mapping key, the output carries
/// that slice reducer's result; state keys not present in the mapping are
/// dropped from the output.
///
/// # Whole-state extra argument
///
/// Each slice reducer is invoked with `(state[key], action, whole-state)` —
/// the **entire** top-level state rides along as the single extra argument,
/// not just the slice. This deliberate deviation from conventional
/// combine-reducers semantics lets a slice react to its siblings. Extras
/// given to the combined reducer itself are not forwarded.
pub struct Combined {
    mapping: BTreeMap<String, Arc<dyn Reduce>>,
}

impl Combined {
    /// The slice keys, in output order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.mapping.keys().map(String::as_str)
    }
}

impl Reduce for Combined {
    fn reduce(
        &self,
        state: Option<&Value>,
        action: &Value,
        _extra: &[Value],
    ) -> Result<Value, ReducerError> {
        let mut next = serde_json::Map::new();
        for (key, slice_reducer) in &self.mapping {
            let slice = state.and_then(|s| s.get(key));
            let whole: &[Value] = match state {
                Some(s) => std::slice::from_ref(s),
                None => &[],
            };
            next.insert(key.clone(), slice_reducer.reduce(slice, action, whole)?);
        }
        Ok(Value::Object(next))
    }
}

impl std::fmt::Debug for Combined {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Combined")
            .field("slices", &self.mapping.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Assemble one reducer from a mapping of slice reducers.
///
/// # Errors
///
/// Returns [`ReducerError::MissingReducers`] for an empty mapping.
///
/// # Example
///
/// ```
/// use remat::prelude::*;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let bump = |s: Option<&Value>, _: &Value, _: &[Value]| -> Result<Value, ReducerError> {
///     Ok(json!(s.and_then(Value::as_i64).unwrap_or(0) + 1))
/// };
/// let app = combine_reducers([("count", Arc::new(bump) as Arc<dyn Reduce>)]).unwrap();
///
/// assert_eq!(app.reduce(None, &json!("tick"), &[]).unwrap(), json!({"count": 1}));
/// ```
pub fn combine_reducers<K, I>(mapping: I) -> Result<Combined, ReducerError>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Arc<dyn Reduce>)>,
{
    let mapping: BTreeMap<String, Arc<dyn Reduce>> = mapping
        .into_iter()
        .map(|(key, reducer)| (key.into(), reducer))
        .collect();
    if mapping.is_empty() {
        return Err(ReducerError::MissingReducers);
    }
    Ok(Combined { mapping })
}
