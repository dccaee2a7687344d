//! Transform registry for config-driven reducer construction.
//!
//! The registry enables **generic config loading**: JSON/YAML config →
//! compiled reducer without bespoke wiring code per deployment.
//!
//! # Architecture
//!
//! Each transform type registers itself via [`IntoTransform`]. At
//! registration time the concrete type is monomorphized into a closure and
//! erased behind `Box<dyn Fn>` — early type erasure at registration, late
//! invocation at load time. Closures with no configuration register
//! directly via [`RegistryBuilder::function`].
//!
//! # Example
//!
//! ```
//! use remat::prelude::*;
//! use remat::{Registry, ReducerConfig};
//! use serde_json::json;
//!
//! let registry = Registry::builder()
//!     .function("bump", |s: &Value, _: &Value, _: &[Value]| {
//!         json!(s.as_i64().unwrap_or(0) + 1)
//!     })
//!     .build();
//!
//! let config: ReducerConfig = serde_json::from_value(json!({
//!     "default": 0,
//!     "matchers": [
//!         {"when": {"type": "action", "shape": {"kind": "ADD"}}, "then": {"name": "bump"}}
//!     ]
//! }))
//! .unwrap();
//!
//! let reducer = registry.load_reducer(&config).unwrap();
//! assert_eq!(reducer.reduce(Some(&json!(4)), &json!({"kind": "ADD"}), &[]), json!(5));
//! ```

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    config::{MatcherConfig, ReducerConfig, TransformRef},
    first, when, Matcher, ReducerError, Transform, WithDefault, MAX_BRANCHES,
};

/// Trait for transform types that can be constructed from configuration.
///
/// Each transform type knows its own config shape via the associated
/// `Config` type. The registry calls [`from_config`](Self::from_config) to
/// construct the transform at load time.
///
/// # Example
///
/// ```
/// use remat::{IntoTransform, ReducerError, Transform};
/// use serde::Deserialize;
/// use serde_json::Value;
/// use std::sync::Arc;
///
/// #[derive(Deserialize)]
/// struct SetConfig {
///     value: Value,
/// }
///
/// struct Set;
///
/// impl IntoTransform for Set {
///     type Config = SetConfig;
///     fn from_config(config: Self::Config) -> Result<Arc<dyn Transform>, ReducerError> {
///         let value = config.value;
///         Ok(Arc::new(move |_: &Value, _: &Value, _: &[Value]| value.clone()))
///     }
/// }
/// ```
pub trait IntoTransform: Send + Sync + 'static {
    /// The configuration type deserialized from JSON/YAML.
    type Config: DeserializeOwned + Send + Sync;

    /// Construct a transform from deserialized configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::InvalidConfig`] if the config is semantically
    /// invalid.
    fn from_config(config: Self::Config) -> Result<Arc<dyn Transform>, ReducerError>;
}

/// Type-erased transform factory closure.
type BoxedTransformFactory =
    Box<dyn Fn(&Value) -> Result<Arc<dyn Transform>, ReducerError> + Send + Sync>;

/// Builder for constructing a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    transforms: HashMap<String, BoxedTransformFactory>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a configurable transform type under a name.
    #[must_use]
    pub fn transform<T: IntoTransform>(mut self, name: impl Into<String>) -> Self {
        self.transforms.insert(
            name.into(),
            Box::new(|config| {
                let config: T::Config = serde_json::from_value(config.clone()).map_err(|e| {
                    ReducerError::InvalidConfig {
                        source: e.to_string(),
                    }
                })?;
                T::from_config(config)
            }),
        );
        self
    }

    /// Register a ready transform (usually a closure) under a name.
    ///
    /// The configuration payload of a [`TransformRef`] resolving to it is
    /// ignored.
    #[must_use]
    pub fn function(mut self, name: impl Into<String>, transform: impl Transform + 'static) -> Self {
        let shared: Arc<dyn Transform> = Arc::new(transform);
        self.transforms.insert(
            name.into(),
            Box::new(move |_config| Ok(Arc::clone(&shared))),
        );
        self
    }

    /// Finalize into a [`Registry`].
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            transforms: self.transforms,
        }
    }
}

impl std::fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("transforms", &self.transforms.len())
            .finish()
    }
}

/// Resolves named transforms and loads reducer configurations.
pub struct Registry {
    transforms: HashMap<String, BoxedTransformFactory>,
}

impl Registry {
    /// Start building a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Resolve a transform reference against the registered factories.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::UnknownTransform`] (listing the registered
    /// names) when the name is not found, or [`ReducerError::InvalidConfig`]
    /// when the payload does not deserialize.
    pub fn resolve(&self, reference: &TransformRef) -> Result<Arc<dyn Transform>, ReducerError> {
        match self.transforms.get(&reference.name) {
            Some(factory) => factory(&reference.config),
            None => {
                let mut available: Vec<String> = self.transforms.keys().cloned().collect();
                available.sort();
                Err(ReducerError::UnknownTransform {
                    name: reference.name.clone(),
                    available,
                })
            }
        }
    }

    /// Load a single matcher from configuration.
    ///
    /// # Errors
    ///
    /// Surfaces condition compilation errors, transform resolution errors,
    /// and [`ReducerError::DepthExceeded`] from validation.
    pub fn load_matcher(&self, config: &MatcherConfig) -> Result<Matcher, ReducerError> {
        let condition = config.when.compile()?;
        let matcher = match &config.then {
            Some(reference) => when(condition).with_shared(self.resolve(reference)?),
            None => when(condition),
        };
        matcher.validate()?;
        Ok(matcher)
    }

    /// Load an ordered matcher list and combine it with
    /// [`first`](crate::first).
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::TooManyBranches`] when the list exceeds
    /// [`MAX_BRANCHES`], [`ReducerError::InvalidArgument`] when it is empty,
    /// plus anything [`load_matcher`](Self::load_matcher) surfaces.
    pub fn load_first(&self, configs: &[MatcherConfig]) -> Result<Matcher, ReducerError> {
        if configs.len() > MAX_BRANCHES {
            return Err(ReducerError::TooManyBranches {
                count: configs.len(),
                max: MAX_BRANCHES,
            });
        }
        let matchers = configs
            .iter()
            .map(|config| self.load_matcher(config))
            .collect::<Result<Vec<_>, _>>()?;
        first(matchers)
    }

    /// Load a whole reducer: matchers combined with `first`, wrapped with
    /// the configured initial state.
    ///
    /// # Errors
    ///
    /// Everything [`load_first`](Self::load_first) surfaces.
    pub fn load_reducer(&self, config: &ReducerConfig) -> Result<WithDefault, ReducerError> {
        Ok(self
            .load_first(&config.matchers)?
            .with_default(config.default.clone()))
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("transforms", &self.transforms.len())
            .finish()
    }
}
