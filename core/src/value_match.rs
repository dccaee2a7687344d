//! `ValueMatchSpec` — Config-level leaf match specification
//!
//! This type represents a user's *intent* for matching one value (e.g.,
//! "prefix match on todo/"). It compiles to the runtime [`ValueMatcher`] via
//! [`compile()`](ValueMatchSpec::compile).
//!
//! # Naming: Spec vs Matcher
//!
//! - [`ValueMatchSpec`] = config-level specification (what the user wrote)
//! - [`ValueMatcher`] = runtime engine (what evaluates at match time, with
//!   the regex precompiled)

use crate::{ReducerError, MAX_PATTERN_LENGTH, MAX_REGEX_PATTERN_LENGTH};
use regex::Regex;
use serde_json::Value;
use std::fmt;

/// A leaf match specification from user configuration.
///
/// Represents one of six matching strategies over a single value. Compiles
/// to the runtime [`ValueMatcher`] via [`compile()`](Self::compile).
///
/// The string strategies (`Prefix`, `Suffix`, `Contains`, `Regex`) match
/// only string values; any other value type never matches them. `Equals`
/// compares any value by deep equality. `Defined` matches every non-null
/// value.
///
/// # Example
///
/// ```
/// use remat::ValueMatchSpec;
///
/// let spec = ValueMatchSpec::Prefix("todo/".into());
/// let matcher = spec.compile().unwrap();
/// assert!(matcher.matches(&"todo/add".into()));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ValueMatchSpec {
    /// Deep value equality.
    Equals(Value),
    /// String starts with prefix.
    Prefix(String),
    /// String ends with suffix.
    Suffix(String),
    /// String contains substring.
    Contains(String),
    /// Regular expression match (Rust `regex` crate syntax, linear time).
    Regex(String),
    /// Any non-null value. The idiom for "this field exists at all".
    Defined,
}

impl ValueMatchSpec {
    /// Compile this spec into a runtime [`ValueMatcher`].
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::PatternTooLong`] if a pattern exceeds its
    /// length limit, or [`ReducerError::InvalidPattern`] if the regex is
    /// invalid.
    pub fn compile(&self) -> Result<ValueMatcher, ReducerError> {
        match self {
            Self::Equals(v) => Ok(ValueMatcher::Equals(v.clone())),
            Self::Prefix(v) => Ok(ValueMatcher::Prefix(checked_pattern(v)?)),
            Self::Suffix(v) => Ok(ValueMatcher::Suffix(checked_pattern(v)?)),
            Self::Contains(v) => Ok(ValueMatcher::Contains(checked_pattern(v)?)),
            Self::Regex(v) => {
                if v.len() > MAX_REGEX_PATTERN_LENGTH {
                    return Err(ReducerError::PatternTooLong {
                        len: v.len(),
                        max: MAX_REGEX_PATTERN_LENGTH,
                    });
                }
                let regex = Regex::new(v).map_err(|e| ReducerError::InvalidPattern {
                    pattern: v.clone(),
                    source: e.to_string(),
                })?;
                Ok(ValueMatcher::Regex(regex))
            }
            Self::Defined => Ok(ValueMatcher::Defined),
        }
    }
}

fn checked_pattern(pattern: &str) -> Result<String, ReducerError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(ReducerError::PatternTooLong {
            len: pattern.len(),
            max: MAX_PATTERN_LENGTH,
        });
    }
    Ok(pattern.to_string())
}

impl fmt::Display for ValueMatchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(v) => write!(f, "Equals({v})"),
            Self::Prefix(v) => write!(f, "Prefix(\"{v}\")"),
            Self::Suffix(v) => write!(f, "Suffix(\"{v}\")"),
            Self::Contains(v) => write!(f, "Contains(\"{v}\")"),
            Self::Regex(v) => write!(f, "Regex(\"{v}\")"),
            Self::Defined => write!(f, "Defined"),
        }
    }
}

/// Runtime leaf matcher with any regex precompiled.
///
/// Built from [`ValueMatchSpec::compile`]. String strategies return `false`
/// for non-string values rather than coercing.
#[derive(Debug, Clone)]
pub enum ValueMatcher {
    /// Deep value equality.
    Equals(Value),
    /// String starts with prefix.
    Prefix(String),
    /// String ends with suffix.
    Suffix(String),
    /// String contains substring.
    Contains(String),
    /// Compiled regular expression.
    Regex(Regex),
    /// Any non-null value.
    Defined,
}

impl ValueMatcher {
    /// Check whether the given value matches.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Equals(expected) => value == expected,
            Self::Prefix(p) => value.as_str().is_some_and(|s| s.starts_with(p.as_str())),
            Self::Suffix(p) => value.as_str().is_some_and(|s| s.ends_with(p.as_str())),
            Self::Contains(p) => value.as_str().is_some_and(|s| s.contains(p.as_str())),
            Self::Regex(re) => value.as_str().is_some_and(|s| re.is_match(s)),
            Self::Defined => !value.is_null(),
        }
    }
}

impl fmt::Display for ValueMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(v) => write!(f, "Equals({v})"),
            Self::Prefix(v) => write!(f, "Prefix(\"{v}\")"),
            Self::Suffix(v) => write!(f, "Suffix(\"{v}\")"),
            Self::Contains(v) => write!(f, "Contains(\"{v}\")"),
            Self::Regex(re) => write!(f, "Regex(\"{}\")", re.as_str()),
            Self::Defined => write!(f, "Defined"),
        }
    }
}
