//! Parameter normalization
//!
//! Callers hand the store loosely typed values (`serde_json::Value`): run
//! parameters, fly metadata, stimulus dictionaries. Before anything is
//! persisted it is resolved to an [`AttrValue`], the closed set of kinds an
//! attribute can hold.
//!
//! Rules:
//! - null becomes the string `"None"`
//! - a nested mapping becomes its compact JSON rendering (structure is lost)
//! - numbers, strings and booleans pass through as scalars
//! - a flat array of numbers becomes an integer or float array
//! - anything else (nested or mixed arrays) degrades to its string rendering

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Loosely typed caller value.
pub type ParamValue = Value;

/// Flat key → value mapping supplied by callers (run parameters, metadata, ...).
pub type ParamMap = serde_json::Map<String, Value>;

/// Token written in place of an absent value.
pub const NONE_TOKEN: &str = "None";

/// A persistable attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "data", rename_all = "snake_case")]
pub enum AttrValue {
    /// UTF-8 string
    Str(String),
    /// Signed 64-bit integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Boolean
    Bool(bool),
    /// One-dimensional integer array
    IntArray(Vec<i64>),
    /// One-dimensional float array
    FloatArray(Vec<f64>),
}

impl AttrValue {
    /// Borrow the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric payload widened to `f64` (integers included).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            other => write!(f, "{}", Value::from(other.clone())),
        }
    }
}

impl From<AttrValue> for Value {
    fn from(value: AttrValue) -> Self {
        match value {
            AttrValue::Str(s) => Self::String(s),
            AttrValue::Int(i) => Self::from(i),
            AttrValue::Float(f) => Self::from(f),
            AttrValue::Bool(b) => Self::Bool(b),
            AttrValue::IntArray(v) => Self::Array(v.into_iter().map(Self::from).collect()),
            AttrValue::FloatArray(v) => Self::Array(v.into_iter().map(Self::from).collect()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for AttrValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Resolve a caller value to its persistable form.
///
/// Pure and total: never fails, unsupported shapes degrade to strings.
/// `normalize(&normalize(x).into()) == normalize(x)` for every input.
#[must_use]
pub fn normalize(value: &ParamValue) -> AttrValue {
    match value {
        Value::Null => AttrValue::Str(NONE_TOKEN.to_string()),
        Value::Bool(b) => AttrValue::Bool(*b),
        Value::Number(n) => n
            .as_i64()
            .map(AttrValue::Int)
            .or_else(|| n.as_f64().map(AttrValue::Float))
            .unwrap_or_else(|| AttrValue::Str(n.to_string())),
        Value::String(s) => AttrValue::Str(s.clone()),
        Value::Array(items) => numeric_array(items).unwrap_or_else(|| AttrValue::Str(value.to_string())),
        Value::Object(_) => AttrValue::Str(value.to_string()),
    }
}

/// Flat numeric arrays only. Empty arrays are float arrays.
fn numeric_array(items: &[Value]) -> Option<AttrValue> {
    if items.iter().all(|v| v.as_i64().is_some()) && !items.is_empty() {
        return Some(AttrValue::IntArray(
            items.iter().filter_map(Value::as_i64).collect(),
        ));
    }
    let floats: Vec<f64> = items.iter().map(Value::as_f64).collect::<Option<_>>()?;
    Some(AttrValue::FloatArray(floats))
}

/// Stimulus parameters for one epoch.
///
/// Layered stimuli (several stimuli drawn on top of each other) are written
/// with a `stim<N>_` prefix per layer; a single stimulus is written as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum StimParameters {
    /// One stimulus, keys written unprefixed
    Single(ParamMap),
    /// Several layered stimuli, keys prefixed by layer position
    Layered(Vec<ParamMap>),
}

impl StimParameters {
    /// Flatten into `(attribute name, value)` pairs in write order.
    #[must_use]
    pub fn attributes(&self) -> Vec<(String, &ParamValue)> {
        match self {
            Self::Single(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Self::Layered(layers) => layers
                .iter()
                .enumerate()
                .flat_map(|(i, map)| map.iter().map(move |(k, v)| (format!("stim{i}_{k}"), v)))
                .collect(),
        }
    }
}

impl From<ParamMap> for StimParameters {
    fn from(map: ParamMap) -> Self {
        Self::Single(map)
    }
}

impl From<Vec<ParamMap>> for StimParameters {
    fn from(layers: Vec<ParamMap>) -> Self {
        Self::Layered(layers)
    }
}
