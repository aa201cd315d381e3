//! Configuration value tree.
//!
//! Every loader produces a [`Dict`] of [`Value`] nodes, and the merge and
//! flatten passes operate on the same shape. Values are deliberately closed:
//! configuration data is strings, integers, floats, booleans, and nested
//! mappings. Sequences and nulls are rejected at the deserialisation
//! boundary because they have no flattened representation.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

/// An ordered mapping from raw keys to configuration values.
///
/// Ordering is lexicographic by key, which keeps merge and flatten output
/// deterministic across runs.
pub type Dict = BTreeMap<String, Value>;

/// A single node in a configuration document.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A textual value.
    String(String),
    /// A signed integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A nested mapping of further values.
    Dict(Dict),
}

impl Value {
    /// Returns the human-readable name of this value's kind.
    ///
    /// Used in diagnostics so errors can say what a key actually held.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strata_config::Value;
    ///
    /// assert_eq!(Value::Integer(8).kind(), "integer");
    /// assert_eq!(Value::Bool(true).kind(), "boolean");
    /// ```
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Dict(_) => "mapping",
        }
    }

    /// Returns the nested mapping when this value is a [`Value::Dict`].
    #[must_use]
    pub const fn as_dict(&self) -> Option<&Dict> {
        match self {
            Self::Dict(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Dict> for Value {
    fn from(value: Dict) -> Self {
        Self::Dict(value)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a configuration scalar or mapping")
    }

    fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Value::Bool(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Value::Integer(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i64::try_from(value)
            .map(Value::Integer)
            .map_err(|_| E::custom(format!("integer {value} is out of range")))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
        Ok(Value::Float(value))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Value::String(value.to_owned()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
        Ok(Value::String(value))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Dict::new();
        while let Some((key, value)) = access.next_entry::<String, Self::Value>()? {
            entries.insert(key, value);
        }
        Ok(Value::Dict(entries))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}
