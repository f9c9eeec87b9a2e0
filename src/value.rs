use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field map decoded from a message fragment.
///
/// Keys iterate in ascending order, which keeps tag derivation deterministic.
pub type Map = BTreeMap<String, Value>;

/// A loosely typed field value found in Atlas message fragments.
///
/// The `key=value` decoder only produces [`Value::Int`] and [`Value::String`];
/// embedded JSON objects may produce any variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
}

impl Value {
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Parses a `key=value` right-hand side: integers stay numeric.
    pub(crate) fn from_field(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) => Value::Int(n),
            Err(_) => Value::String(raw.to_string()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}
