//! Value tree primitives shared by the merger and the resolver.
//!
//! The content of every document is a `serde_json::Value`. With the
//! `preserve_order` feature enabled, mappings keep insertion order, which is
//! what the served JSON shows to clients.

use serde::Serialize;
use std::fmt;

pub use serde_json::Value;

/// An ordered string-keyed mapping of values.
pub type Map = serde_json::Map<String, Value>;

/// The tag of a value in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classify a value by its tag.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join path segments with dots, the way paths are shown to users.
pub fn dotted(path: &[String]) -> String {
    path.join(".")
}
