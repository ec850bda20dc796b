use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// attributes beyond the core node/link schema are carried in an open
/// map so callers can stamp model-specific columns (facility type, mode,
/// lanes, ...) without this crate knowing their names.
pub type AttributeMap = BTreeMap<String, AttributeValue>;

/// a single extended attribute, either numeric or text. keeping the two
/// apart matters downstream, where numeric and text columns are declared
/// with different field types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl AttributeValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Text(_) => None,
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(String::from(value))
    }
}

impl Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Number(n) => write!(f, "{n}"),
            AttributeValue::Text(t) => write!(f, "{t}"),
        }
    }
}
