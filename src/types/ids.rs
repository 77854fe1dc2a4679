use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a Ryver entity, copied verbatim from its record.
///
/// Most entities use integer ids; chat messages use opaque strings.
/// The client never normalizes or deduplicates ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectId {
    Int(i64),
    Str(String),
}

impl ObjectId {
    /// Reads an id out of a JSON value, accepting integers and strings only.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(ObjectId::Int),
            serde_json::Value::String(s) => Some(ObjectId::Str(s.clone())),
            _ => None,
        }
    }

    /// The id as it goes back into a request body.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ObjectId::Int(n) => serde_json::Value::from(*n),
            ObjectId::Str(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectId::Int(n) => write!(f, "{}", n),
            ObjectId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ObjectId {
    fn from(id: i64) -> Self {
        ObjectId::Int(id)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        ObjectId::Str(id.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        ObjectId::Str(id)
    }
}

/// Parses command-line input: all-digit input is an integer id.
impl FromStr for ObjectId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::InvalidId("empty id".to_string()));
        }
        Ok(s.parse::<i64>()
            .map(ObjectId::Int)
            .unwrap_or_else(|_| ObjectId::Str(s.to_string())))
    }
}
