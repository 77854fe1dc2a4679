//! The raw JSON record behind every wrapper object.

use crate::error::{AppError, Result};
use crate::types::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entity as the server returned it.
///
/// Never mutated after construction; wrappers only project fields out of
/// it. Missing, `null` or mistyped fields surface as
/// [`AppError::MalformedRecord`] naming the dotted path that was asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Accepts a JSON object; anything else is a malformed response.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(AppError::MalformedResponse(format!(
                "expected a record object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// A top-level field, `None` when absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// A nested field; absent and `null` both count as missing.
    pub fn path(&self, path: &[&str]) -> Result<&Value> {
        let mut fields = &self.0;
        let mut found = None;
        for (depth, key) in path.iter().enumerate() {
            let value = fields
                .get(*key)
                .filter(|v| !v.is_null())
                .ok_or_else(|| malformed(path))?;
            if depth + 1 < path.len() {
                fields = value.as_object().ok_or_else(|| malformed(path))?;
            }
            found = Some(value);
        }
        found.ok_or_else(|| malformed(path))
    }

    pub fn str_at(&self, path: &[&str]) -> Result<&str> {
        self.path(path)?.as_str().ok_or_else(|| malformed(path))
    }

    pub fn int_at(&self, path: &[&str]) -> Result<i64> {
        self.path(path)?.as_i64().ok_or_else(|| malformed(path))
    }

    pub fn bool_at(&self, path: &[&str]) -> Result<bool> {
        self.path(path)?.as_bool().ok_or_else(|| malformed(path))
    }

    pub fn object_at(&self, path: &[&str]) -> Result<&Map<String, Value>> {
        self.path(path)?.as_object().ok_or_else(|| malformed(path))
    }

    pub fn id_at(&self, path: &[&str]) -> Result<ObjectId> {
        ObjectId::from_json(self.path(path)?).ok_or_else(|| malformed(path))
    }
}

fn malformed(path: &[&str]) -> AppError {
    AppError::MalformedRecord {
        field: path.join("."),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
