//! `ConfigBox` - a mapping with subscript and attribute-style access
//!
//! Produced by [`read_config`](super::read_config) and
//! [`read_json`](super::read_json). Keys are read by subscript
//! (`cfg["key"]`), by dotted path (`cfg.attr("model.params.alpha")`),
//! through typed getters, or by extracting the whole mapping into a
//! caller-defined struct.

use std::ops::Index;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::path;
use crate::error::{ArtifactError, Result};

static NULL: Value = Value::Null;

/// Read-only view over a string-keyed document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigBox {
    inner: Map<String, Value>,
}

impl ConfigBox {
    /// Wrap an already parsed mapping
    pub fn new(inner: Map<String, Value>) -> Self {
        Self { inner }
    }

    /// Build from any value; fails unless the value is a mapping
    ///
    /// `origin` names the source (usually a file path) in the error.
    pub fn from_value(value: Value, origin: &str) -> Result<Self> {
        match value {
            Value::Object(inner) => Ok(Self { inner }),
            other => Err(ArtifactError::NotAMapping {
                path: origin.to_string(),
                found: path::type_name(&other).to_string(),
            }),
        }
    }

    /// Subscript access, `None` when the key is absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Attribute-style access over a dotted path
    pub fn attr(&self, key_path: &str) -> Result<&Value> {
        let segments = path::parse(key_path)?;
        let (first, rest) = match segments.split_first() {
            Some((path::Segment::Key(first), rest)) => (first.clone(), rest),
            // Integer keys like `2024:` are stored as strings
            Some((path::Segment::Index(first), rest)) => (first.to_string(), rest),
            None => {
                return Err(ArtifactError::InvalidKeyPath {
                    path: key_path.to_string(),
                })
            }
        };

        self.inner
            .get(&first)
            .and_then(|root| path::apply(root, rest))
            .ok_or_else(|| ArtifactError::KeyNotFound {
                key: key_path.to_string(),
            })
    }

    /// Nested mapping as its own box
    pub fn section(&self, key_path: &str) -> Result<ConfigBox> {
        match self.attr(key_path)? {
            Value::Object(map) => Ok(ConfigBox::new(map.clone())),
            other => Err(mismatch(key_path, "a mapping", other)),
        }
    }

    pub fn get_str(&self, key_path: &str) -> Result<&str> {
        let value = self.attr(key_path)?;
        value
            .as_str()
            .ok_or_else(|| mismatch(key_path, "a string", value))
    }

    pub fn get_i64(&self, key_path: &str) -> Result<i64> {
        let value = self.attr(key_path)?;
        value
            .as_i64()
            .ok_or_else(|| mismatch(key_path, "an integer", value))
    }

    /// Integers are widened, so `alpha: 1` reads as `1.0`
    pub fn get_f64(&self, key_path: &str) -> Result<f64> {
        let value = self.attr(key_path)?;
        value
            .as_f64()
            .ok_or_else(|| mismatch(key_path, "a number", value))
    }

    pub fn get_bool(&self, key_path: &str) -> Result<bool> {
        let value = self.attr(key_path)?;
        value
            .as_bool()
            .ok_or_else(|| mismatch(key_path, "a boolean", value))
    }

    /// Deserialize the whole mapping into a typed struct
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(Value::Object(self.inner.clone()))?)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.inner
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.inner
    }
}

fn mismatch(key: &str, expected: &str, found: &Value) -> ArtifactError {
    ArtifactError::TypeMismatch {
        key: key.to_string(),
        expected: expected.to_string(),
        found: path::type_name(found).to_string(),
    }
}

/// Missing keys index to `Value::Null`, like `serde_json::Value`
impl Index<&str> for ConfigBox {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.inner.get(key).unwrap_or(&NULL)
    }
}

impl From<Map<String, Value>> for ConfigBox {
    fn from(inner: Map<String, Value>) -> Self {
        Self::new(inner)
    }
}

impl From<ConfigBox> for Value {
    fn from(config: ConfigBox) -> Self {
        Value::Object(config.inner)
    }
}
