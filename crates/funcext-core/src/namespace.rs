//! Namespace: an ordered key/value record with an emptiness check.
//!
//! Used for instance attributes and as the free-form part of per-call state
//! that interceptors share with each other.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Ordered record of named values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace {
    fields: BTreeMap<String, Value>,
}

impl Namespace {
    /// Create an empty namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no fields are stored
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of stored fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Look up a field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Mutable access to a field
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Store a field, returning the previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Remove a field, returning its value
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Whether a field is set
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Builder-style field insertion
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Namespace {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_namespace() {
        let ns = Namespace::new();
        assert!(ns.is_empty());
        assert_eq!(ns, Namespace::default());
    }

    #[test]
    fn test_set_and_remove() {
        let mut ns = Namespace::new();
        assert!(ns.set("answer", 42).is_none());
        assert!(!ns.is_empty());
        assert_eq!(ns.get("answer"), Some(&json!(42)));
        assert_eq!(ns.set("answer", 43), Some(json!(42)));

        assert_eq!(ns.remove("answer"), Some(json!(43)));
        assert!(ns.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let ns = Namespace::new().with("b", 2).with("a", "one");
        let encoded = serde_json::to_value(&ns).unwrap();
        assert_eq!(encoded, json!({"a": "one", "b": 2}));

        let decoded: Namespace = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, ns);
        let names: Vec<&str> = decoded.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
