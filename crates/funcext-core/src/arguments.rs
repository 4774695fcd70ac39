//! Call arguments: positional values, keyword values, and the receiver
//! injected by binding.

use crate::object::Receiver;
use serde_json::Value;
use std::collections::BTreeMap;

/// Arguments for a single call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    receiver: Option<Receiver>,
    positional: Vec<Value>,
    keywords: BTreeMap<String, Value>,
}

impl Arguments {
    /// Create an empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create arguments from positional values only
    pub fn positional(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            positional: values.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Append a positional value
    pub fn with_arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword value
    pub fn with_keyword(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.into(), value.into());
        self
    }

    /// Set the receiver explicitly
    pub fn with_receiver(mut self, receiver: Receiver) -> Self {
        self.receiver = Some(receiver);
        self
    }

    /// The receiver supplied by binding, if any
    pub fn receiver(&self) -> Option<&Receiver> {
        self.receiver.as_ref()
    }

    /// Replace or clear the receiver
    pub fn set_receiver(&mut self, receiver: Option<Receiver>) {
        self.receiver = receiver;
    }

    /// Positional arguments
    pub fn args(&self) -> &[Value] {
        &self.positional
    }

    /// Mutable positional arguments
    pub fn args_mut(&mut self) -> &mut Vec<Value> {
        &mut self.positional
    }

    /// Positional argument at `index`
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Keyword arguments
    pub fn keywords(&self) -> &BTreeMap<String, Value> {
        &self.keywords
    }

    /// Mutable keyword arguments
    pub fn keywords_mut(&mut self) -> &mut BTreeMap<String, Value> {
        &mut self.keywords
    }

    /// Keyword argument by name
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords.get(name)
    }
}
