//! Wrapper configuration
//!
//! Classification can be given in code, by name, or from a TOML table:
//!
//! ```toml
//! name = "billing.charge"
//! call_kind = "method"
//! method_kind = "class"
//! default_priority = 10
//! ```
//!
//! Every parse failure surfaces as `FuncextError::InvalidArgument`.

use crate::registry::Priority;
use funcext_core::{CallKind, FuncextError, MethodKind, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Construction-time settings for a `Wrapper`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WrapperConfig {
    /// Display name for logs and errors; defaults to the callable's name
    pub name: Option<String>,
    /// Explicit call kind; ignored when the callable is already bound
    pub call_kind: Option<CallKind>,
    /// Explicit method kind; ignored when the callable is already bound
    pub method_kind: Option<MethodKind>,
    /// Priority used by `Wrapper::register_default`
    pub default_priority: Priority,
}

impl WrapperConfig {
    /// Build a config from textual kinds
    pub fn from_names(call_kind: Option<&str>, method_kind: Option<&str>) -> Result<Self> {
        Ok(Self {
            call_kind: call_kind.map(str::parse).transpose()?,
            method_kind: method_kind.map(str::parse).transpose()?,
            ..Self::default()
        })
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| FuncextError::invalid_argument(format!("Invalid wrapper config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FuncextError::invalid_argument(format!(
                "Failed to read wrapper config {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject a blank display name
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(FuncextError::invalid_argument(
                    "Wrapper name must not be empty",
                ));
            }
        }
        Ok(())
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the call kind
    pub fn with_call_kind(mut self, call_kind: CallKind) -> Self {
        self.call_kind = Some(call_kind);
        self
    }

    /// Set the method kind
    pub fn with_method_kind(mut self, method_kind: MethodKind) -> Self {
        self.method_kind = Some(method_kind);
        self
    }

    /// Set the default priority
    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = priority;
        self
    }
}
