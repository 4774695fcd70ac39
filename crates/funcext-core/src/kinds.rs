//! Call and method classification tags

use crate::errors::FuncextError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether the wrapped callable was a free function or a bound method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    /// Free function
    Function,
    /// Already bound to a receiver, or declared as a method
    Method,
}

impl CallKind {
    /// Lowercase name accepted by `FromStr`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallKind {
    type Err = FuncextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" => Ok(Self::Function),
            "method" => Ok(Self::Method),
            other => Err(FuncextError::invalid_argument(format!(
                "call kind expected one of function, method; got '{other}' instead"
            ))),
        }
    }
}

/// How a wrapper presents itself when read off an owning type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Always bound to the owning type
    #[serde(alias = "cls")]
    Class,
    /// Never bound
    Static,
    /// Bound to the instance when accessed through one
    #[default]
    Instance,
}

impl MethodKind {
    /// Every recognized kind
    pub const ALL: [MethodKind; 3] = [Self::Class, Self::Static, Self::Instance];

    /// Canonical lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Static => "static",
            Self::Instance => "instance",
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MethodKind {
    type Err = FuncextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" | "cls" => Ok(Self::Class),
            "static" => Ok(Self::Static),
            "instance" => Ok(Self::Instance),
            other => Err(FuncextError::invalid_argument(format!(
                "method kind expected one of class, static, instance; got '{other}' instead"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_method_kind_names() {
        for kind in MethodKind::ALL {
            assert_eq!(kind.as_str().parse::<MethodKind>().unwrap(), kind);
        }
        assert_eq!("cls".parse::<MethodKind>().unwrap(), MethodKind::Class);
        assert_eq!(MethodKind::default(), MethodKind::Instance);
    }

    #[test]
    fn test_unknown_method_kind_rejected() {
        for bad in ["hello", "42", "Instance", ""] {
            let err = bad.parse::<MethodKind>().unwrap_err();
            assert_matches!(err, FuncextError::InvalidArgument { ref message }
                if message == &format!(
                    "method kind expected one of class, static, instance; got '{bad}' instead"
                ));
        }
    }

    #[test]
    fn test_call_kind_names() {
        assert_eq!("function".parse::<CallKind>().unwrap(), CallKind::Function);
        assert_eq!("method".parse::<CallKind>().unwrap(), CallKind::Method);
        assert_matches!(
            "procedure".parse::<CallKind>(),
            Err(FuncextError::InvalidArgument { .. })
        );
    }

    #[test]
    fn test_serde_names() {
        let kind: MethodKind = serde_json::from_str("\"cls\"").unwrap();
        assert_eq!(kind, MethodKind::Class);
        assert_eq!(serde_json::to_string(&MethodKind::Static).unwrap(), "\"static\"");
        assert_eq!(serde_json::to_string(&CallKind::Method).unwrap(), "\"method\"");
    }
}
