//! Funcext Core - callable model and method binding
//!
//! Foundation types shared by the interception layer:
//!
//! - `Callable`, `Invoke`, `Arguments`: invocation targets, optional
//!   receivers, and call arguments
//! - `TypeHandle`, `Instance`, `Descriptor`: an explicit attribute-access
//!   protocol standing in for the host language's method binding
//! - `CallKind`, `MethodKind`, `MethodBinder`: classification and the three
//!   binding strategies (class, static, instance)
//! - `Namespace`: the key/value record carried through calls
//! - `FuncextError`: the unified error type

#![forbid(unsafe_code)]

/// Call arguments
pub mod arguments;

/// Classification and binding strategies
pub mod binder;

/// Invocation targets and bound handles
pub mod callable;

/// Unified error handling
pub mod errors;

/// Registration identifiers
pub mod identifiers;

/// Call and method kind tags
pub mod kinds;

/// Key/value record
pub mod namespace;

/// Type objects, instances, descriptors
pub mod object;

pub mod prelude;

pub use arguments::Arguments;
pub use binder::{classify, BindFn, Classification, MethodBinder, MethodBinding};
pub use callable::{Callable, Invoke};
pub use errors::{BoxError, FuncextError, Result};
pub use identifiers::RegistrationId;
pub use kinds::{CallKind, MethodKind};
pub use namespace::Namespace;
pub use object::{Descriptor, Instance, Receiver, TypeHandle};

/// Dynamically typed argument and result value
pub use serde_json::Value;
