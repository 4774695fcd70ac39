//! Funcext Core prelude.
//!
//! Curated re-exports for defining callables and types.

pub use crate::arguments::Arguments;
pub use crate::binder::{MethodBinder, MethodBinding};
pub use crate::callable::{Callable, Invoke};
pub use crate::errors::{BoxError, FuncextError};
pub use crate::kinds::{CallKind, MethodKind};
pub use crate::namespace::Namespace;
pub use crate::object::{Descriptor, Instance, Receiver, TypeHandle};
pub use serde_json::{json, Value};
