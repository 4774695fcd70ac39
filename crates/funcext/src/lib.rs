//! # Funcext - Interceptor Chains for Callables
//!
//! Wraps a callable so that every call runs inside a prioritized chain of
//! scoped interceptors, and so that the wrapper can be stored on a type and
//! read back as a plain function, an instance method, a class method, or a
//! static method.
//!
//! ```
//! use funcext::prelude::*;
//!
//! let double = Callable::new("double", |args: Arguments| {
//!     let x = args.arg(0).and_then(Value::as_i64).ok_or("expected integer")?;
//!     Ok(json!(x * 2))
//! });
//!
//! let wrapper = funcext::wrap(double, None, None);
//! wrapper.register_interceptor(
//!     interceptor_fn("audit", |state: &mut CallState, _args: &Arguments| {
//!         state.fields_mut().set("audited", true);
//!         Ok(noop_scope())
//!     }),
//!     0,
//! );
//! assert_eq!(wrapper.call([json!(21)]).unwrap(), json!(42));
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod interceptor;
pub mod prelude;
pub mod registry;
mod stack;
pub mod state;
pub mod wrapper;

pub use config::WrapperConfig;
pub use interceptor::{
    interceptor_fn, noop_scope, scope_fn, FnInterceptor, FnScope, Interceptor, NoopScope, Scope,
};
pub use registry::{InterceptorRegistry, Priority, Registration};
pub use state::CallState;
pub use wrapper::{Wrapper, WrapperBuilder};

pub use funcext_core::{
    Arguments, BoxError, CallKind, Callable, Descriptor, FuncextError, Instance, MethodKind,
    Namespace, Receiver, RegistrationId, Result, TypeHandle, Value,
};

use std::sync::Arc;

/// Wrap a callable with explicit or inferred kinds
pub fn wrap(
    callable: Callable,
    call_kind: Option<CallKind>,
    method_kind: Option<MethodKind>,
) -> Arc<Wrapper> {
    Arc::new(Wrapper::new(callable, call_kind, method_kind))
}

/// Wrap a callable with kinds given by name.
///
/// # Errors
///
/// Returns `InvalidArgument` for an unrecognized kind name; nothing is
/// constructed in that case.
pub fn wrap_named(
    callable: Callable,
    call_kind: Option<&str>,
    method_kind: Option<&str>,
) -> Result<Arc<Wrapper>> {
    let config = WrapperConfig::from_names(call_kind, method_kind)?;
    Ok(Arc::new(Wrapper::from_config(callable, &config)?))
}
