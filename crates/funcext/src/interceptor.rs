//! Interceptor contract
//!
//! An `Interceptor` is a factory for scoped resources. Each call to a
//! wrapper asks every registered interceptor, in priority order, to `enter`
//! a scope for that call; every scope that was entered is exited exactly
//! once, innermost first, whether the call succeeded or not.

use crate::state::CallState;
use funcext_core::{Arguments, BoxError, FuncextError};
use std::fmt;

/// Factory for a per-call scope
pub trait Interceptor: Send + Sync {
    /// Name used in logs and error messages
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Acquire this interceptor's resource for one call.
    ///
    /// `arguments` are the arguments the call was made with; the state holds
    /// the arguments the callable will actually receive and may be rewritten
    /// here. Failing stops the chain: later interceptors are not entered and
    /// the callable does not run.
    fn enter(
        &self,
        state: &mut CallState,
        arguments: &Arguments,
    ) -> Result<Box<dyn Scope>, BoxError>;
}

impl fmt::Debug for dyn Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Interceptor").field(&self.name()).finish()
    }
}

/// An acquired resource, released by `exit`
pub trait Scope: Send {
    /// Release the resource. `failure` is the failure the call is unwinding
    /// with, if any.
    fn exit(
        self: Box<Self>,
        state: &mut CallState,
        failure: Option<&FuncextError>,
    ) -> Result<(), BoxError>;
}

/// Scope with nothing to release
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScope;

impl Scope for NoopScope {
    fn exit(
        self: Box<Self>,
        _state: &mut CallState,
        _failure: Option<&FuncextError>,
    ) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Boxed `NoopScope`
pub fn noop_scope() -> Box<dyn Scope> {
    Box::new(NoopScope)
}

/// Scope whose release step is a closure
pub struct FnScope<F> {
    exit: F,
}

impl<F> Scope for FnScope<F>
where
    F: FnOnce(&mut CallState, Option<&FuncextError>) -> Result<(), BoxError> + Send,
{
    fn exit(
        self: Box<Self>,
        state: &mut CallState,
        failure: Option<&FuncextError>,
    ) -> Result<(), BoxError> {
        (self.exit)(state, failure)
    }
}

/// Box a closure as a scope
pub fn scope_fn<F>(exit: F) -> Box<dyn Scope>
where
    F: FnOnce(&mut CallState, Option<&FuncextError>) -> Result<(), BoxError> + Send + 'static,
{
    Box::new(FnScope { exit })
}

/// Interceptor whose enter step is a closure
pub struct FnInterceptor<F> {
    name: String,
    enter: F,
}

impl<F> Interceptor for FnInterceptor<F>
where
    F: Fn(&mut CallState, &Arguments) -> Result<Box<dyn Scope>, BoxError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn enter(
        &self,
        state: &mut CallState,
        arguments: &Arguments,
    ) -> Result<Box<dyn Scope>, BoxError> {
        (self.enter)(state, arguments)
    }
}

/// Build an interceptor from a closure
pub fn interceptor_fn<F>(name: impl Into<String>, enter: F) -> FnInterceptor<F>
where
    F: Fn(&mut CallState, &Arguments) -> Result<Box<dyn Scope>, BoxError> + Send + Sync,
{
    FnInterceptor {
        name: name.into(),
        enter,
    }
}
