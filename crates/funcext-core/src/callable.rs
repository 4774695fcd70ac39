//! Callables: a shared invocation target plus an optional receiver.
//!
//! Binding never copies the target. `Callable::bind` returns a new handle
//! over the same target with the receiver set; calling it injects the
//! receiver into the arguments before the target runs.

use crate::arguments::Arguments;
use crate::errors::BoxError;
use crate::kinds::MethodKind;
use crate::object::{Descriptor, Instance, Receiver, TypeHandle};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Invocation target behind a `Callable`
pub trait Invoke: Send + Sync {
    /// Name used in logs and error messages
    fn name(&self) -> &str;

    /// Run the target with fully prepared arguments
    fn invoke(&self, arguments: Arguments) -> Result<Value, BoxError>;
}

struct NativeFn<F> {
    name: String,
    func: F,
}

impl<F> Invoke for NativeFn<F>
where
    F: Fn(Arguments) -> Result<Value, BoxError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, arguments: Arguments) -> Result<Value, BoxError> {
        (self.func)(arguments)
    }
}

/// A possibly bound handle over an invocation target
#[derive(Clone)]
pub struct Callable {
    target: Arc<dyn Invoke>,
    receiver: Option<Receiver>,
}

impl Callable {
    /// Create an unbound callable from a closure
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Arguments) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self::from_target(Arc::new(NativeFn {
            name: name.into(),
            func,
        }))
    }

    /// Create an unbound callable over an existing target
    pub fn from_target(target: Arc<dyn Invoke>) -> Self {
        Self {
            target,
            receiver: None,
        }
    }

    /// Name of the underlying target
    pub fn name(&self) -> &str {
        self.target.name()
    }

    /// The shared invocation target
    pub fn target(&self) -> &Arc<dyn Invoke> {
        &self.target
    }

    /// Receiver injected on call, if bound
    pub fn receiver(&self) -> Option<&Receiver> {
        self.receiver.as_ref()
    }

    /// Whether a receiver is attached
    pub fn is_bound(&self) -> bool {
        self.receiver.is_some()
    }

    /// Bind to a receiver; an existing binding is replaced
    pub fn bind(&self, receiver: impl Into<Receiver>) -> Self {
        Self {
            target: Arc::clone(&self.target),
            receiver: Some(receiver.into()),
        }
    }

    /// The same target without a receiver
    pub fn unbind(&self) -> Self {
        Self::from_target(Arc::clone(&self.target))
    }

    /// True when both handles share one target, whatever their binding
    pub fn same_target(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.target, &other.target)
    }

    /// Call the target, injecting this handle's receiver when bound
    pub fn call(&self, mut arguments: Arguments) -> Result<Value, BoxError> {
        if let Some(receiver) = &self.receiver {
            arguments.set_receiver(Some(receiver.clone()));
        }
        self.target.invoke(arguments)
    }
}

/// Identity: same target and same receiver
impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.same_target(other) && self.receiver == other.receiver
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name())
            .field("receiver", &self.receiver)
            .finish()
    }
}

/// A plain callable stored on a type behaves like a host function:
/// bound to the instance when read through one.
impl Descriptor for Callable {
    fn get(self: Arc<Self>, instance: Option<&Instance>, owner: &TypeHandle) -> Callable {
        crate::binder::bind(MethodKind::Instance, &self, instance, owner)
    }
}
