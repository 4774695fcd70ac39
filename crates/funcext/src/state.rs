//! Per-call state shared between the chain, its interceptors, and the
//! wrapped callable.

use funcext_core::{Arguments, Callable, CallKind, MethodBinding, MethodKind, Namespace, Value};

/// State for one invocation.
///
/// Created fresh by every call and dropped when the call returns. Entering
/// interceptors may replace the arguments or the callable before it runs;
/// exiting interceptors see the stored result and may rewrite it.
#[derive(Debug, Clone)]
pub struct CallState {
    result: Option<Value>,
    callable: Callable,
    binding: MethodBinding,
    call_kind: CallKind,
    arguments: Arguments,
    fields: Namespace,
}

impl CallState {
    /// Fresh state for one call with an empty result slot
    pub fn new(
        callable: Callable,
        binding: MethodBinding,
        call_kind: CallKind,
        arguments: Arguments,
    ) -> Self {
        Self {
            result: None,
            callable,
            binding,
            call_kind,
            arguments,
            fields: Namespace::new(),
        }
    }

    /// The callable's return value, once it has run
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Store a result, returning the previous one
    pub fn set_result(&mut self, value: Value) -> Option<Value> {
        self.result.replace(value)
    }

    /// Take the result out of the slot
    pub fn take_result(&mut self) -> Option<Value> {
        self.result.take()
    }

    /// The callable that will run once every interceptor has entered
    pub fn callable(&self) -> &Callable {
        &self.callable
    }

    /// Swap the callable that will run, returning the old one
    pub fn replace_callable(&mut self, callable: Callable) -> Callable {
        std::mem::replace(&mut self.callable, callable)
    }

    /// Binding of the wrapper
    pub fn binding(&self) -> MethodBinding {
        self.binding
    }

    /// Method kind of the wrapper
    pub fn method_kind(&self) -> MethodKind {
        self.binding.kind()
    }

    /// Call kind of the wrapper at the moment the call started
    pub fn call_kind(&self) -> CallKind {
        self.call_kind
    }

    /// Arguments the callable will receive
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Mutable arguments the callable will receive
    pub fn arguments_mut(&mut self) -> &mut Arguments {
        &mut self.arguments
    }

    /// Swap the arguments the callable will receive, returning the old ones
    pub fn replace_arguments(&mut self, arguments: Arguments) -> Arguments {
        std::mem::replace(&mut self.arguments, arguments)
    }

    /// Free-form fields interceptors share with each other
    pub fn fields(&self) -> &Namespace {
        &self.fields
    }

    /// Mutable access to the shared fields
    pub fn fields_mut(&mut self) -> &mut Namespace {
        &mut self.fields
    }

    /// True while no interceptor has stored a field
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
