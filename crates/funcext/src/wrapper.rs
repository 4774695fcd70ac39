//! The wrapper: a callable plus its classification and interceptor chain
//!
//! # Call protocol
//!
//! `Wrapper::invoke` builds a fresh `CallState`, enters every registered
//! interceptor in `(priority, sequence)` order, runs the state's callable
//! with the state's arguments, then exits every entered scope innermost
//! first. Exits run on every path: after success, after the callable
//! fails, and after an interceptor fails to enter (in which case the
//! callable never runs). The first failure is returned; later release
//! failures ride along as suppressed. A panic in an interceptor or the
//! callable still exits the entered scopes before it propagates.
//!
//! # Binding protocol
//!
//! `Wrapper::access` is what a type attribute read resolves to. It binds a
//! callable targeting the wrapper itself, so the bound result re-enters
//! `invoke`. Reading a static wrapper, or an instance-kind wrapper through
//! its type, demotes a `Method` call kind to `Function` for good.

use crate::config::WrapperConfig;
use crate::interceptor::Interceptor;
use crate::registry::{InterceptorRegistry, Priority, Registration};
use crate::stack::ScopeStack;
use crate::state::CallState;
use funcext_core::{
    classify, Arguments, BoxError, CallKind, Callable, Descriptor, FuncextError, Instance, Invoke,
    MethodBinding, MethodKind, RegistrationId, Result, TypeHandle, Value,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, debug_span};

/// A callable wrapped in a prioritized interceptor chain
pub struct Wrapper {
    name: String,
    callable: Callable,
    binding: MethodBinding,
    /// `true` while the call kind is `Method`; only ever cleared
    method: AtomicBool,
    default_priority: Priority,
    registry: RwLock<InterceptorRegistry>,
}

impl Wrapper {
    /// Wrap a callable.
    ///
    /// A bound callable is always a `Method` whose kind follows its
    /// receiver; explicit kinds are ignored for it. An unbound callable
    /// takes the explicit kinds, defaulting to `Function` and `Instance`.
    pub fn new(
        callable: Callable,
        call_kind: Option<CallKind>,
        method_kind: Option<MethodKind>,
    ) -> Self {
        Self::build(callable, call_kind, method_kind, None, 0)
    }

    /// Wrap a callable using a validated configuration
    pub fn from_config(callable: Callable, config: &WrapperConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(
            callable,
            config.call_kind,
            config.method_kind,
            config.name.clone(),
            config.default_priority,
        ))
    }

    /// Start a builder
    pub fn builder(callable: Callable) -> WrapperBuilder {
        WrapperBuilder::new(callable)
    }

    fn build(
        callable: Callable,
        call_kind: Option<CallKind>,
        method_kind: Option<MethodKind>,
        name: Option<String>,
        default_priority: Priority,
    ) -> Self {
        let inferred = classify(&callable, method_kind);
        let call_kind = if callable.is_bound() {
            let overridden = call_kind.is_some_and(|kind| kind != inferred.call_kind)
                || method_kind.is_some_and(|kind| kind != inferred.method_kind);
            if overridden {
                debug!(
                    callable = callable.name(),
                    ?call_kind,
                    ?method_kind,
                    inferred_method_kind = %inferred.method_kind,
                    "Bound callable overrides explicit classification"
                );
            }
            inferred.call_kind
        } else {
            call_kind.unwrap_or(inferred.call_kind)
        };

        Self {
            name: name.unwrap_or_else(|| callable.name().to_string()),
            binding: MethodBinding::for_kind(Some(inferred.method_kind)),
            method: AtomicBool::new(call_kind == CallKind::Method),
            callable,
            default_priority,
            registry: RwLock::new(InterceptorRegistry::new()),
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped callable
    pub fn callable(&self) -> &Callable {
        &self.callable
    }

    /// Current call kind; may have been demoted to `Function`
    pub fn call_kind(&self) -> CallKind {
        if self.method.load(Ordering::Acquire) {
            CallKind::Method
        } else {
            CallKind::Function
        }
    }

    /// Method kind used on attribute access
    pub fn method_kind(&self) -> MethodKind {
        self.binding.kind()
    }

    /// Method kind paired with its binding strategy
    pub fn binding(&self) -> MethodBinding {
        self.binding
    }

    /// Priority used by `register_default`
    pub fn default_priority(&self) -> Priority {
        self.default_priority
    }

    // === Registry ===

    /// Register an interceptor at `priority`; lower priorities enter first
    pub fn register_interceptor<I>(&self, interceptor: I, priority: Priority) -> RegistrationId
    where
        I: Interceptor + 'static,
    {
        self.register_shared(Arc::new(interceptor), priority)
    }

    /// Register an interceptor at the configured default priority
    pub fn register_default<I>(&self, interceptor: I) -> RegistrationId
    where
        I: Interceptor + 'static,
    {
        self.register_shared(Arc::new(interceptor), self.default_priority)
    }

    /// Register an interceptor that may be shared with other wrappers
    pub fn register_shared(
        &self,
        interceptor: Arc<dyn Interceptor>,
        priority: Priority,
    ) -> RegistrationId {
        self.registry.write().register(interceptor, priority)
    }

    /// Remove a registration.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an id that is not registered, including one
    /// that was already removed.
    pub fn remove_interceptor(&self, id: RegistrationId) -> Result<()> {
        self.registry.write().remove(id).map(|_| ())
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: RegistrationId) -> bool {
        self.registry.read().contains(id)
    }

    /// Registered interceptors in entry order
    pub fn interceptors(&self) -> Vec<Arc<dyn Interceptor>> {
        self.registry.read().interceptors()
    }

    /// Registrations in entry order
    pub fn registrations(&self) -> Vec<Registration> {
        self.registry.read().registrations()
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    /// Whether no interceptor is registered
    pub fn is_empty(&self) -> bool {
        self.registry.read().is_empty()
    }

    // === Invocation ===

    /// Run the callable inside every registered interceptor.
    ///
    /// The interceptor list is snapshotted when the call starts; changes
    /// made by interceptors during the call apply from the next call.
    pub fn invoke(&self, arguments: Arguments) -> Result<Value> {
        let interceptors = self.interceptors();
        let span = debug_span!(
            "funcext.invoke",
            callable = %self.name,
            interceptors = interceptors.len()
        );
        let _entered = span.enter();

        let state = CallState::new(
            self.callable.clone(),
            self.binding,
            self.call_kind(),
            arguments.clone(),
        );
        // Entered scopes are released by the stack even if a panic unwinds
        // through this frame.
        let mut stack = ScopeStack::new(state, interceptors.len());
        let mut outcome = Ok(());

        for interceptor in &interceptors {
            match interceptor.enter(stack.state_mut(), &arguments) {
                Ok(scope) => stack.push(interceptor.name(), scope),
                Err(source) => {
                    debug!(interceptor = interceptor.name(), "Interceptor failed to enter");
                    outcome = Err(FuncextError::acquire(interceptor.name(), source));
                    break;
                }
            }
        }

        if outcome.is_ok() {
            let callable = stack.state().callable().clone();
            match callable.call(stack.state().arguments().clone()) {
                Ok(value) => {
                    stack.state_mut().set_result(value);
                }
                Err(source) => {
                    debug!(callable = callable.name(), "Wrapped callable failed");
                    outcome = Err(FuncextError::call(callable.name(), source));
                }
            }
        }

        Ok(stack.finish(outcome)?.unwrap_or(Value::Null))
    }

    /// Positional-only shorthand for `invoke`
    pub fn call(&self, positional: impl IntoIterator<Item = Value>) -> Result<Value> {
        self.invoke(Arguments::positional(positional))
    }

    // === Binding ===

    /// A callable targeting this wrapper
    pub fn as_callable(self: &Arc<Self>) -> Callable {
        Callable::from_target(Arc::clone(self) as Arc<dyn Invoke>)
    }

    /// Resolve an attribute read through `owner`, with `instance` present
    /// when the read went through an object.
    pub fn access(self: &Arc<Self>, instance: Option<&Instance>, owner: &TypeHandle) -> Callable {
        let kind = self.binding.kind();
        if kind == MethodKind::Static || (kind == MethodKind::Instance && instance.is_none()) {
            self.demote(owner);
        }
        self.binding.apply(&self.as_callable(), instance, owner)
    }

    fn demote(&self, owner: &TypeHandle) {
        if self.method.swap(false, Ordering::AcqRel) {
            debug!(
                callable = %self.name,
                owner = owner.name(),
                method_kind = %self.binding.kind(),
                "Demoted call kind from method to function"
            );
        }
    }
}

impl Invoke for Wrapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, arguments: Arguments) -> std::result::Result<Value, BoxError> {
        Wrapper::invoke(self, arguments).map_err(Into::into)
    }
}

impl Descriptor for Wrapper {
    fn get(self: Arc<Self>, instance: Option<&Instance>, owner: &TypeHandle) -> Callable {
        self.access(instance, owner)
    }
}

impl fmt::Debug for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper")
            .field("name", &self.name)
            .field("call_kind", &self.call_kind())
            .field("method_kind", &self.binding.kind())
            .field("registry", &*self.registry.read())
            .finish()
    }
}

/// Builder for wrappers with interceptors registered up front
pub struct WrapperBuilder {
    callable: Callable,
    config: WrapperConfig,
    interceptors: Vec<(Arc<dyn Interceptor>, Option<Priority>)>,
}

impl WrapperBuilder {
    /// Start from default configuration
    pub fn new(callable: Callable) -> Self {
        Self {
            callable,
            config: WrapperConfig::default(),
            interceptors: Vec::new(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: WrapperConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the explicit call kind
    pub fn call_kind(mut self, call_kind: CallKind) -> Self {
        self.config.call_kind = Some(call_kind);
        self
    }

    /// Set the explicit method kind
    pub fn method_kind(mut self, method_kind: MethodKind) -> Self {
        self.config.method_kind = Some(method_kind);
        self
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    /// Set the priority used by `default_interceptor`
    pub fn default_priority(mut self, priority: Priority) -> Self {
        self.config.default_priority = priority;
        self
    }

    /// Register an interceptor at `priority` once built
    pub fn interceptor<I>(mut self, interceptor: I, priority: Priority) -> Self
    where
        I: Interceptor + 'static,
    {
        self.interceptors.push((Arc::new(interceptor), Some(priority)));
        self
    }

    /// Register an interceptor at the default priority once built
    pub fn default_interceptor<I>(mut self, interceptor: I) -> Self
    where
        I: Interceptor + 'static,
    {
        self.interceptors.push((Arc::new(interceptor), None));
        self
    }

    /// Build the wrapper; interceptors are registered in the order given.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the configuration does not validate.
    pub fn build(self) -> Result<Arc<Wrapper>> {
        let wrapper = Wrapper::from_config(self.callable, &self.config)?;
        for (interceptor, priority) in self.interceptors {
            wrapper.register_shared(interceptor, priority.unwrap_or(wrapper.default_priority));
        }
        Ok(Arc::new(wrapper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::{interceptor_fn, noop_scope, scope_fn, Scope};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn double() -> Callable {
        Callable::new("double", |args: Arguments| {
            let x = args.arg(0).and_then(Value::as_i64).ok_or("expected integer")?;
            Ok(json!(x * 2))
        })
    }

    fn passthrough(name: &'static str) -> impl Interceptor {
        interceptor_fn(name, |_state: &mut CallState, _args: &Arguments| Ok(noop_scope()))
    }

    #[test]
    fn test_defaults_for_plain_function() {
        let wrapper = Wrapper::new(double(), None, None);
        assert_eq!(wrapper.call_kind(), CallKind::Function);
        assert_eq!(wrapper.method_kind(), MethodKind::Instance);
        assert_eq!(wrapper.name(), "double");
        assert!(wrapper.is_empty());
        assert_eq!(wrapper.call([json!(4)]).unwrap(), json!(8));
    }

    #[test]
    fn test_bound_callable_overrides_explicit_kinds() {
        let owner = TypeHandle::new("Ledger");
        let wrapper = Wrapper::new(
            double().bind(owner),
            Some(CallKind::Function),
            Some(MethodKind::Static),
        );
        assert_eq!(wrapper.call_kind(), CallKind::Method);
        assert_eq!(wrapper.method_kind(), MethodKind::Class);
    }

    #[test]
    fn test_registration_management() {
        let wrapper = Wrapper::new(double(), None, None);
        let a = wrapper.register_interceptor(passthrough("a"), 1);
        let b = wrapper.register_interceptor(passthrough("b"), 0);
        assert!(wrapper.contains(a));
        assert_eq!(wrapper.len(), 2);

        let names: Vec<String> = wrapper
            .interceptors()
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        assert_eq!(names, vec!["b", "a"]);

        wrapper.remove_interceptor(a).unwrap();
        assert!(!wrapper.contains(a));
        assert_matches!(wrapper.remove_interceptor(a), Err(FuncextError::NotFound { .. }));
        wrapper.remove_interceptor(b).unwrap();
        assert!(wrapper.is_empty());
    }

    #[test]
    fn test_interceptor_rewrites_arguments() {
        let wrapper = Wrapper::new(double(), None, None);
        wrapper.register_interceptor(
            interceptor_fn("bump", |state: &mut CallState, args: &Arguments| {
                let x = args.arg(0).and_then(Value::as_i64).unwrap_or_default();
                state.replace_arguments(Arguments::new().with_arg(x + 1));
                Ok(noop_scope())
            }),
            0,
        );
        assert_eq!(wrapper.call([json!(20)]).unwrap(), json!(42));
    }

    #[test]
    fn test_exit_can_rewrite_result() {
        let wrapper = Wrapper::new(double(), None, None);
        wrapper.register_interceptor(
            interceptor_fn("negate", |_state: &mut CallState, _args: &Arguments| {
                Ok(scope_fn(|state: &mut CallState, _failure: Option<&FuncextError>| {
                    let value = state.result().and_then(Value::as_i64).unwrap_or_default();
                    state.set_result(json!(-value));
                    Ok(())
                }))
            }),
            0,
        );
        assert_eq!(wrapper.call([json!(21)]).unwrap(), json!(-42));
    }

    #[test]
    fn test_builder_registers_in_order() {
        let wrapper = Wrapper::builder(double())
            .name("doubler")
            .default_priority(5)
            .default_interceptor(passthrough("late"))
            .interceptor(passthrough("early"), 1)
            .build()
            .unwrap();

        assert_eq!(wrapper.name(), "doubler");
        let registrations = wrapper.registrations();
        assert_eq!(registrations.len(), 2);
        assert_eq!(registrations[0].interceptor.name(), "early");
        assert_eq!(registrations[1].priority, 5);

        assert_matches!(
            Wrapper::builder(double()).name("").build(),
            Err(FuncextError::InvalidArgument { .. })
        );
    }

    #[test]
    fn test_static_access_is_unbound_and_demotes() {
        let owner = TypeHandle::new("Tools");
        let obj = owner.instantiate();
        let wrapper = Arc::new(Wrapper::new(
            double(),
            Some(CallKind::Method),
            Some(MethodKind::Static),
        ));
        assert_eq!(wrapper.call_kind(), CallKind::Method);

        let accessed = wrapper.access(Some(&obj), &owner);
        assert!(!accessed.is_bound());
        assert!(accessed.same_target(&wrapper.as_callable()));
        assert_eq!(wrapper.call_kind(), CallKind::Function);
        assert_eq!(accessed.call(Arguments::new().with_arg(5)).unwrap(), json!(10));
    }

    struct Failing;

    impl Interceptor for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn enter(
            &self,
            _state: &mut CallState,
            _arguments: &Arguments,
        ) -> std::result::Result<Box<dyn Scope>, BoxError> {
            Err("refused".into())
        }
    }

    #[test]
    fn test_nested_wrapper_failure_surfaces_as_call() {
        let inner = Arc::new(Wrapper::new(double(), None, None));
        inner.register_interceptor(Failing, 0);

        let outer = Wrapper::new(inner.as_callable(), None, None);
        let err = outer.call([json!(1)]).unwrap_err();
        assert_matches!(&err, FuncextError::Call { callable, .. } if callable == "double");
        let nested = err.downcast_failure_ref::<FuncextError>().unwrap();
        assert_matches!(
            nested,
            FuncextError::Acquire { interceptor, .. } if interceptor == "failing"
        );
    }
}
