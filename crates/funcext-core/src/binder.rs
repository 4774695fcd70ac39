//! Method binding
//!
//! Classifies callables and turns a `MethodKind` into a binding strategy.
//! The three strategies are fixed, total functions over
//! `(callable, instance, owner)`:
//!
//! - `Class`: bind to the owning type, ignoring any instance
//! - `Static`: return the callable unchanged
//! - `Instance`: unchanged without an instance, else bind to the instance

use crate::callable::Callable;
use crate::kinds::{CallKind, MethodKind};
use crate::object::{Instance, Receiver, TypeHandle};
use std::fmt;
use tracing::trace;

/// Signature shared by every binding strategy
pub type BindFn = fn(&Callable, Option<&Instance>, &TypeHandle) -> Callable;

/// Namespace for the binding strategies
pub struct MethodBinder;

impl MethodBinder {
    /// Bind to the owning type
    pub fn class_method(
        callable: &Callable,
        _instance: Option<&Instance>,
        owner: &TypeHandle,
    ) -> Callable {
        callable.bind(owner.clone())
    }

    /// No-op
    pub fn static_method(
        callable: &Callable,
        _instance: Option<&Instance>,
        _owner: &TypeHandle,
    ) -> Callable {
        callable.clone()
    }

    /// Bind to the instance only when there is one
    pub fn instance_method(
        callable: &Callable,
        instance: Option<&Instance>,
        _owner: &TypeHandle,
    ) -> Callable {
        match instance {
            Some(instance) => callable.bind(instance.clone()),
            None => callable.clone(),
        }
    }

    /// Strategy for a method kind
    pub fn strategy(kind: MethodKind) -> BindFn {
        match kind {
            MethodKind::Class => Self::class_method,
            MethodKind::Static => Self::static_method,
            MethodKind::Instance => Self::instance_method,
        }
    }
}

/// A method kind paired with its binding strategy
#[derive(Clone, Copy)]
pub struct MethodBinding {
    kind: MethodKind,
    bind: BindFn,
}

impl MethodBinding {
    /// Resolve the binding for an optional kind; `None` means `Instance`
    pub fn for_kind(kind: Option<MethodKind>) -> Self {
        let kind = kind.unwrap_or_default();
        Self {
            kind,
            bind: MethodBinder::strategy(kind),
        }
    }

    /// The method kind this binding was resolved for
    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// Apply the strategy
    pub fn apply(
        &self,
        callable: &Callable,
        instance: Option<&Instance>,
        owner: &TypeHandle,
    ) -> Callable {
        (self.bind)(callable, instance, owner)
    }
}

impl PartialEq for MethodBinding {
    fn eq(&self, other: &Self) -> bool {
        // The strategy is a function of the kind.
        self.kind == other.kind
    }
}

impl Eq for MethodBinding {}

impl fmt::Debug for MethodBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MethodBinding").field(&self.kind).finish()
    }
}

/// Result of classifying a callable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Free function or method
    pub call_kind: CallKind,
    /// Binding kind used on attribute access
    pub method_kind: MethodKind,
}

/// Classify a callable.
///
/// A bound callable is a `Method`, class-bound when its receiver is a type
/// and instance-bound otherwise; the explicit kind is ignored. An unbound
/// callable is a `Function` with the explicit kind, defaulting to
/// `Instance`.
pub fn classify(callable: &Callable, explicit: Option<MethodKind>) -> Classification {
    match callable.receiver() {
        Some(Receiver::Type(_)) => Classification {
            call_kind: CallKind::Method,
            method_kind: MethodKind::Class,
        },
        Some(Receiver::Instance(_)) => Classification {
            call_kind: CallKind::Method,
            method_kind: MethodKind::Instance,
        },
        None => Classification {
            call_kind: CallKind::Function,
            method_kind: explicit.unwrap_or_default(),
        },
    }
}

/// Bind `callable` for an access through `owner` using the strategy for `kind`
pub fn bind(
    kind: MethodKind,
    callable: &Callable,
    instance: Option<&Instance>,
    owner: &TypeHandle,
) -> Callable {
    trace!(
        callable = callable.name(),
        owner = owner.name(),
        %kind,
        through_instance = instance.is_some(),
        "Binding callable"
    );
    MethodBinder::strategy(kind)(callable, instance, owner)
}
