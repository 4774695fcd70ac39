//! Stack of entered scopes for one call
//!
//! The stack owns the call state so that dropping it can still release
//! every entered scope. A call that settles normally empties the stack in
//! `unwind`; a panic that skips `unwind` releases the remaining scopes from
//! `Drop`, each seeing `FuncextError::Interrupted` as the failure.

use crate::interceptor::Scope;
use crate::state::CallState;
use funcext_core::{FuncextError, Value};
use tracing::{trace, warn};

/// Scopes entered so far, outermost first, with the state they share
pub(crate) struct ScopeStack {
    state: CallState,
    scopes: Vec<(String, Box<dyn Scope>)>,
}

impl ScopeStack {
    pub(crate) fn new(state: CallState, capacity: usize) -> Self {
        Self {
            state,
            scopes: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn state(&self) -> &CallState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut CallState {
        &mut self.state
    }

    pub(crate) fn push(&mut self, interceptor: &str, scope: Box<dyn Scope>) {
        trace!(interceptor, depth = self.scopes.len(), "Entered scope");
        self.scopes.push((interceptor.to_string(), scope));
    }

    /// Exit every scope, innermost first, and settle the outcome.
    ///
    /// Each scope sees the failure the call is currently unwinding with. The
    /// first failure wins: a release failure becomes the outcome only when
    /// everything before it succeeded, otherwise it is attached to the
    /// primary failure as suppressed.
    pub(crate) fn unwind(
        &mut self,
        mut outcome: Result<(), FuncextError>,
    ) -> Result<(), FuncextError> {
        // Popping one at a time leaves the rest to `Drop` if an exit panics.
        while let Some((interceptor, scope)) = self.scopes.pop() {
            trace!(interceptor = %interceptor, "Exiting scope");
            let Err(source) = scope.exit(&mut self.state, outcome.as_ref().err()) else {
                continue;
            };

            let failure = FuncextError::release(interceptor, source);
            outcome = match outcome {
                Ok(()) => Err(failure),
                Err(mut primary) => {
                    warn!(
                        primary = %primary,
                        suppressed = %failure,
                        "Release failed while unwinding; keeping primary failure"
                    );
                    if let Err(dropped) = primary.push_suppressed(failure) {
                        warn!(error = %dropped, "Dropping release failure");
                    }
                    Err(primary)
                }
            };
        }
        outcome
    }

    /// Unwind and hand back the stored result
    pub(crate) fn finish(
        mut self,
        outcome: Result<(), FuncextError>,
    ) -> Result<Option<Value>, FuncextError> {
        self.unwind(outcome)?;
        Ok(self.state.take_result())
    }
}

impl Drop for ScopeStack {
    fn drop(&mut self) {
        if self.scopes.is_empty() {
            return;
        }
        let interrupted = FuncextError::interrupted(self.state.callable().name());
        warn!(
            callable = self.state.callable().name(),
            remaining = self.scopes.len(),
            "Releasing scopes of an interrupted call"
        );
        if let Err(err) = self.unwind(Err(interrupted)) {
            trace!(error = %err, "Interrupted call released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::scope_fn;
    use funcext_core::{Arguments, CallKind, Callable, MethodBinding};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn stack(capacity: usize) -> ScopeStack {
        let f = Callable::new("f", |_args: Arguments| Ok(Value::Null));
        let state = CallState::new(
            f,
            MethodBinding::for_kind(None),
            CallKind::Function,
            Arguments::new(),
        );
        ScopeStack::new(state, capacity)
    }

    fn recording(label: &'static str) -> Box<dyn Scope> {
        scope_fn(move |state: &mut CallState, _failure: Option<&FuncextError>| {
            let fields = state.fields_mut();
            let mut order = fields.remove("order").unwrap_or_else(|| json!([]));
            if let Some(order) = order.as_array_mut() {
                order.push(json!(label));
            }
            fields.set("order", order);
            Ok(())
        })
    }

    #[test]
    fn test_unwinds_innermost_first() {
        let mut stack = stack(3);
        stack.push("outer", recording("outer"));
        stack.push("middle", recording("middle"));
        stack.push("inner", recording("inner"));

        assert!(stack.unwind(Ok(())).is_ok());
        assert_eq!(
            stack.state().fields().get("order"),
            Some(&json!(["inner", "middle", "outer"]))
        );
    }

    #[test]
    fn test_first_release_failure_is_primary() {
        let mut stack = stack(2);
        stack.push(
            "outer",
            scope_fn(|_state: &mut CallState, failure: Option<&FuncextError>| {
                assert!(failure.is_some());
                Err("outer broke".into())
            }),
        );
        stack.push(
            "inner",
            scope_fn(|_state: &mut CallState, _failure: Option<&FuncextError>| {
                Err("inner broke".into())
            }),
        );

        let err = stack.finish(Ok(())).unwrap_err();
        assert!(matches!(
            &err,
            FuncextError::Release { interceptor, .. } if interceptor == "inner"
        ));
        assert_eq!(err.suppressed().len(), 1);
        assert!(matches!(
            &err.suppressed()[0],
            FuncextError::Release { interceptor, .. } if interceptor == "outer"
        ));
    }

    #[test]
    fn test_finish_returns_result() {
        let mut stack = stack(0);
        stack.state_mut().set_result(json!(7));
        assert_eq!(stack.finish(Ok(())).unwrap(), Some(json!(7)));
    }

    #[test]
    fn test_drop_releases_held_scopes_as_interrupted() {
        let exits = Arc::new(AtomicUsize::new(0));
        let mut stack = stack(2);
        for label in ["outer", "inner"] {
            let exits = Arc::clone(&exits);
            stack.push(
                label,
                scope_fn(move |_state: &mut CallState, failure: Option<&FuncextError>| {
                    assert!(matches!(failure, Some(FuncextError::Interrupted { .. })));
                    exits.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            );
        }

        drop(stack);
        assert_eq!(exits.load(Ordering::SeqCst), 2);
    }
}
