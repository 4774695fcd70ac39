//! Unified error type for funcext
//!
//! Two families live here. Argument and lookup errors (`InvalidArgument`,
//! `NotFound`) are raised synchronously by the call that introduced them.
//! Propagated failures (`Acquire`, `Call`, `Release`) wrap whatever an
//! interceptor or the wrapped callable returned; funcext never interprets
//! their source, it only sequences releases and hands the first one back.
//! `Interrupted` is what scopes see when they are released while a panic
//! unwinds through a call.

use crate::identifiers::RegistrationId;
use std::error::Error as StdError;

/// Opaque failure raised by user code: interceptors, scopes, and callables.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Unified error type for all funcext operations
#[derive(Debug, thiserror::Error)]
pub enum FuncextError {
    /// Malformed constructor, configuration, or registration input
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected input
        message: String,
    },

    /// Removal of an interceptor registration that is not live
    #[error("Registration {id} not found")]
    NotFound {
        /// The unknown registration id
        id: RegistrationId,
    },

    /// An interceptor failed while entering its scope
    #[error("Interceptor '{interceptor}' failed to enter")]
    Acquire {
        /// Name of the failing interceptor
        interceptor: String,
        /// The interceptor's own failure
        #[source]
        source: BoxError,
        /// Release failures raised while unwinding after this one
        suppressed: Vec<FuncextError>,
    },

    /// The wrapped callable failed
    #[error("Callable '{callable}' failed")]
    Call {
        /// Name of the failing callable
        callable: String,
        /// The callable's own failure
        #[source]
        source: BoxError,
        /// Release failures raised while unwinding after this one
        suppressed: Vec<FuncextError>,
    },

    /// An interceptor failed while exiting its scope
    #[error("Interceptor '{interceptor}' failed to exit")]
    Release {
        /// Name of the failing interceptor
        interceptor: String,
        /// The interceptor's own failure
        #[source]
        source: BoxError,
        /// Release failures raised further out while unwinding
        suppressed: Vec<FuncextError>,
    },

    /// A panic unwound through the call before it could settle
    #[error("Call to '{callable}' was interrupted by a panic")]
    Interrupted {
        /// Name of the wrapped callable
        callable: String,
    },
}

impl FuncextError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a not found error for a registration id
    pub fn not_found(id: RegistrationId) -> Self {
        Self::NotFound { id }
    }

    /// Wrap a failure raised by an interceptor's enter step
    pub fn acquire(interceptor: impl Into<String>, source: BoxError) -> Self {
        Self::Acquire {
            interceptor: interceptor.into(),
            source,
            suppressed: Vec::new(),
        }
    }

    /// Wrap a failure raised by the wrapped callable
    pub fn call(callable: impl Into<String>, source: BoxError) -> Self {
        Self::Call {
            callable: callable.into(),
            source,
            suppressed: Vec::new(),
        }
    }

    /// Create the failure seen by scopes released during a panic
    pub fn interrupted(callable: impl Into<String>) -> Self {
        Self::Interrupted {
            callable: callable.into(),
        }
    }

    /// Wrap a failure raised by a scope's exit step
    pub fn release(interceptor: impl Into<String>, source: BoxError) -> Self {
        Self::Release {
            interceptor: interceptor.into(),
            source,
            suppressed: Vec::new(),
        }
    }

    /// Whether this error carries a failure raised by user code
    pub fn is_propagated(&self) -> bool {
        matches!(
            self,
            Self::Acquire { .. } | Self::Call { .. } | Self::Release { .. }
        )
    }

    /// The user failure carried by a propagated error
    pub fn failure(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Self::Acquire { source, .. }
            | Self::Call { source, .. }
            | Self::Release { source, .. } => Some(source.as_ref()),
            Self::InvalidArgument { .. } | Self::NotFound { .. } | Self::Interrupted { .. } => None,
        }
    }

    /// Downcast the carried user failure to a concrete type
    pub fn downcast_failure_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.failure().and_then(|source| source.downcast_ref::<T>())
    }

    /// Release failures attached to this error while unwinding
    pub fn suppressed(&self) -> &[FuncextError] {
        match self {
            Self::Acquire { suppressed, .. }
            | Self::Call { suppressed, .. }
            | Self::Release { suppressed, .. } => suppressed,
            Self::InvalidArgument { .. } | Self::NotFound { .. } | Self::Interrupted { .. } => &[],
        }
    }

    /// Attach a secondary failure without replacing this one.
    ///
    /// Returns the secondary error back when this variant cannot carry it.
    pub fn push_suppressed(
        &mut self,
        secondary: FuncextError,
    ) -> std::result::Result<(), FuncextError> {
        match self {
            Self::Acquire { suppressed, .. }
            | Self::Call { suppressed, .. }
            | Self::Release { suppressed, .. } => {
                suppressed.push(secondary);
                Ok(())
            }
            Self::InvalidArgument { .. } | Self::NotFound { .. } | Self::Interrupted { .. } => {
                Err(secondary)
            }
        }
    }
}

/// Standard Result type for funcext operations
pub type Result<T> = std::result::Result<T, FuncextError>;
