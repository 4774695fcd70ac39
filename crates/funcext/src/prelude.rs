//! Funcext prelude.
//!
//! Curated re-exports for wrapping callables and writing interceptors.

pub use crate::config::WrapperConfig;
pub use crate::interceptor::{interceptor_fn, noop_scope, scope_fn, Interceptor, Scope};
pub use crate::registry::Priority;
pub use crate::state::CallState;
pub use crate::wrapper::{Wrapper, WrapperBuilder};
pub use crate::{wrap, wrap_named};
pub use funcext_core::prelude::*;
pub use funcext_core::RegistrationId;
