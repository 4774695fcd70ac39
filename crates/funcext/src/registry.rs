//! Interceptor registry
//!
//! Registrations are kept ordered by `(priority, sequence)` ascending, with
//! the sequence number doubling as the `RegistrationId` handed back to the
//! caller. Among equal priorities the earlier registration comes first.
//!
//! The sequence counter is scoped to one registry. It starts at zero and is
//! reset to zero whenever the last registration is removed, so the first id
//! issued after the registry empties equals the first id ever issued.

use crate::interceptor::Interceptor;
use funcext_core::{FuncextError, RegistrationId, Result};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Ordering priority; lower values are entered first
pub type Priority = i64;

/// A registered interceptor with its ordering key
#[derive(Clone)]
pub struct Registration {
    /// Ordering priority
    pub priority: Priority,
    /// Registration id, also the tie-break key
    pub id: RegistrationId,
    /// The registered interceptor
    pub interceptor: Arc<dyn Interceptor>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("priority", &self.priority)
            .field("id", &self.id)
            .field("interceptor", &self.interceptor)
            .finish()
    }
}

/// Ordered set of interceptor registrations
#[derive(Default)]
pub struct InterceptorRegistry {
    /// Registrations keyed by their ordering key
    ordered: BTreeMap<(Priority, RegistrationId), Arc<dyn Interceptor>>,
    /// Lookup from id to the priority half of the ordering key
    priorities: HashMap<RegistrationId, Priority>,
    /// Sequence number for the next registration
    next_sequence: u64,
}

impl InterceptorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interceptor and return its id
    pub fn register(
        &mut self,
        interceptor: Arc<dyn Interceptor>,
        priority: Priority,
    ) -> RegistrationId {
        let id = RegistrationId::new(self.next_sequence);
        self.next_sequence += 1;

        debug!(
            id = %id,
            priority,
            interceptor = interceptor.name(),
            "Registered interceptor"
        );
        self.ordered.insert((priority, id), interceptor);
        self.priorities.insert(id, priority);
        id
    }

    /// Remove a registration.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the id is not live.
    pub fn remove(&mut self, id: RegistrationId) -> Result<Arc<dyn Interceptor>> {
        let priority = self
            .priorities
            .remove(&id)
            .ok_or_else(|| FuncextError::not_found(id))?;
        let interceptor = self
            .ordered
            .remove(&(priority, id))
            .ok_or_else(|| FuncextError::not_found(id))?;

        debug!(id = %id, priority, interceptor = interceptor.name(), "Removed interceptor");

        if self.ordered.is_empty() {
            debug!(issued = self.next_sequence, "Registry empty, resetting sequence counter");
            self.next_sequence = 0;
        }
        Ok(interceptor)
    }

    /// Whether `id` is live
    pub fn contains(&self, id: RegistrationId) -> bool {
        self.priorities.contains_key(&id)
    }

    /// Priority of a live registration
    pub fn priority_of(&self, id: RegistrationId) -> Option<Priority> {
        self.priorities.get(&id).copied()
    }

    /// Interceptors in entry order
    pub fn interceptors(&self) -> Vec<Arc<dyn Interceptor>> {
        self.ordered.values().cloned().collect()
    }

    /// Registrations in entry order
    pub fn registrations(&self) -> Vec<Registration> {
        self.ordered
            .iter()
            .map(|(&(priority, id), interceptor)| Registration {
                priority,
                id,
                interceptor: Arc::clone(interceptor),
            })
            .collect()
    }

    /// Ids in entry order
    pub fn ids(&self) -> Vec<RegistrationId> {
        self.ordered.keys().map(|&(_, id)| id).collect()
    }

    /// Number of live registrations
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Sequence number the next registration will receive
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }
}

impl fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorRegistry")
            .field("registrations", &self.registrations())
            .field("next_sequence", &self.next_sequence)
            .finish()
    }
}
