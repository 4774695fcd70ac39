//! Registration identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence id handed out for an interceptor registration.
///
/// Ids are issued by a wrapper's registry from a counter that starts at zero
/// and resets to zero whenever the registry becomes empty, so an id is only
/// unique among the registrations that are live at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(u64);

impl RegistrationId {
    /// Create an id from a raw sequence number
    pub const fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    /// The raw sequence number
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<RegistrationId> for u64 {
    fn from(id: RegistrationId) -> Self {
        id.0
    }
}
