//! Unified error type for hideout operations
//!
//! Every fallible operation on the registry, pool, and lifecycle manager
//! returns `HideoutError`. Most variants signal a caller bug or corrupted save
//! data and are not meant to be recovered from; `NoAlternateLocation` is the
//! one a caller is expected to handle.

use thiserror::Error;

use crate::ids::{FactionId, HideoutId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HideoutError {
    /// A hideout id was registered twice (corrupted save or definition data)
    #[error("Duplicate hideout registration: {0} was already loaded")]
    DuplicateRegistration(HideoutId),

    /// Lookup of an id that was never registered
    #[error("Hideout not found: {0}")]
    NotFound(HideoutId),

    /// The pool was queried before the world's locations were available
    #[error("Hideout pool is not initialized: {0}")]
    Uninitialized(&'static str),

    /// Activation attempted before the pool was built
    #[error("Trying to activate faction hideouts before the pool is initialized")]
    PrematureActivation,

    /// Relocation requested for a faction with no other hideout to move to
    #[error("Faction {faction_id} has no hideout to relocate to from {hideout_id}")]
    NoAlternateLocation {
        faction_id: FactionId,
        hideout_id: HideoutId,
    },

    /// More than one hideout of a faction is active (fatal only in strict mode)
    #[error("Faction {faction_id} has {active_count} active hideouts")]
    ConsistencyViolation {
        faction_id: FactionId,
        active_count: usize,
    },

    /// An argument did not satisfy the operation's preconditions
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl HideoutError {
    pub fn uninitialized(operation: &'static str) -> Self {
        Self::Uninitialized(operation)
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn no_alternate_location(faction_id: FactionId, hideout_id: HideoutId) -> Self {
        Self::NoAlternateLocation {
            faction_id,
            hideout_id,
        }
    }

    /// True for errors that indicate the caller ran operations out of order.
    pub fn is_ordering_violation(&self) -> bool {
        matches!(self, Self::Uninitialized(_) | Self::PrematureActivation)
    }
}
