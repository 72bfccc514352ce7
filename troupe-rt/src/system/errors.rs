//! System-level errors.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::ActorId;

/// Errors raised by actor registration and lookup.
#[derive(Debug, Error)]
pub enum SystemError {
    /// No local actor and no resolver produced one.
    #[error("unable to resolve actor {id}")]
    UnableToResolve {
        /// The id nobody could resolve.
        id: ActorId,
    },

    /// An actor with this id already exists in the system.
    #[error("actor {id} is already registered")]
    AlreadyRegistered {
        /// The contested id.
        id: ActorId,
    },

    /// The actor system has been freed.
    #[error("actor system has been freed")]
    Freed,
}
